use gloo_timers::callback::Interval;
use tracing::{error, info, warn};
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use super::document;
use crate::services::{Notice, NoticeLevel, PageService, TimerHandle};
use crate::templates::notice_template::{render_notice, NOTICE_REGION_CLASS};

/// `PageService` backed by the window. Notices go into a region placed just
/// before the anchor element, or at the top of the body without one.
#[derive(Clone, Debug, Default)]
pub struct BrowserService {
    anchor: Option<Element>,
}

impl BrowserService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn anchored(anchor: &Element) -> Self {
        Self {
            anchor: Some(anchor.clone()),
        }
    }

    fn show(&self, notice: &Notice) -> Result<(), JsValue> {
        let document = document().ok_or_else(|| JsValue::from_str("no document"))?;
        let region = self.region(&document)?;
        region.insert_adjacent_html("beforeend", &render_notice(notice))
    }

    fn region(&self, document: &Document) -> Result<Element, JsValue> {
        if let Some(anchor) = &self.anchor {
            if let Some(previous) = anchor.previous_element_sibling() {
                if previous.class_list().contains(NOTICE_REGION_CLASS) {
                    return Ok(previous);
                }
            }
            if let Some(parent) = anchor.parent_node() {
                let region = new_region(document)?;
                parent.insert_before(&region, Some(anchor))?;
                return Ok(region);
            }
        }
        if let Some(region) = document.query_selector(&format!(".{NOTICE_REGION_CLASS}"))? {
            return Ok(region);
        }
        let region = new_region(document)?;
        let body = document.body().ok_or_else(|| JsValue::from_str("no body"))?;
        body.prepend_with_node_1(&region)?;
        Ok(region)
    }
}

fn new_region(document: &Document) -> Result<Element, JsValue> {
    let region = document.create_element("div")?;
    region.set_class_name(NOTICE_REGION_CLASS);
    region.set_attribute("aria-live", "polite")?;
    Ok(region)
}

impl PageService for BrowserService {
    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|window| window.confirm_with_message(message).ok())
            .unwrap_or(false)
    }

    fn reload(&self) {
        if let Some(window) = web_sys::window() {
            if let Err(err) = window.location().reload() {
                warn!(error = ?err, "reload failed");
            }
        }
    }

    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => error!(message = %notice.message, "notice"),
            NoticeLevel::Warning => warn!(message = %notice.message, "notice"),
            NoticeLevel::Info => info!(message = %notice.message, "notice"),
        }
        if let Err(err) = self.show(&notice) {
            warn!(error = ?err, "could not render notice");
        }
    }
}

/// Repeating browser timer. Cancelling from inside its own callback is
/// allowed: the callback is released on a later task.
pub struct IntervalHandle(Interval);

impl IntervalHandle {
    pub fn every(millis: u32, tick: impl FnMut() + 'static) -> Self {
        Self(Interval::new(millis, tick))
    }
}

impl TimerHandle for IntervalHandle {
    fn cancel(self) {
        let callback = self.0.cancel();
        wasm_bindgen_futures::spawn_local(async move {
            drop(callback);
        });
    }
}
