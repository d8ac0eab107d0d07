pub mod browser;
mod countdown;
mod forms;
mod page;
mod tables;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlDocument, HtmlInputElement, NodeList};

use crate::config::{PageConfig, CONFIG_ELEMENT_ID};
use crate::logging::init_tracing;
use crate::services::{csrf_from_cookie, AttributeBag, PageContext, WidgetError, WidgetResult, CSRF_FIELD};

#[cfg(test)]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

thread_local! {
    static TEARDOWNS: RefCell<Vec<Box<dyn FnOnce()>>> = RefCell::new(Vec::new());
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let document = document().ok_or_else(|| JsValue::from_str("no document"))?;
    if document.ready_state() == "loading" {
        let ready = Closure::once_into_js(attach_all);
        document.add_event_listener_with_callback("DOMContentLoaded", ready.unchecked_ref())?;
    } else {
        attach_all();
    }
    Ok(())
}

/// Cancels every timer owned by the attached widgets. Safe to call twice.
#[wasm_bindgen]
pub fn teardown_widgets() {
    let teardowns = TEARDOWNS.with(|cell| std::mem::take(&mut *cell.borrow_mut()));
    debug!(count = teardowns.len(), "tearing down widgets");
    for teardown in teardowns {
        teardown();
    }
}

pub(crate) fn register_teardown(teardown: impl FnOnce() + 'static) {
    TEARDOWNS.with(|cell| cell.borrow_mut().push(Box::new(teardown)));
}

fn attach_all() {
    let Some(document) = document() else {
        return;
    };
    let (config, config_error) = match read_config(&document) {
        Ok(config) => (config, None),
        Err(err) => (PageConfig::default(), Some(err)),
    };
    init_tracing(&config.log_filter);
    if let Some(err) = config_error {
        warn!(error = %err, "falling back to the default page config");
    }

    let ctx = Rc::new(page_context(&document, config));
    tables::attach(&document, &ctx);
    countdown::attach(&document, &ctx);
    forms::attach(&document, &ctx);
    page::attach(&document, &ctx);
    info!(page = %ctx.page_url, "widgets attached");
}

fn read_config(document: &Document) -> WidgetResult<PageConfig> {
    let raw = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content())
        .unwrap_or_default();
    PageConfig::from_json(&raw)
}

fn page_context(document: &Document, config: PageConfig) -> PageContext {
    let page_url = document
        .location()
        .and_then(|location| location.href().ok())
        .unwrap_or_default();
    let from_field = document
        .query_selector(&format!("[name={CSRF_FIELD}]"))
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .filter(|token| !token.trim().is_empty());
    let csrf_token = from_field.or_else(|| {
        document
            .clone()
            .dyn_into::<HtmlDocument>()
            .ok()
            .and_then(|html| html.cookie().ok())
            .and_then(|cookie| csrf_from_cookie(&cookie))
    });
    if csrf_token.is_none() {
        debug!("no csrf token on page; requests are sent without one");
    }
    PageContext::new(page_url, csrf_token).with_config(config)
}

pub(crate) fn document() -> Option<Document> {
    web_sys::window().and_then(|window| window.document())
}

pub(crate) fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub(crate) fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    match document.query_selector_all(selector) {
        Ok(list) => elements(list),
        Err(err) => {
            warn!(selector, error = ?err, "invalid selector");
            Vec::new()
        }
    }
}

pub(crate) fn query_within(root: &Element, selector: &str) -> Vec<Element> {
    root.query_selector_all(selector)
        .map(elements)
        .unwrap_or_default()
}

pub(crate) fn query_one(root: &Element, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

/// Adds a listener that lives as long as the page.
pub(crate) fn on<E, F>(target: &EventTarget, event: &str, mut handler: F)
where
    E: JsCast + 'static,
    F: FnMut(E) + 'static,
{
    let closure = Closure::wrap(Box::new(move |event: Event| {
        if let Ok(event) = event.dyn_into::<E>() {
            handler(event);
        }
    }) as Box<dyn FnMut(Event)>);
    if let Err(err) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
        warn!(event, error = ?err, "could not add listener");
    }
    closure.forget();
}

/// The element's `data-*` attributes, keyed without the prefix.
pub(crate) fn attribute_bag(element: &Element) -> AttributeBag {
    let pairs: Vec<(String, String)> = element
        .get_attribute_names()
        .iter()
        .filter_map(|name| name.as_string())
        .filter(|name| name.starts_with("data-"))
        .filter_map(|name| element.get_attribute(&name).map(|value| (name, value)))
        .collect();
    AttributeBag::from_pairs(pairs.iter().map(|(name, value)| (name.as_str(), value.as_str())))
}

pub(crate) fn dom_error(context: &str, err: JsValue) -> WidgetError {
    WidgetError::Dom(format!("{context}: {err:?}"))
}

pub(crate) fn set_hidden(element: &Element, hidden: bool) {
    let classes = element.class_list();
    let result = if hidden {
        classes.add_1("hidden")
    } else {
        classes.remove_1("hidden")
    };
    if let Err(err) = result {
        warn!(error = ?err, "could not toggle hidden class");
    }
}
