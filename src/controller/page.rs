use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function, Reflect, JSON};
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Blob, BlobPropertyBag, Document, Element, Event, HtmlAnchorElement, HtmlElement,
    HtmlInputElement, HtmlSelectElement, MouseEvent, Node,
};

use super::browser::{BrowserService, IntervalHandle};
use super::{document, dom_error, on, query_all, query_one, register_teardown, set_hidden};
use crate::animations::{entrance_animations, mobile_menu_slide, Tween};
use crate::bulk_actions::BulkActionController;
use crate::charts::dashboard_charts;
use crate::config::PollConfig;
use crate::export::{export_records, ExportFile, ExportFormat, Record};
use crate::live_badges::{next_badge_count, next_visitor_count};
use crate::menus::{MenuChange, MenuState};
use crate::services::{http, PageContext, TimerHandle, WidgetError, WidgetResult};
use crate::stats::{stats_request, StatsPoller};
use crate::tooltip::tooltip_position;

const TOOLTIP_CLASS: &str = "absolute z-50 px-3 py-2 text-sm text-white bg-gray-900 rounded-lg shadow-lg";

pub(super) fn attach(document: &Document, ctx: &Rc<PageContext>) {
    play_entrance_animations();
    draw_charts(document);
    for dropdown in query_all(document, "[data-dropdown]") {
        attach_dropdown(document, &dropdown);
    }
    attach_mobile_menu(document);
    for element in query_all(document, "[data-tooltip]") {
        attach_tooltip(document, &element);
    }
    for select in query_all(document, ".comment-actions select") {
        attach_bulk_actions(document, &select, ctx);
    }
    if !query_all(document, ".stats-box").is_empty() {
        attach_stats(document, ctx);
    }
    if ctx.config.live_badges {
        attach_live_badges(document, ctx.config.live_badge_ms);
    }
}

fn global(name: &str) -> Option<JsValue> {
    let window = web_sys::window()?;
    Reflect::get(&window, &JsValue::from_str(name))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

/// Runs `gsap.from(target, tween)`; does nothing when GSAP is not loaded.
pub(super) fn play_tween(target: &JsValue, tween: &Tween) {
    let Some(gsap) = global("gsap") else {
        debug!("gsap not loaded, skipping animation");
        return;
    };
    let result = Reflect::get(&gsap, &JsValue::from_str("from"))
        .and_then(|from| from.dyn_into::<Function>())
        .and_then(|from| {
            let vars = JSON::parse(&tween.to_value().to_string())?;
            from.call2(&gsap, target, &vars)
        });
    if let Err(err) = result {
        warn!(error = ?err, "animation failed");
    }
}

fn play_entrance_animations() {
    if global("gsap").is_none() {
        return;
    }
    for (selector, tween) in entrance_animations() {
        play_tween(&JsValue::from_str(selector), &tween);
    }
}

fn draw_charts(document: &Document) {
    let Some(constructor) = global("Chart").and_then(|value| value.dyn_into::<Function>().ok()) else {
        return;
    };
    for spec in dashboard_charts() {
        let Some(canvas) = document.get_element_by_id(spec.canvas_id) else {
            continue;
        };
        let drawn = JSON::parse(&spec.config.to_string())
            .and_then(|config| Reflect::construct(&constructor, &Array::of2(&canvas, &config)));
        match drawn {
            Ok(_) => debug!(canvas = spec.canvas_id, "chart drawn"),
            Err(err) => warn!(canvas = spec.canvas_id, error = ?err, "chart failed"),
        }
    }
}

fn node_contains(container: &Element, target: Option<&web_sys::EventTarget>) -> bool {
    target
        .and_then(|target| target.dyn_ref::<Node>())
        .map(|node| container.contains(Some(node)))
        .unwrap_or(false)
}

fn menu_state(menu: &Element) -> MenuState {
    MenuState::from_visible(!menu.class_list().contains("hidden"))
}

fn apply_menu_change(menu: &Element, change: MenuChange) {
    match change {
        MenuChange::Opened => set_hidden(menu, false),
        MenuChange::Closed => set_hidden(menu, true),
        MenuChange::Unchanged => {}
    }
}

fn attach_dropdown(document: &Document, dropdown: &Element) {
    let (Some(toggle), Some(menu)) = (
        query_one(dropdown, "[data-dropdown-toggle]"),
        query_one(dropdown, "[data-dropdown-menu]"),
    ) else {
        return;
    };
    {
        let menu = menu.clone();
        on(&toggle, "click", move |event: Event| {
            event.stop_propagation();
            apply_menu_change(&menu, menu_state(&menu).toggle());
        });
    }
    let dropdown = dropdown.clone();
    on(document, "click", move |event: Event| {
        let inside = node_contains(&dropdown, event.target().as_ref());
        apply_menu_change(&menu, menu_state(&menu).document_click(inside));
    });
}

fn attach_mobile_menu(document: &Document) {
    let (Some(button), Some(menu)) = (
        document.get_element_by_id("mobileMenuButton"),
        document.get_element_by_id("mobileMenu"),
    ) else {
        return;
    };
    {
        let menu = menu.clone();
        on(&button, "click", move |_: Event| {
            let change = menu_state(&menu).toggle();
            apply_menu_change(&menu, change);
            if change == MenuChange::Opened {
                play_tween(menu.as_ref(), &mobile_menu_slide());
            }
        });
    }
    on(document, "click", move |event: Event| {
        let target = event.target();
        let inside = node_contains(&menu, target.as_ref()) || node_contains(&button, target.as_ref());
        apply_menu_change(&menu, menu_state(&menu).document_click(inside));
    });
}

fn attach_tooltip(document: &Document, element: &Element) {
    let text = element.get_attribute("data-tooltip").unwrap_or_default();
    let current: Rc<RefCell<Option<HtmlElement>>> = Rc::new(RefCell::new(None));
    {
        let current = current.clone();
        let document = document.clone();
        on(element, "mouseenter", move |event: MouseEvent| {
            if let Some(stale) = current.borrow_mut().take() {
                stale.remove();
            }
            match show_tooltip(&document, &text, &event) {
                Ok(tooltip) => *current.borrow_mut() = Some(tooltip),
                Err(err) => warn!(error = %err, "tooltip not shown"),
            }
        });
    }
    {
        let current = current.clone();
        on(element, "mousemove", move |event: MouseEvent| {
            if let Some(tooltip) = current.borrow().as_ref() {
                place_tooltip(tooltip, &event);
            }
        });
    }
    on(element, "mouseleave", move |_: MouseEvent| {
        if let Some(tooltip) = current.borrow_mut().take() {
            tooltip.remove();
        }
    });
}

fn show_tooltip(document: &Document, text: &str, event: &MouseEvent) -> WidgetResult<HtmlElement> {
    let tooltip = document
        .create_element("div")
        .map_err(|err| dom_error("tooltip", err))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| WidgetError::Dom("tooltip is not an HTML element".into()))?;
    tooltip.set_class_name(TOOLTIP_CLASS);
    tooltip.set_text_content(Some(text));
    tooltip.set_id(&format!("tooltip-{}", js_sys::Date::now() as u64));
    place_tooltip(&tooltip, event);
    let body = document
        .body()
        .ok_or_else(|| WidgetError::Dom("no body".into()))?;
    body.append_child(&tooltip)
        .map_err(|err| dom_error("tooltip", err))?;
    Ok(tooltip)
}

fn place_tooltip(tooltip: &HtmlElement, event: &MouseEvent) {
    let position = tooltip_position(event.client_x(), event.client_y());
    let style = tooltip.style();
    let _ = style.set_property("top", &position.css_top());
    let _ = style.set_property("left", &position.css_left());
}

fn attach_bulk_actions(document: &Document, select: &Element, ctx: &Rc<PageContext>) {
    let Ok(select_input) = select.clone().dyn_into::<HtmlSelectElement>() else {
        return;
    };
    let anchor = select
        .closest(".comment-actions")
        .ok()
        .flatten()
        .unwrap_or_else(|| select.clone());
    let controller = Rc::new(BulkActionController::new(BrowserService::anchored(&anchor)));
    let document = document.clone();
    let ctx = ctx.clone();
    on(select, "change", move |_: Event| {
        let ids: Vec<String> = query_all(&document, ".action-select:checked")
            .into_iter()
            .filter_map(|element| element.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .collect();
        match controller.on_action_change(&ctx, &select_input.value(), &ids) {
            Ok(Some(request)) => {
                let controller = controller.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let result = http::send(&request).await.map(|_| ());
                    controller.on_complete(result);
                });
            }
            Ok(None) => {}
            Err(err) => warn!(error = %err, "bulk action not sent"),
        }
    });
}

type Poller = StatsPoller<BrowserService, IntervalHandle>;

fn attach_stats(document: &Document, ctx: &Rc<PageContext>) {
    let anchor = document.query_selector(".stats-box").ok().flatten();
    let service = anchor
        .as_ref()
        .map(BrowserService::anchored)
        .unwrap_or_default();
    let config = PollConfig {
        interval_ms: ctx.config.stats_poll_ms,
    };
    let poller = Rc::new(RefCell::new(Poller::new(service, config)));
    let poll = {
        let poller = poller.clone();
        let document = document.clone();
        let ctx = ctx.clone();
        move || {
            let request = match stats_request(&ctx) {
                Ok(request) => request,
                Err(err) => {
                    warn!(error = %err, "stats endpoint unavailable");
                    return;
                }
            };
            let poller = poller.clone();
            let document = document.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = http::send(&request).await;
                let snapshot = poller.borrow_mut().on_response(result);
                if let Some(snapshot) = snapshot {
                    for (selector, text) in snapshot.display() {
                        for element in query_all(&document, selector) {
                            element.set_text_content(Some(&text));
                        }
                    }
                }
            });
        }
    };
    let interval_ms = poller.borrow().interval_ms();
    poller
        .borrow_mut()
        .attach_timer(IntervalHandle::every(interval_ms, poll));
    info!(interval_ms, "stats polling started");
    register_teardown(move || poller.borrow_mut().teardown());
}

fn attach_live_badges(document: &Document, interval_ms: u32) {
    let document = document.clone();
    let timer = IntervalHandle::every(interval_ms, move || {
        if let Ok(Some(visitors)) = document.query_selector("[data-visitor-count]") {
            let current = visitors.text_content().unwrap_or_default();
            if let Some(next) = next_visitor_count(&current, js_sys::Math::random()) {
                visitors.set_text_content(Some(&next));
            }
        }
        if let Ok(Some(badge)) = document.query_selector("[data-notification-badge]") {
            let current = badge.text_content().unwrap_or_default();
            if let Some(next) = next_badge_count(&current, js_sys::Math::random()) {
                badge.set_text_content(Some(&next.to_string()));
                set_hidden(&badge, false);
            }
        }
    });
    register_teardown(move || timer.cancel());
}

/// Downloads `records_json` (a JSON array of objects) as `export.csv` or
/// `export.json`.
#[wasm_bindgen(js_name = exportData)]
pub fn export_data(records_json: &str, format: &str) -> Result<(), JsValue> {
    let download = || -> WidgetResult<()> {
        let records: Vec<Record> = serde_json::from_str(records_json)
            .map_err(|err| WidgetError::ParseFailure(format!("export records: {err}")))?;
        let format: ExportFormat = format.parse()?;
        let file = export_records(&records, format)?;
        save_file(&file)
    };
    download().map_err(|err| {
        warn!(error = %err, "export failed");
        JsValue::from_str(&err.to_string())
    })
}

fn save_file(file: &ExportFile) -> WidgetResult<()> {
    let document = document().ok_or_else(|| WidgetError::Dom("no document".into()))?;
    let body = document
        .body()
        .ok_or_else(|| WidgetError::Dom("no body".into()))?;
    let parts = Array::of1(&JsValue::from_str(&file.contents));
    let options = BlobPropertyBag::new();
    options.set_type(file.mime_type);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)
        .map_err(|err| dom_error("export blob", err))?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)
        .map_err(|err| dom_error("export url", err))?;
    let anchor = document
        .create_element("a")
        .map_err(|err| dom_error("export link", err))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| WidgetError::Dom("export link is not an anchor".into()))?;
    anchor.set_href(&url);
    anchor.set_download(file.filename);
    body.append_child(&anchor)
        .map_err(|err| dom_error("export link", err))?;
    anchor.click();
    body.remove_child(&anchor)
        .map_err(|err| dom_error("export link", err))?;
    web_sys::Url::revoke_object_url(&url).map_err(|err| dom_error("export url", err))?;
    info!(file = file.filename, bytes = file.contents.len(), "export downloaded");
    Ok(())
}
