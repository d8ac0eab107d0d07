use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info, warn};
use web_sys::{Document, Element};

use super::browser::IntervalHandle;
use super::page::play_tween;
use super::{attribute_bag, query_all, query_one, register_teardown, set_hidden};
use crate::animations::link_reveal;
use crate::config::{CountdownConfig, CounterConfig};
use crate::count_up::CountUp;
use crate::countdown::{CountdownController, TickEffect};
use crate::services::{PageContext, TimerHandle, WidgetError, WidgetResult};

const TICK_MS: u32 = 1000;

pub(super) fn attach(document: &Document, ctx: &Rc<PageContext>) {
    for container in query_all(document, "[data-link-container]") {
        if let Err(err) = attach_countdown(&container, ctx) {
            warn!(error = %err, "countdown not attached");
        }
    }
    for element in query_all(document, "[data-counter]") {
        if let Err(err) = attach_counter(&element, ctx) {
            warn!(error = %err, "counter not attached");
        }
    }
}

fn attach_countdown(container: &Element, ctx: &PageContext) -> WidgetResult<()> {
    let link = query_one(container, "[data-link]")
        .ok_or_else(|| WidgetError::Dom("countdown container has no [data-link]".into()))?;
    let display = query_one(container, "[data-countdown]")
        .ok_or_else(|| WidgetError::Dom("countdown container has no [data-countdown]".into()))?;
    let mut bag = attribute_bag(container);
    if !bag.contains("duration") {
        bag = attribute_bag(&display);
    }
    let config = CountdownConfig::from_attributes(&bag, &ctx.config)?;
    info!(seconds = config.duration_secs, "countdown started");

    let controller = Rc::new(RefCell::new(CountdownController::<IntervalHandle>::new(config)));
    display.set_text_content(Some(&config.duration_secs.to_string()));
    let render = {
        let controller = controller.clone();
        let container = container.clone();
        move || {
            let effect = controller.borrow_mut().tick();
            match effect {
                TickEffect::Show(remaining) => display.set_text_content(Some(&remaining.to_string())),
                TickEffect::ShowAndReveal(remaining) => {
                    display.set_text_content(Some(&remaining.to_string()));
                    set_hidden(&container, false);
                    set_hidden(&link, false);
                    play_tween(link.as_ref(), &link_reveal());
                    debug!("countdown link revealed");
                }
                TickEffect::Idle => {}
            }
        }
    };
    controller
        .borrow_mut()
        .attach_timer(IntervalHandle::every(TICK_MS, render));
    register_teardown(move || controller.borrow_mut().teardown());
    Ok(())
}

fn attach_counter(element: &Element, ctx: &PageContext) -> WidgetResult<()> {
    let config = CounterConfig::from_attributes(&attribute_bag(element), &ctx.config)?;
    let counter = Rc::new(RefCell::new(CountUp::new(config)));
    let timer: Rc<RefCell<Option<IntervalHandle>>> = Rc::new(RefCell::new(None));
    let tick = {
        let element = element.clone();
        let timer = timer.clone();
        move || {
            let mut counter = counter.borrow_mut();
            element.set_text_content(Some(&counter.step()));
            if counter.is_done() {
                if let Some(handle) = timer.borrow_mut().take() {
                    handle.cancel();
                }
            }
        }
    };
    *timer.borrow_mut() = Some(IntervalHandle::every(config.frame_ms, tick));
    register_teardown(move || {
        if let Some(handle) = timer.borrow_mut().take() {
            handle.cancel();
        }
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloo_timers::future::TimeoutFuture;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    async fn last_tick_shows_zero_and_reveals_the_link() {
        let document = super::super::document().unwrap();
        let container = document.create_element("div").unwrap();
        container.set_class_name("hidden");
        container.set_attribute("data-link-container", "").unwrap();
        container.set_attribute("data-duration", "1").unwrap();
        container.set_inner_html("<span data-countdown></span><a data-link class=\"hidden\" href=\"/file\">Download</a>");
        document.body().unwrap().append_child(&container).unwrap();
        let display = query_one(&container, "[data-countdown]").unwrap();
        let link = query_one(&container, "[data-link]").unwrap();

        attach_countdown(&container, &PageContext::new("https://cms.local/", None)).unwrap();
        assert_eq!(display.text_content().as_deref(), Some("1"));

        TimeoutFuture::new(1_400).await;
        assert_eq!(display.text_content().as_deref(), Some("1"));
        assert!(container.class_list().contains("hidden"));

        TimeoutFuture::new(1_000).await;
        assert_eq!(display.text_content().as_deref(), Some("0"));
        assert!(!container.class_list().contains("hidden"));
        assert!(!link.class_list().contains("hidden"));
    }

    #[wasm_bindgen_test]
    fn container_without_link_is_rejected() {
        let document = super::super::document().unwrap();
        let container = document.create_element("div").unwrap();
        container.set_inner_html("<span data-countdown></span>");
        let result = attach_countdown(&container, &PageContext::new("https://cms.local/", None));
        assert!(matches!(result, Err(WidgetError::Dom(_))));
    }
}
