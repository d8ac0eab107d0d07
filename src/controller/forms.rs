use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, FileReader, HtmlElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
};

use super::{dom_error, on, query_all, query_one, query_within};
use crate::char_counter::{counter_view, CounterView};
use crate::config::{CharCounterConfig, StatusToggleConfig};
use crate::field_visibility::date_fields_visible;
use crate::image_preview::{PreviewTracker, ReadTicket};
use crate::services::{PageContext, WidgetError, WidgetResult};
use crate::slug::slug_on_blur;
use crate::templates::form_template::{
    render_char_counter, render_image_preview, render_preview_button, render_required_error,
    ERROR_MESSAGE_CLASS, PREVIEW_CLASS,
};
use crate::validation::{validate_required, FieldInput, FieldStatus, ERROR_CLASS};

pub(super) fn attach(document: &Document, ctx: &Rc<PageContext>) {
    attach_slug(document);
    for input in query_all(document, ".field-featured_image input[type=\"file\"]") {
        attach_image_preview(&input);
    }
    for textarea in query_all(document, ".field-excerpt textarea, .field-seo_description textarea") {
        if let Err(err) = attach_char_counter(&textarea, ctx) {
            warn!(error = %err, "character counter not attached");
        }
    }
    attach_status_toggle(document, ctx);
    if let Err(err) = attach_preview_button(document) {
        warn!(error = %err, "preview button not added");
    }
    for form in query_all(document, "form[data-validate]") {
        on(&form.clone(), "submit", move |event: Event| {
            if !validate_form(&form) {
                event.prevent_default();
            }
        });
    }
}

fn input_value(element: &Element) -> String {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(textarea) = element.dyn_ref::<HtmlTextAreaElement>() {
        textarea.value()
    } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        select.value()
    } else {
        String::new()
    }
}

fn attach_slug(document: &Document) {
    let (Some(title), Some(slug)) = (
        document.get_element_by_id("id_title"),
        document.get_element_by_id("id_slug"),
    ) else {
        return;
    };
    let Ok(slug) = slug.dyn_into::<HtmlInputElement>() else {
        return;
    };
    let source = title.clone();
    on(&title, "blur", move |_: Event| {
        if let Some(derived) = slug_on_blur(&input_value(&source), &slug.value()) {
            debug!(slug = %derived, "slug derived from title");
            slug.set_value(&derived);
        }
    });
}

fn attach_image_preview(input: &Element) {
    let Ok(file_input) = input.clone().dyn_into::<HtmlInputElement>() else {
        return;
    };
    let tracker = Rc::new(RefCell::new(PreviewTracker::new()));
    on(input, "change", move |_: Event| {
        let ticket = tracker.borrow_mut().begin();
        let Some(file) = file_input.files().and_then(|files| files.get(0)) else {
            return;
        };
        if let Err(err) = read_preview(&file_input, &file, ticket, tracker.clone()) {
            warn!(error = %err, "image preview failed");
        }
    });
}

fn read_preview(
    input: &HtmlInputElement,
    file: &web_sys::File,
    ticket: ReadTicket,
    tracker: Rc<RefCell<PreviewTracker>>,
) -> WidgetResult<()> {
    let reader = FileReader::new().map_err(|err| dom_error("FileReader", err))?;
    let input = input.clone();
    let target = reader.clone();
    let onload = Closure::once_into_js(move |_: Event| {
        let data_url = target.result().ok().and_then(|value| value.as_string()).unwrap_or_default();
        let Some(data_url) = tracker.borrow().accept(ticket, data_url) else {
            return;
        };
        if let Err(err) = show_preview(&input, &data_url) {
            warn!(error = %err, "could not show image preview");
        }
    });
    reader.set_onload(Some(onload.unchecked_ref()));
    reader
        .read_as_data_url(file)
        .map_err(|err| dom_error("reading image", err))
}

fn show_preview(input: &HtmlInputElement, data_url: &str) -> WidgetResult<()> {
    if let Some(parent) = input.parent_element() {
        for stale in query_within(&parent, &format!(":scope > .{PREVIEW_CLASS}")) {
            stale.remove();
        }
    }
    let html = format!(
        "<div class=\"{PREVIEW_CLASS}\">{}</div>",
        render_image_preview(data_url)
    );
    input
        .insert_adjacent_html("afterend", &html)
        .map_err(|err| dom_error("image preview", err))
}

fn attach_char_counter(element: &Element, ctx: &PageContext) -> WidgetResult<()> {
    let Some(config) = CharCounterConfig::from_maxlength(element.get_attribute("maxlength").as_deref(), &ctx.config) else {
        return Ok(());
    };
    let textarea = element
        .clone()
        .dyn_into::<HtmlTextAreaElement>()
        .map_err(|_| WidgetError::Dom("character counter needs a textarea".into()))?;
    let view = counter_view(&textarea.value(), &config);
    element
        .insert_adjacent_html("afterend", &render_char_counter(&view))
        .map_err(|err| dom_error("character counter", err))?;
    let counter = element
        .next_element_sibling()
        .ok_or_else(|| WidgetError::Dom("character counter missing after insert".into()))?;

    let update = Rc::new(move || apply_counter(&counter, &counter_view(&textarea.value(), &config)));
    for name in ["keyup", "input"] {
        let update = update.clone();
        on(element, name, move |_: Event| update());
    }
    Ok(())
}

fn apply_counter(counter: &Element, view: &CounterView) {
    counter.set_text_content(Some(&view.text));
    let classes = counter.class_list();
    let _ = classes.remove_1(view.style.other().class_name());
    let _ = classes.add_1(view.style.class_name());
}

fn attach_status_toggle(document: &Document, ctx: &PageContext) {
    let Some(status) = document.get_element_by_id("id_status") else {
        return;
    };
    let config = StatusToggleConfig::from_page(&ctx.config);
    let document = document.clone();
    let source = status.clone();
    let apply = move || {
        let visible = date_fields_visible(&input_value(&source), &config);
        for field in query_all(&document, ".field-publish_date, .field-expire_date") {
            if let Ok(field) = field.dyn_into::<HtmlElement>() {
                let display = if visible { "" } else { "none" };
                let _ = field.style().set_property("display", display);
            }
        }
    };
    apply();
    on(&status, "change", move |_: Event| apply());
}

fn attach_preview_button(document: &Document) -> WidgetResult<()> {
    if document.get_element_by_id("page-form").is_none() {
        return Ok(());
    }
    let Some(href) = document
        .query_selector("a[href*=\"preview\"]")
        .ok()
        .flatten()
        .and_then(|link| link.get_attribute("href"))
    else {
        return Ok(());
    };
    for row in query_all(document, ".submit-row") {
        row.insert_adjacent_html("beforeend", &render_preview_button(&href))
            .map_err(|err| dom_error("preview button", err))?;
    }
    Ok(())
}

/// Marks empty required fields; returns whether the form may submit.
fn validate_form(form: &Element) -> bool {
    let controls = query_within(form, "input[required], textarea[required], select[required]");
    let fields: Vec<FieldInput> = controls
        .iter()
        .map(|control| {
            FieldInput::new(
                control.get_attribute("name").unwrap_or_default(),
                input_value(control),
            )
        })
        .collect();
    let report = validate_required(&fields);

    for (control, status) in controls.iter().zip(&report.statuses) {
        if let Err(err) = mark_field(control, *status) {
            warn!(error = %err, "could not mark field");
        }
    }
    for err in report.errors(&fields) {
        debug!(error = %err, "form blocked");
    }

    let Some(first) = report.first_invalid().and_then(|index| controls.get(index)) else {
        return true;
    };
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(ScrollLogicalPosition::Center);
    first.scroll_into_view_with_scroll_into_view_options(&options);
    if let Some(first) = first.dyn_ref::<HtmlElement>() {
        let _ = first.focus();
    }
    false
}

fn mark_field(control: &Element, status: FieldStatus) -> WidgetResult<()> {
    let classes = control.class_list();
    let message = control
        .parent_element()
        .and_then(|parent| query_one(&parent, &format!(".{ERROR_MESSAGE_CLASS}")));
    match status {
        FieldStatus::Missing => {
            classes.add_1(ERROR_CLASS).map_err(|err| dom_error("error class", err))?;
            if message.is_none() {
                if let Some(parent) = control.parent_element() {
                    parent
                        .insert_adjacent_html("beforeend", &render_required_error())
                        .map_err(|err| dom_error("error message", err))?;
                }
            }
        }
        FieldStatus::Valid => {
            classes.remove_1(ERROR_CLASS).map_err(|err| dom_error("error class", err))?;
            if let Some(message) = message {
                message.remove();
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    fn form(html: &str) -> Element {
        let document = super::super::document().unwrap();
        let form = document.create_element("form").unwrap();
        form.set_inner_html(html);
        document.body().unwrap().append_child(&form).unwrap();
        form
    }

    #[wasm_bindgen_test]
    fn repeated_validation_inserts_one_message() {
        let form = form(
            "<div><input name=\"title\" required value=\"\"></div>\
             <div><input name=\"slug\" required value=\"home\"></div>",
        );
        assert!(!validate_form(&form));
        assert!(!validate_form(&form));
        assert_eq!(query_within(&form, &format!(".{ERROR_MESSAGE_CLASS}")).len(), 1);
        let title = query_one(&form, "[name=title]").unwrap();
        assert!(title.class_list().contains(ERROR_CLASS));

        title.dyn_ref::<HtmlInputElement>().unwrap().set_value("Home");
        assert!(validate_form(&form));
        assert!(query_within(&form, &format!(".{ERROR_MESSAGE_CLASS}")).is_empty());
        assert!(!title.class_list().contains(ERROR_CLASS));
    }

    #[wasm_bindgen_test]
    fn counter_follows_the_textarea() {
        let form = form("<textarea maxlength=\"10\">abc</textarea>");
        let textarea = query_one(&form, "textarea").unwrap();
        attach_char_counter(&textarea, &PageContext::new("https://cms.local/", None)).unwrap();
        let counter = textarea.next_element_sibling().unwrap();
        assert_eq!(counter.text_content().as_deref(), Some("3/10"));

        textarea
            .dyn_ref::<HtmlTextAreaElement>()
            .unwrap()
            .set_value("0123456789");
        textarea.dispatch_event(&Event::new("input").unwrap()).unwrap();
        assert_eq!(counter.text_content().as_deref(), Some("10/10"));
        assert!(counter.class_list().contains("text-danger"));
        assert!(!counter.class_list().contains("text-muted"));
    }
}
