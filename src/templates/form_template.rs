use crate::char_counter::CounterView;
use crate::templates::escape_html;
use crate::validation::REQUIRED_MESSAGE;

pub const ERROR_MESSAGE_CLASS: &str = "error-message";
pub const PREVIEW_CLASS: &str = "image-preview";

pub fn render_char_counter(view: &CounterView) -> String {
    format!(
        "<small class=\"char-counter {} float-end\">{}</small>",
        view.style.class_name(),
        escape_html(&view.text)
    )
}

pub fn render_required_error() -> String {
    format!(
        "<p class=\"{ERROR_MESSAGE_CLASS} text-red-600 dark:text-red-400 text-sm mt-1\">{REQUIRED_MESSAGE}</p>"
    )
}

pub fn render_image_preview(data_url: &str) -> String {
    format!(
        "<img src=\"{}\" class=\"img-fluid\" alt=\"\">",
        escape_html(data_url)
    )
}

pub fn render_preview_button(href: &str) -> String {
    format!(
        "<a href=\"{}\" target=\"_blank\" rel=\"noopener\" class=\"button preview-btn\" style=\"margin-left: 10px; color: white;\">Preview</a>",
        escape_html(href)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::char_counter::CounterStyle;

    #[test]
    fn counter_markup_carries_style() {
        let html = render_char_counter(&CounterView {
            text: "10/10".into(),
            style: CounterStyle::Warning,
        });
        assert_eq!(
            html,
            "<small class=\"char-counter text-danger float-end\">10/10</small>"
        );
    }

    #[test]
    fn preview_markup_escapes_urls() {
        assert!(render_image_preview("data:image/png;base64,\"x").contains("&quot;x"));
        assert!(render_preview_button("/admin/page/1/preview/").contains("target=\"_blank\""));
        assert!(render_required_error().contains("This field is required"));
    }
}
