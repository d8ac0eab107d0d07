use crate::services::Notice;
use crate::templates::escape_html;

pub const NOTICE_REGION_CLASS: &str = "widget-notices";

pub fn render_notice(notice: &Notice) -> String {
    format!(
        "<div class=\"widget-notice {}\" role=\"status\">{}</div>",
        notice.level.class_name(),
        escape_html(&notice.message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_notice_escapes_message() {
        let html = render_notice(&Notice::error("HTTP 500: <html>"));
        assert_eq!(
            html,
            "<div class=\"widget-notice notice-error\" role=\"status\">HTTP 500: &lt;html&gt;</div>"
        );
    }
}
