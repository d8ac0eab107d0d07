use crate::config::StatusToggleConfig;

/// Publish/expire date fields are shown only for the configured status.
pub fn date_fields_visible(status: &str, config: &StatusToggleConfig) -> bool {
    status == config.visible_when
}
