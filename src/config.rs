use serde::Deserialize;

use crate::services::{AttributeBag, WidgetError, WidgetResult};

pub const CONFIG_ELEMENT_ID: &str = "portal-widgets-config";

/// Page-wide settings, read from the optional JSON block
/// `<script type="application/json" id="portal-widgets-config">`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    pub log_filter: String,
    pub published_status: String,
    pub countdown_seconds: i64,
    pub counter_duration_ms: u32,
    pub counter_frame_ms: u32,
    pub char_warning_ratio: f64,
    pub stats_poll_ms: u32,
    pub stats_suffix: String,
    pub reorder_suffix: String,
    pub live_badges: bool,
    pub live_badge_ms: u32,
    pub bulk_confirm_message: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".into(),
            published_status: "published".into(),
            countdown_seconds: 30,
            counter_duration_ms: 2000,
            counter_frame_ms: 16,
            char_warning_ratio: 0.9,
            stats_poll_ms: 30_000,
            stats_suffix: "stats/".into(),
            reorder_suffix: "reorder/".into(),
            live_badges: false,
            live_badge_ms: 10_000,
            bulk_confirm_message: "Are you sure?".into(),
        }
    }
}

impl PageConfig {
    pub fn from_json(raw: &str) -> WidgetResult<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(raw)
            .map_err(|err| WidgetError::Config(format!("page config: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> WidgetResult<()> {
        if self.countdown_seconds < 0 {
            return Err(WidgetError::Config("countdown_seconds must be >= 0".into()));
        }
        if self.counter_frame_ms == 0 || self.stats_poll_ms == 0 || self.live_badge_ms == 0 {
            return Err(WidgetError::Config("timer intervals must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.char_warning_ratio) {
            return Err(WidgetError::Config(
                "char_warning_ratio must be within 0..=1".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SortableTableConfig {
    /// Zero-based indices of the columns whose header carries `data-sortable`.
    pub sortable_columns: Vec<usize>,
}

impl SortableTableConfig {
    /// `headers` holds the `data-sortable` value of each sortable header; the
    /// markup numbers columns from 1.
    pub fn from_header_attributes<'a, I>(headers: I) -> WidgetResult<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut sortable_columns = Vec::new();
        for raw in headers {
            let column = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|column| *column >= 1)
                .ok_or_else(|| {
                    WidgetError::Config(format!("data-sortable expects a column number, got {raw:?}"))
                })?;
            if !sortable_columns.contains(&(column - 1)) {
                sortable_columns.push(column - 1);
            }
        }
        Ok(Self { sortable_columns })
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CountdownConfig {
    pub duration_secs: i64,
}

impl CountdownConfig {
    pub fn from_attributes(bag: &AttributeBag, page: &PageConfig) -> WidgetResult<Self> {
        let duration_secs = bag.int("duration").unwrap_or(page.countdown_seconds);
        if duration_secs < 0 {
            return Err(WidgetError::Config(format!(
                "countdown duration must not be negative, got {duration_secs}"
            )));
        }
        Ok(Self { duration_secs })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CounterConfig {
    pub target: i64,
    pub duration_ms: u32,
    pub frame_ms: u32,
}

impl CounterConfig {
    pub fn from_attributes(bag: &AttributeBag, page: &PageConfig) -> WidgetResult<Self> {
        let target = bag.require_int("target")?;
        let duration_ms = match bag.int("duration") {
            Some(value) if value > 0 => u32::try_from(value)
                .map_err(|_| WidgetError::Config(format!("data-duration too large: {value}")))?,
            Some(value) => {
                return Err(WidgetError::Config(format!(
                    "data-duration must be positive, got {value}"
                )))
            }
            None => page.counter_duration_ms,
        };
        Ok(Self {
            target,
            duration_ms,
            frame_ms: page.counter_frame_ms,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharCounterConfig {
    pub max_length: usize,
    pub warning_ratio: f64,
}

impl CharCounterConfig {
    /// `None` when the textarea has no usable `maxlength`.
    pub fn from_maxlength(raw: Option<&str>, page: &PageConfig) -> Option<Self> {
        let max_length = raw?.trim().parse::<usize>().ok().filter(|max| *max > 0)?;
        Some(Self {
            max_length,
            warning_ratio: page.char_warning_ratio,
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StatusToggleConfig {
    pub visible_when: String,
}

impl StatusToggleConfig {
    pub fn from_page(page: &PageConfig) -> Self {
        Self {
            visible_when: page.published_status.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PollConfig {
    pub interval_ms: u32,
}
