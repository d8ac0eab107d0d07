use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::config::PollConfig;
use crate::services::{
    FormRequest, Notice, PageContext, PageService, TimerHandle, WidgetError, WidgetResult,
};

/// Totals as the server sent them; each is shown verbatim.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct StatsSnapshot {
    pub total_views: Value,
    pub total_pages: Value,
    pub total_comments: Value,
}

fn display_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl StatsSnapshot {
    pub fn parse(body: &str) -> WidgetResult<Self> {
        serde_json::from_str(body)
            .map_err(|err| WidgetError::ParseFailure(format!("stats response: {err}")))
    }

    /// `(selector, text)` pairs for the display elements.
    pub fn display(&self) -> [(&'static str, String); 3] {
        [
            (".total-views", display_text(&self.total_views)),
            (".total-pages", display_text(&self.total_pages)),
            (".total-comments", display_text(&self.total_comments)),
        ]
    }
}

pub fn stats_request(ctx: &PageContext) -> WidgetResult<FormRequest> {
    Ok(FormRequest::get(ctx.endpoint(&ctx.config.stats_suffix)?))
}

/// Periodic stats refresh. A failed poll is reported once per run of
/// failures; polling keeps going either way.
pub struct StatsPoller<S: PageService, T: TimerHandle> {
    service: S,
    config: PollConfig,
    timer: Option<T>,
    failing: bool,
}

impl<S: PageService, T: TimerHandle> StatsPoller<S, T> {
    pub fn new(service: S, config: PollConfig) -> Self {
        Self {
            service,
            config,
            timer: None,
            failing: false,
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.config.interval_ms
    }

    pub fn attach_timer(&mut self, timer: T) {
        if let Some(previous) = self.timer.replace(timer) {
            previous.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Handles one poll response; returns the snapshot to render.
    pub fn on_response(&mut self, result: WidgetResult<String>) -> Option<StatsSnapshot> {
        match result.and_then(|body| StatsSnapshot::parse(&body)) {
            Ok(snapshot) => {
                self.failing = false;
                Some(snapshot)
            }
            Err(err) => {
                warn!(error = %err, "stats poll failed");
                if !self.failing {
                    self.service
                        .notify(Notice::warning(format!("Live statistics are unavailable: {err}")));
                }
                self.failing = true;
                None
            }
        }
    }

    pub fn teardown(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

impl<S: PageService, T: TimerHandle> Drop for StatsPoller<S, T> {
    fn drop(&mut self) {
        self.teardown();
    }
}
