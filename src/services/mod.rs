use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use url::Url;

use crate::config::PageConfig;

#[cfg(target_arch = "wasm32")]
pub mod http;

pub type WidgetResult<T> = Result<T, WidgetError>;

pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";

#[derive(Clone, Debug, Error, PartialEq)]
pub enum WidgetError {
    #[error("network failure: {0}")]
    NetworkFailure(String),
    #[error("validation failure: {0}")]
    ValidationFailure(String),
    #[error("parse failure: {0}")]
    ParseFailure(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("dom error: {0}")]
    Dom(String),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn class_name(self) -> &'static str {
        match self {
            NoticeLevel::Info => "notice-info",
            NoticeLevel::Warning => "notice-warning",
            NoticeLevel::Error => "notice-error",
        }
    }
}

/// Inline, non-blocking message shown next to the widget that produced it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// String-keyed bag of values read from an element's `data-*` attributes.
#[derive(Clone, Debug, Default)]
pub struct AttributeBag {
    inner: HashMap<String, Value>,
}

impl AttributeBag {
    pub fn new() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }

    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut bag = Self::new();
        for (key, value) in pairs {
            bag.set(key.trim_start_matches("data-"), value);
        }
        bag
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: T) {
        self.inner.insert(
            key.to_string(),
            serde_json::to_value(value).unwrap_or(Value::Null),
        );
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Integer value, accepting numbers or strings with a leading integer
    /// (`"30"`, `"30s"`); anything else is `None`.
    pub fn int(&self, key: &str) -> Option<i64> {
        match self.inner.get(key)? {
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|f| f.trunc() as i64)),
            Value::String(text) => leading_integer(text),
            _ => None,
        }
    }

    pub fn require_int(&self, key: &str) -> WidgetResult<i64> {
        if !self.contains(key) {
            return Err(WidgetError::Config(format!("missing data-{key}")));
        }
        self.int(key)
            .ok_or_else(|| WidgetError::Config(format!("data-{key} is not an integer")))
    }
}

pub(crate) fn leading_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let mut end = 0;
    for (index, ch) in trimmed.char_indices() {
        let sign = index == 0 && (ch == '-' || ch == '+');
        if !(sign || ch.is_ascii_digit()) {
            break;
        }
        end = index + ch.len_utf8();
    }
    trimmed[..end].parse().ok()
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Form-encoded request handed to the transport.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FormRequest {
    pub method: HttpMethod,
    pub url: String,
    pub fields: Vec<(String, String)>,
}

impl FormRequest {
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            fields: Vec::new(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.push((name.to_string(), value.into()));
        self
    }

    pub fn with_csrf(self, token: Option<&str>) -> Self {
        match token {
            Some(token) if !token.trim().is_empty() => self.field(CSRF_FIELD, token),
            _ => self,
        }
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn encoded_body(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.fields.iter())
            .finish()
    }
}

/// Appends `suffix` to the page URL's path, dropping query and fragment.
pub fn endpoint_url(page_url: &str, suffix: &str) -> WidgetResult<String> {
    let mut url = Url::parse(page_url)
        .map_err(|err| WidgetError::ParseFailure(format!("page url {page_url}: {err}")))?;
    url.set_query(None);
    url.set_fragment(None);
    let mut path = url.path().to_string();
    if !path.ends_with('/') {
        path.push('/');
    }
    path.push_str(suffix.trim_start_matches('/'));
    url.set_path(&path);
    Ok(url.to_string())
}

/// Token from a `document.cookie` string, for pages without the hidden
/// form field.
pub fn csrf_from_cookie(cookie: &str) -> Option<String> {
    cookie
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == "csrftoken")
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Per-page state shared by the request-building controllers.
#[derive(Clone, Debug, Default)]
pub struct PageContext {
    pub page_url: String,
    pub csrf_token: Option<String>,
    pub config: PageConfig,
}

impl PageContext {
    pub fn new(page_url: impl Into<String>, csrf_token: Option<String>) -> Self {
        Self {
            page_url: page_url.into(),
            csrf_token,
            config: PageConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PageConfig) -> Self {
        self.config = config;
        self
    }

    pub fn endpoint(&self, suffix: &str) -> WidgetResult<String> {
        endpoint_url(&self.page_url, suffix)
    }
}

/// Cancellable handle for a repeating timer owned by a controller.
pub trait TimerHandle {
    fn cancel(self);
}

/// Page-level side effects that controllers trigger but do not own.
pub trait PageService {
    fn confirm(&self, message: &str) -> bool;
    fn reload(&self);
    fn notify(&self, notice: Notice);
}

#[derive(Debug, Default)]
struct InMemoryState {
    confirm_answer: bool,
    confirmations: Vec<String>,
    reloads: usize,
    notices: Vec<Notice>,
}

/// Recording `PageService` used outside the browser.
#[derive(Clone, Debug)]
pub struct InMemoryService {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryService {
    pub fn new(confirm_answer: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(InMemoryState {
                confirm_answer,
                ..InMemoryState::default()
            })),
        }
    }

    pub fn confirmations(&self) -> Vec<String> {
        self.with_state(|state| state.confirmations.clone())
    }

    pub fn reloads(&self) -> usize {
        self.with_state(|state| state.reloads)
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.with_state(|state| state.notices.clone())
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut InMemoryState) -> T) -> T {
        let mut guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}

impl Default for InMemoryService {
    fn default() -> Self {
        Self::new(true)
    }
}

impl PageService for InMemoryService {
    fn confirm(&self, message: &str) -> bool {
        self.with_state(|state| {
            state.confirmations.push(message.to_string());
            state.confirm_answer
        })
    }

    fn reload(&self) {
        self.with_state(|state| state.reloads += 1);
    }

    fn notify(&self, notice: Notice) {
        self.with_state(|state| state.notices.push(notice));
    }
}
