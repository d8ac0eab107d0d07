//! Browser widgets for the portal: sortable and drag-reorderable admin
//! tables, the countdown-gated download link, form conveniences and the
//! dashboard's peripheral behaviours.
//!
//! Everything outside `controller` is plain Rust and runs natively in
//! tests; `controller` binds it to the DOM when built for `wasm32`.

pub mod animations;
pub mod bulk_actions;
pub mod char_counter;
pub mod charts;
pub mod compare;
pub mod config;
pub mod count_up;
pub mod countdown;
pub mod export;
pub mod field_visibility;
pub mod image_preview;
pub mod live_badges;
pub mod logging;
pub mod menus;
pub mod reorder;
pub mod services;
pub mod slug;
pub mod stats;
pub mod table_sort;
pub mod templates;
pub mod tooltip;
pub mod validation;

#[cfg(target_arch = "wasm32")]
pub mod controller;

pub use compare::{compare, SortDirection};
pub use services::{Notice, PageContext, PageService, TimerHandle, WidgetError, WidgetResult};
