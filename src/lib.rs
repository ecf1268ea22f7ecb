//! Operator performance dashboard and survey n-gram analyzer.
//!
//! The data pipeline (`data`, `text`, `survey`) is independent of the UI;
//! `state` owns the current selections and derived results, and `app`/`ui`
//! render them with egui.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod state;
pub mod survey;
pub mod text;
pub mod ui;
