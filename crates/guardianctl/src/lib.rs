//! Guardianctl library - dashboard client for Factory Guardian
//!
//! Exposes modules for integration tests.

pub mod announcer;
pub mod api;
pub mod commands;
pub mod errors;
pub mod logging;
pub mod poller;
pub mod render;
pub mod source;
pub mod store;

pub use api::{DashboardApi, HttpDashboardApi};
pub use poller::{PollUpdate, Poller};
pub use source::{FallbackSource, Fetched};
pub use store::DashboardStore;
