//! Guardian Common - shared types for the Factory Guardian dashboard
//!
//! Data model, derived state, fallback fixture, translations and
//! configuration. No I/O beyond reading the config file.

pub mod config;
pub mod derived;
pub mod error;
pub mod fixture;
pub mod i18n;
pub mod types;

pub use config::GuardianConfig;
pub use derived::{AlertSummary, DerivedState, FooterState, MachineSummary, RiskColor, RiskLevel};
pub use error::{AckError, ConfigError, FetchError};
pub use i18n::{translate, Locale, TextKey};
pub use types::{Alert, ApiResponse, DashboardSnapshot, Machine, MachineStatus, Severity};
