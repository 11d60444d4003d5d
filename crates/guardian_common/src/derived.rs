//! Derived dashboard state
//!
//! Everything here is a pure function of a snapshot. Nothing is persisted;
//! callers recompute after every applied snapshot.

use crate::types::{Alert, DashboardSnapshot, Machine, MachineStatus};
use serde::{Deserialize, Serialize};

/// Score at or above which a machine or alert is critical
pub const CRITICAL_THRESHOLD: u8 = 80;

/// Score at or above which a machine or alert needs attention
pub const WARNING_THRESHOLD: u8 = 50;

/// How many alerts the recent-alerts panel shows
pub const RECENT_ALERT_LIMIT: usize = 5;

/// Aggregate severity driven by the worst machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FooterState {
    Normal,
    Warning,
    Critical,
}

impl FooterState {
    /// Bucket a single score
    pub fn from_score(score: u8) -> Self {
        if score >= CRITICAL_THRESHOLD {
            FooterState::Critical
        } else if score >= WARNING_THRESHOLD {
            FooterState::Warning
        } else {
            FooterState::Normal
        }
    }
}

/// Alert counts shown in the footer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSummary {
    pub total: usize,
    pub critical: usize,
    pub warning: usize,
}

/// Machine counts shown above the machine grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineSummary {
    pub total: usize,
    pub operational: usize,
    pub high_risk: usize,
    pub maintenance: usize,
}

/// Traffic-light bucket for an individual score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Traffic-light color for a risk level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskColor {
    Green,
    Yellow,
    Red,
}

impl RiskLevel {
    /// 0-30 low, 31-70 medium, 71-100 high
    pub fn from_score(score: u8) -> Self {
        if score <= 30 {
            RiskLevel::Low
        } else if score <= 70 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn color(self) -> RiskColor {
        match self {
            RiskLevel::Low => RiskColor::Green,
            RiskLevel::Medium => RiskColor::Yellow,
            RiskLevel::High => RiskColor::Red,
        }
    }
}

/// All derived values for one snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedState {
    pub footer_state: FooterState,
    pub alert_summary: AlertSummary,
    pub machine_summary: MachineSummary,
}

impl DerivedState {
    pub fn from_snapshot(snapshot: &DashboardSnapshot) -> Self {
        Self {
            footer_state: footer_state(&snapshot.machines),
            alert_summary: alert_summary(&snapshot.alerts),
            machine_summary: machine_summary(&snapshot.machines),
        }
    }
}

impl Default for DerivedState {
    fn default() -> Self {
        Self {
            footer_state: FooterState::Normal,
            alert_summary: AlertSummary::default(),
            machine_summary: MachineSummary::default(),
        }
    }
}

/// Footer severity from the highest machine score (0 when empty)
pub fn footer_state(machines: &[Machine]) -> FooterState {
    let max_score = machines.iter().map(|m| m.risk_score).max().unwrap_or(0);
    FooterState::from_score(max_score)
}

pub fn alert_summary(alerts: &[Alert]) -> AlertSummary {
    AlertSummary {
        total: alerts.len(),
        critical: alerts
            .iter()
            .filter(|a| a.risk_score >= CRITICAL_THRESHOLD)
            .count(),
        warning: alerts
            .iter()
            .filter(|a| a.risk_score >= WARNING_THRESHOLD && a.risk_score < CRITICAL_THRESHOLD)
            .count(),
    }
}

pub fn machine_summary(machines: &[Machine]) -> MachineSummary {
    MachineSummary {
        total: machines.len(),
        operational: machines
            .iter()
            .filter(|m| m.status == MachineStatus::Operational)
            .count(),
        high_risk: machines.iter().filter(|m| m.risk_score > 70).count(),
        maintenance: machines
            .iter()
            .filter(|m| m.status == MachineStatus::Maintenance)
            .count(),
    }
}

/// Alerts that get flashed and spoken
pub fn critical_alerts(alerts: &[Alert]) -> impl Iterator<Item = &Alert> {
    alerts.iter().filter(|a| a.risk_score >= CRITICAL_THRESHOLD)
}

/// First few alerts in snapshot order
pub fn recent_alerts(alerts: &[Alert]) -> &[Alert] {
    &alerts[..alerts.len().min(RECENT_ALERT_LIMIT)]
}
