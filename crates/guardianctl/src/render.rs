//! Plain terminal output for the dashboard
//!
//! ASCII indicators, optional ANSI color. Labels come from the translation
//! table for the chosen locale.

use chrono::{DateTime, Utc};
use guardian_common::derived::recent_alerts;
use guardian_common::i18n::relative_time;
use guardian_common::{
    translate, Alert, DerivedState, FooterState, Locale, Machine, MachineStatus, RiskColor,
    RiskLevel, Severity, TextKey,
};
use owo_colors::OwoColorize;
use std::fmt::Write;

pub const SEPARATOR: &str = "------------------------------------------------------------";

/// Rendering options
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub locale: Locale,
    pub color: bool,
}

/// Everything the renderer needs for one frame
pub struct Frame<'a> {
    pub machines: &'a [Machine],
    pub alerts: &'a [Alert],
    pub derived: &'a DerivedState,
    pub last_update: Option<DateTime<Utc>>,
    /// Advisory banner text when the data is synthetic
    pub error: Option<&'a str>,
    pub now: DateTime<Utc>,
}

pub fn render(frame: &Frame<'_>, opts: RenderOptions) -> String {
    let t = |key| translate(opts.locale, key);
    let mut out = String::new();

    // Header
    let _ = writeln!(
        out,
        "{} - {}",
        paint_bold(t(TextKey::FactoryGuardian), opts.color),
        t(TextKey::Dashboard)
    );
    if let Some(at) = frame.last_update {
        let _ = writeln!(
            out,
            "{}: {}",
            t(TextKey::LastUpdated),
            relative_time(opts.locale, at, frame.now)
        );
    }
    if opts.locale.is_rtl() {
        let _ = writeln!(out, "[RTL]");
    }

    if let Some(error) = frame.error {
        let _ = writeln!(out);
        let banner = format!("[OFFLINE] {}: {}", t(TextKey::ErrorLoadingData), error);
        let _ = writeln!(out, "{}", paint_risk(&banner, RiskColor::Red, opts.color));
        let _ = writeln!(out, "{}", t(TextKey::MockDataNotice));
    }

    // Machines
    let summary = &frame.derived.machine_summary;
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", paint_bold(t(TextKey::MachineStatus), opts.color));
    let _ = writeln!(out, "{}", SEPARATOR);
    let _ = writeln!(
        out,
        "{}: {}  {}: {}  {}: {}  {}: {}",
        t(TextKey::Total),
        summary.total,
        t(TextKey::Operational),
        summary.operational,
        t(TextKey::HighRisk),
        summary.high_risk,
        t(TextKey::Maintenance),
        summary.maintenance
    );
    for machine in frame.machines {
        let _ = writeln!(out, "{}", machine_line(machine, opts));
    }

    // Alerts
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", paint_bold(t(TextKey::Alerts), opts.color));
    let _ = writeln!(out, "{}", SEPARATOR);
    let recent = recent_alerts(frame.alerts);
    if recent.is_empty() {
        let _ = writeln!(out, "{}", t(TextKey::NoAlerts));
        let _ = writeln!(out, "{}", t(TextKey::AllSystemsOperational));
    }
    for alert in recent {
        let _ = writeln!(out, "{}", alert_line(alert, opts));
    }

    // Footer
    let _ = writeln!(out, "{}", SEPARATOR);
    let _ = writeln!(out, "{}", footer_line(frame.derived, opts));

    out
}

/// Traffic-light tag for a score
pub fn traffic_light(score: u8) -> &'static str {
    match RiskLevel::from_score(score).color() {
        RiskColor::Green => "[GREEN]",
        RiskColor::Yellow => "[YELLOW]",
        RiskColor::Red => "[RED]",
    }
}

fn machine_line(machine: &Machine, opts: RenderOptions) -> String {
    let light = traffic_light(machine.risk_score);
    let color = RiskLevel::from_score(machine.risk_score).color();
    format!(
        "{:<8} {:<20} {:<20} {}: {:>3}  {}",
        paint_risk(light, color, opts.color),
        machine.name,
        machine.location,
        translate(opts.locale, TextKey::RiskScore),
        machine.risk_score,
        translate(opts.locale, status_key(machine.status))
    )
}

fn alert_line(alert: &Alert, opts: RenderOptions) -> String {
    let t = |key| translate(opts.locale, key);
    let badge = t(severity_key(alert.severity));
    let state = if alert.acknowledged {
        t(TextKey::Acknowledged).to_string()
    } else {
        format!("{} [{}]", t(TextKey::NewAlert), alert.id)
    };
    let color = RiskLevel::from_score(alert.risk_score).color();
    let marker = if alert.risk_score >= guardian_common::derived::CRITICAL_THRESHOLD {
        "!!"
    } else {
        "  "
    };

    format!(
        "{} {} {} (Risk: {}) - {} - {}",
        paint_risk(marker, color, opts.color),
        paint_risk(badge, color, opts.color),
        alert.message,
        alert.risk_score,
        alert.timestamp.format("%Y-%m-%d %H:%M:%S"),
        state
    )
}

fn footer_line(derived: &DerivedState, opts: RenderOptions) -> String {
    let t = |key| translate(opts.locale, key);
    let (label, color) = match derived.footer_state {
        FooterState::Normal => (t(TextKey::AllSystemsOperational), RiskColor::Green),
        FooterState::Warning => (t(TextKey::AttentionRequired), RiskColor::Yellow),
        FooterState::Critical => (t(TextKey::CriticalAlert), RiskColor::Red),
    };
    let summary = &derived.alert_summary;
    let text = format!(
        "{} | {}: {} ({} {}, {} {})",
        label,
        t(TextKey::Alerts),
        summary.total,
        t(TextKey::Critical),
        summary.critical,
        t(TextKey::Warning),
        summary.warning
    );
    paint_risk(&text, color, opts.color)
}

fn status_key(status: MachineStatus) -> TextKey {
    match status {
        MachineStatus::Operational => TextKey::Operational,
        MachineStatus::Maintenance => TextKey::Maintenance,
        MachineStatus::Offline => TextKey::Offline,
    }
}

fn severity_key(severity: Severity) -> TextKey {
    match severity {
        Severity::Low => TextKey::LowRisk,
        Severity::Medium => TextKey::MediumRisk,
        Severity::High => TextKey::HighRisk,
    }
}

fn paint_risk(text: &str, color: RiskColor, enabled: bool) -> String {
    if !enabled {
        return text.to_string();
    }
    match color {
        RiskColor::Green => text.bright_green().to_string(),
        RiskColor::Yellow => text.yellow().to_string(),
        RiskColor::Red => text.bright_red().bold().to_string(),
    }
}

fn paint_bold(text: &str, enabled: bool) -> String {
    if enabled {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}
