//! Built-in fallback data
//!
//! Used when the backend cannot be reached. Scores get a small random
//! variation on every call so the dashboard still looks alive.

use crate::types::{clamp_score, Alert, DashboardSnapshot, Machine, MachineStatus, Severity};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// Maximum variation applied to machine scores
pub const MACHINE_VARIATION: u8 = 10;

/// Maximum variation applied to alert scores
pub const ALERT_VARIATION: u8 = 5;

/// Alerts returned by a synthesized snapshot
pub const FIXTURE_ALERT_LIMIT: usize = 5;

struct FixtureMachine {
    id: &'static str,
    name: &'static str,
    location: &'static str,
    risk_score: u8,
    status: MachineStatus,
}

struct FixtureAlert {
    id: &'static str,
    message: &'static str,
    risk_score: u8,
    minutes_ago: i64,
    machine_id: &'static str,
    severity: Severity,
    acknowledged: bool,
}

const MACHINES: &[FixtureMachine] = &[
    FixtureMachine {
        id: "machine-001",
        name: "Conveyor Belt A",
        location: "Production Floor 1",
        risk_score: 25,
        status: MachineStatus::Operational,
    },
    FixtureMachine {
        id: "machine-002",
        name: "Hydraulic Press B",
        location: "Production Floor 1",
        risk_score: 45,
        status: MachineStatus::Operational,
    },
    FixtureMachine {
        id: "machine-003",
        name: "Welding Station C",
        location: "Production Floor 2",
        risk_score: 75,
        status: MachineStatus::Operational,
    },
    FixtureMachine {
        id: "machine-004",
        name: "Assembly Line D",
        location: "Production Floor 2",
        risk_score: 15,
        status: MachineStatus::Operational,
    },
    FixtureMachine {
        id: "machine-005",
        name: "Quality Control E",
        location: "Production Floor 3",
        risk_score: 85,
        status: MachineStatus::Operational,
    },
    FixtureMachine {
        id: "machine-006",
        name: "Packaging Unit F",
        location: "Production Floor 3",
        risk_score: 35,
        status: MachineStatus::Maintenance,
    },
];

const ALERTS: &[FixtureAlert] = &[
    FixtureAlert {
        id: "alert-001",
        message: "High temperature detected in Welding Station C",
        risk_score: 75,
        minutes_ago: 5,
        machine_id: "machine-003",
        severity: Severity::High,
        acknowledged: false,
    },
    FixtureAlert {
        id: "alert-002",
        message: "Vibration levels elevated in Hydraulic Press B",
        risk_score: 45,
        minutes_ago: 15,
        machine_id: "machine-002",
        severity: Severity::Medium,
        acknowledged: false,
    },
    FixtureAlert {
        id: "alert-003",
        message: "Maintenance required for Packaging Unit F",
        risk_score: 35,
        minutes_ago: 30,
        machine_id: "machine-006",
        severity: Severity::Medium,
        acknowledged: true,
    },
    FixtureAlert {
        id: "alert-004",
        message: "Safety system check completed for Conveyor Belt A",
        risk_score: 25,
        minutes_ago: 45,
        machine_id: "machine-001",
        severity: Severity::Low,
        acknowledged: true,
    },
    FixtureAlert {
        id: "alert-005",
        message: "Critical failure risk in Quality Control E",
        risk_score: 85,
        minutes_ago: 60,
        machine_id: "machine-005",
        severity: Severity::High,
        acknowledged: false,
    },
];

/// Shift `base` by a uniform amount in [-max_variation, max_variation]
pub fn perturb<R: Rng + ?Sized>(base: u8, max_variation: u8, rng: &mut R) -> u8 {
    let spread = max_variation as f64;
    let variation = if max_variation == 0 {
        0.0
    } else {
        rng.gen_range(-spread..=spread)
    };
    clamp_score(base as f64 + variation)
}

/// The fixture exactly as written, stamped with `now`
pub fn baseline(now: DateTime<Utc>) -> DashboardSnapshot {
    DashboardSnapshot {
        machines: MACHINES.iter().map(|m| m.to_machine(m.risk_score, now)).collect(),
        alerts: ALERTS
            .iter()
            .take(FIXTURE_ALERT_LIMIT)
            .map(|a| a.to_alert(a.risk_score, now))
            .collect(),
        last_updated: now,
    }
}

/// Fixture snapshot with perturbed scores
pub fn synthesize<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> DashboardSnapshot {
    let machines = MACHINES
        .iter()
        .map(|m| m.to_machine(perturb(m.risk_score, MACHINE_VARIATION, rng), now))
        .collect();

    let alerts = ALERTS
        .iter()
        .take(FIXTURE_ALERT_LIMIT)
        .map(|a| a.to_alert(perturb(a.risk_score, ALERT_VARIATION, rng), now))
        .collect();

    DashboardSnapshot {
        machines,
        alerts,
        last_updated: now,
    }
}

impl FixtureMachine {
    fn to_machine(&self, risk_score: u8, now: DateTime<Utc>) -> Machine {
        Machine {
            id: self.id.to_string(),
            name: self.name.to_string(),
            location: self.location.to_string(),
            risk_score,
            last_updated: now,
            status: self.status,
        }
    }
}

impl FixtureAlert {
    fn to_alert(&self, risk_score: u8, now: DateTime<Utc>) -> Alert {
        Alert {
            id: self.id.to_string(),
            message: self.message.to_string(),
            risk_score,
            timestamp: now - Duration::minutes(self.minutes_ago),
            machine_id: self.machine_id.to_string(),
            severity: self.severity,
            acknowledged: self.acknowledged,
        }
    }
}
