//! Property-style checks for derived state and fixture perturbation
//!
//! Inputs come from a seeded generator so failures are reproducible.
//!
//! ## Invariants Tested
//!
//! - Footer state is critical iff some machine scores >= 80, else warning
//!   iff some machine scores >= 50, else normal
//! - Alert summary total equals the alert count and critical + warning <= total
//! - Perturbed fixture scores stay within [0, 100]

use chrono::Utc;
use guardian_common::derived::{alert_summary, footer_state};
use guardian_common::fixture::{self, perturb, ALERT_VARIATION, MACHINE_VARIATION};
use guardian_common::{Alert, FooterState, Machine, MachineStatus, Severity};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ============================================================================
// TEST HELPERS
// ============================================================================

fn random_machines(rng: &mut StdRng) -> Vec<Machine> {
    let count = rng.gen_range(0..12);
    (0..count)
        .map(|i| Machine {
            id: format!("machine-{:03}", i),
            name: format!("Machine {}", i),
            location: "Production Floor 1".to_string(),
            risk_score: rng.gen_range(0..=100),
            last_updated: Utc::now(),
            status: MachineStatus::Operational,
        })
        .collect()
}

fn random_alerts(rng: &mut StdRng) -> Vec<Alert> {
    let count = rng.gen_range(0..12);
    (0..count)
        .map(|i| Alert {
            id: format!("alert-{:03}", i),
            message: format!("Alert {}", i),
            risk_score: rng.gen_range(0..=100),
            timestamp: Utc::now(),
            machine_id: "machine-001".to_string(),
            severity: Severity::Low,
            acknowledged: rng.gen_bool(0.5),
        })
        .collect()
}

// ============================================================================
// PROPERTIES
// ============================================================================

#[test]
fn prop_footer_state_follows_worst_machine() {
    let mut rng = StdRng::seed_from_u64(0xF00D);
    for _ in 0..1_000 {
        let machines = random_machines(&mut rng);
        let any_critical = machines.iter().any(|m| m.risk_score >= 80);
        let any_warning = machines.iter().any(|m| m.risk_score >= 50);

        let expected = if any_critical {
            FooterState::Critical
        } else if any_warning {
            FooterState::Warning
        } else {
            FooterState::Normal
        };
        assert_eq!(footer_state(&machines), expected);
    }
}

#[test]
fn prop_alert_summary_counts_are_consistent() {
    let mut rng = StdRng::seed_from_u64(0xA1E7);
    for _ in 0..1_000 {
        let alerts = random_alerts(&mut rng);
        let summary = alert_summary(&alerts);

        assert_eq!(summary.total, alerts.len());
        assert!(summary.critical + summary.warning <= summary.total);
        assert_eq!(
            summary.critical,
            alerts.iter().filter(|a| a.risk_score >= 80).count()
        );
    }
}

#[test]
fn prop_perturbation_stays_in_range() {
    for seed in [0u64, 100] {
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..1_000 {
            for base in [0u8, 100] {
                let machine = perturb(base, MACHINE_VARIATION, &mut rng);
                let alert = perturb(base, ALERT_VARIATION, &mut rng);
                assert!(machine <= 100);
                assert!(alert <= 100);
                assert!(machine.abs_diff(base) <= MACHINE_VARIATION);
                assert!(alert.abs_diff(base) <= ALERT_VARIATION);
            }
        }
    }
}

#[test]
fn prop_synthesized_snapshots_stay_in_range() {
    let mut rng = StdRng::seed_from_u64(0);
    for _ in 0..1_000 {
        let snapshot = fixture::synthesize(&mut rng, Utc::now());
        assert!(snapshot.machines.iter().all(|m| m.risk_score <= 100));
        assert!(snapshot.alerts.iter().all(|a| a.risk_score <= 100));
        assert!(snapshot.alerts.len() <= fixture::FIXTURE_ALERT_LIMIT);
    }
}

#[test]
fn test_empty_machine_set_is_normal() {
    assert_eq!(footer_state(&[]), FooterState::Normal);
}
