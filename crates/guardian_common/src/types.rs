//! Core data types for the Factory Guardian dashboard.
//!
//! Wire format is JSON with camelCase keys. Risk scores are clamped to
//! [0, 100] while decoding, so every value held in memory is in range.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// Highest possible risk score
pub const MAX_RISK_SCORE: u8 = 100;

/// Operational status of a machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineStatus {
    Operational,
    Maintenance,
    Offline,
}

/// Alert severity as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A monitored machine on the factory floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(alias = "risk_score", deserialize_with = "deserialize_risk_score")]
    pub risk_score: u8,
    pub last_updated: DateTime<Utc>,
    pub status: MachineStatus,
}

/// A safety alert raised against a machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub message: String,
    #[serde(alias = "risk_score", deserialize_with = "deserialize_risk_score")]
    pub risk_score: u8,
    pub timestamp: DateTime<Utc>,
    #[serde(alias = "machine_id")]
    pub machine_id: String,
    pub severity: Severity,
    #[serde(default)]
    pub acknowledged: bool,
}

/// The full payload returned by one poll cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    #[serde(default)]
    pub machines: Vec<Machine>,
    #[serde(default)]
    pub alerts: Vec<Alert>,
    pub last_updated: DateTime<Utc>,
}

/// Response envelope used by every backend endpoint that returns a body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl DashboardSnapshot {
    /// Empty snapshot stamped with the given time
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            machines: Vec::new(),
            alerts: Vec::new(),
            last_updated: now,
        }
    }

    /// Enforce in-memory invariants: scores in range, ids unique.
    ///
    /// Duplicate ids keep their first occurrence.
    pub fn normalize(mut self) -> Self {
        for machine in &mut self.machines {
            machine.risk_score = clamp_score(machine.risk_score as f64);
        }
        for alert in &mut self.alerts {
            alert.risk_score = clamp_score(alert.risk_score as f64);
        }

        let mut seen = HashSet::new();
        self.machines.retain(|m| {
            let fresh = seen.insert(m.id.clone());
            if !fresh {
                warn!("Dropping duplicate machine id {}", m.id);
            }
            fresh
        });

        let mut seen = HashSet::new();
        self.alerts.retain(|a| {
            let fresh = seen.insert(a.id.clone());
            if !fresh {
                warn!("Dropping duplicate alert id {}", a.id);
            }
            fresh
        });

        self
    }

    /// Look up an alert by id
    pub fn alert(&self, id: &str) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    /// Look up a machine by id
    pub fn machine(&self, id: &str) -> Option<&Machine> {
        self.machines.iter().find(|m| m.id == id)
    }
}

/// Round and clamp an arbitrary score into [0, 100]
pub fn clamp_score(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, MAX_RISK_SCORE as f64) as u8
}

fn deserialize_risk_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(clamp_score(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine_json(id: &str, score: &str) -> String {
        format!(
            r#"{{"id":"{id}","name":"Press","location":"Floor 1","riskScore":{score},
               "lastUpdated":"2024-05-01T10:00:00Z","status":"operational"}}"#
        )
    }

    #[test]
    fn test_decodes_camel_case_machine() {
        let machine: Machine = serde_json::from_str(&machine_json("m1", "42")).unwrap();
        assert_eq!(machine.id, "m1");
        assert_eq!(machine.risk_score, 42);
        assert_eq!(machine.status, MachineStatus::Operational);
    }

    #[test]
    fn test_risk_score_is_clamped_on_decode() {
        let high: Machine = serde_json::from_str(&machine_json("m1", "250")).unwrap();
        let low: Machine = serde_json::from_str(&machine_json("m2", "-7")).unwrap();
        let frac: Machine = serde_json::from_str(&machine_json("m3", "49.6")).unwrap();
        assert_eq!(high.risk_score, 100);
        assert_eq!(low.risk_score, 0);
        assert_eq!(frac.risk_score, 50);
    }

    #[test]
    fn test_accepts_snake_case_risk_score() {
        let json = r#"{"id":"a1","message":"Hot","risk_score":85,
            "timestamp":"2024-05-01T10:00:00Z","machine_id":"m1","severity":"high"}"#;
        let alert: Alert = serde_json::from_str(json).unwrap();
        assert_eq!(alert.risk_score, 85);
        assert_eq!(alert.machine_id, "m1");
        assert!(!alert.acknowledged);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let json = machine_json("m1", "10").replace("operational", "exploded");
        assert!(serde_json::from_str::<Machine>(&json).is_err());
    }

    #[test]
    fn test_normalize_drops_duplicate_ids() {
        let json = format!(
            r#"{{"machines":[{},{}],"alerts":[],"lastUpdated":"2024-05-01T10:00:00Z"}}"#,
            machine_json("m1", "10"),
            machine_json("m1", "90")
        );
        let snapshot: DashboardSnapshot = serde_json::from_str(&json).unwrap();
        let snapshot = snapshot.normalize();
        assert_eq!(snapshot.machines.len(), 1);
        assert_eq!(snapshot.machines[0].risk_score, 10);
    }

    #[test]
    fn test_normalize_clamps_constructed_scores() {
        let now = Utc::now();
        let mut snapshot = DashboardSnapshot::empty(now);
        snapshot.machines.push(Machine {
            id: "m1".to_string(),
            name: "Press".to_string(),
            location: "Floor".to_string(),
            risk_score: 200,
            last_updated: now,
            status: MachineStatus::Offline,
        });
        assert_eq!(snapshot.normalize().machines[0].risk_score, 100);
    }

    #[test]
    fn test_envelope_decodes_without_message() {
        let json = r#"{"data":{"machines":[],"alerts":[],"lastUpdated":"2024-05-01T10:00:00Z"},
            "success":true,"timestamp":"2024-05-01T10:00:01Z"}"#;
        let envelope: ApiResponse<DashboardSnapshot> = serde_json::from_str(json).unwrap();
        assert!(envelope.success);
        assert!(envelope.message.is_none());
        assert!(envelope.data.machines.is_empty());
    }

    #[test]
    fn test_clamp_score_handles_non_finite() {
        assert_eq!(clamp_score(f64::NAN), 0);
        assert_eq!(clamp_score(f64::INFINITY), 0);
        assert_eq!(clamp_score(99.4), 99);
    }
}
