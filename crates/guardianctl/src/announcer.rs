//! Spoken announcements for critical alerts
//!
//! Every alert at or above the critical threshold is spoken once per session.

use guardian_common::derived::critical_alerts;
use guardian_common::Alert;
use std::collections::HashSet;
use tracing::{info, warn};

/// Output channel for announcements
pub trait Speaker: Send + Sync {
    fn speak(&self, text: &str);
}

/// Runs an external speech program (`spd-say`, `espeak`, ...) with the text
/// as its only argument.
pub struct CommandSpeaker {
    program: String,
}

impl CommandSpeaker {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Speaker for CommandSpeaker {
    /// Must be called inside a tokio runtime.
    fn speak(&self, text: &str) {
        match tokio::process::Command::new(&self.program).arg(text).spawn() {
            Ok(mut child) => {
                let program = self.program.clone();
                tokio::spawn(async move {
                    match child.wait().await {
                        Ok(status) if status.success() => {}
                        Ok(status) => warn!("{} exited with {}", program, status),
                        Err(e) => warn!("Error waiting for {}: {}", program, e),
                    }
                });
            }
            Err(e) => {
                warn!("Cannot run speech command {}: {}", self.program, e);
            }
        }
    }
}

/// Writes announcements to the log only
pub struct LogSpeaker;

impl Speaker for LogSpeaker {
    fn speak(&self, text: &str) {
        info!("Announcement: {}", text);
    }
}

pub struct Announcer {
    speaker: Box<dyn Speaker>,
    spoken: HashSet<String>,
}

impl Announcer {
    pub fn new(speaker: Box<dyn Speaker>) -> Self {
        Self {
            speaker,
            spoken: HashSet::new(),
        }
    }

    /// Speak critical alerts not yet announced. Returns how many were spoken.
    pub fn announce(&mut self, alerts: &[Alert]) -> usize {
        let mut count = 0;
        for alert in critical_alerts(alerts) {
            if self.spoken.insert(alert.id.clone()) {
                self.speaker.speak(&announcement(alert));
                count += 1;
            }
        }
        count
    }

    pub fn has_spoken(&self, alert_id: &str) -> bool {
        self.spoken.contains(alert_id)
    }
}

/// "Critical failure risk in Quality Control E. Score 85"
pub fn announcement(alert: &Alert) -> String {
    format!("{}. Score {}", alert.message, alert.risk_score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use guardian_common::fixture;
    use std::sync::{Arc, Mutex};

    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl Speaker for Recorder {
        fn speak(&self, text: &str) {
            self.0.lock().unwrap().push(text.to_string());
        }
    }

    #[test]
    fn test_critical_alerts_spoken_once() {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        let mut announcer = Announcer::new(Box::new(Recorder(Arc::clone(&spoken))));
        let alerts = fixture::baseline(Utc::now()).alerts;

        assert_eq!(announcer.announce(&alerts), 1);
        assert_eq!(announcer.announce(&alerts), 0);

        let spoken = spoken.lock().unwrap();
        assert_eq!(
            *spoken,
            vec!["Critical failure risk in Quality Control E. Score 85".to_string()]
        );
        assert!(announcer.has_spoken("alert-005"));
        assert!(!announcer.has_spoken("alert-001"));
    }

    #[test]
    fn test_alert_crossing_threshold_is_spoken() {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        let mut announcer = Announcer::new(Box::new(Recorder(Arc::clone(&spoken))));
        let mut alerts = fixture::baseline(Utc::now()).alerts;

        announcer.announce(&alerts);
        alerts[0].risk_score = 80;
        assert_eq!(announcer.announce(&alerts), 1);
        assert_eq!(spoken.lock().unwrap().len(), 2);
    }
}
