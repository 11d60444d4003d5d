//! Command implementations for guardianctl

use crate::announcer::{Announcer, CommandSpeaker, LogSpeaker, Speaker};
use crate::api::{DashboardApi, HttpDashboardApi};
use crate::errors::{EXIT_BACKEND_UNAVAILABLE, EXIT_GENERAL_ERROR, EXIT_SUCCESS};
use crate::poller::Poller;
use crate::render::{render, Frame, RenderOptions};
use crate::source::FallbackSource;
use crate::store::DashboardStore;
use anyhow::{Context, Result};
use chrono::Utc;
use guardian_common::{DashboardSnapshot, DerivedState, GuardianConfig};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// Clear screen and move the cursor home
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub struct WatchOptions {
    pub interval: Duration,
    pub speech: bool,
    pub render: RenderOptions,
}

/// A line typed into the watch session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Acknowledge(String),
    Refresh,
    Quit,
    Unknown(String),
}

impl SessionCommand {
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let head = parts.next()?;
        let command = match head {
            "a" | "ack" => match parts.next() {
                Some(id) => SessionCommand::Acknowledge(id.to_string()),
                None => SessionCommand::Unknown(line.trim().to_string()),
            },
            "r" | "refresh" => SessionCommand::Refresh,
            "q" | "quit" | "exit" => SessionCommand::Quit,
            _ => SessionCommand::Unknown(line.trim().to_string()),
        };
        Some(command)
    }
}

fn http_api(config: &GuardianConfig) -> Result<Arc<dyn DashboardApi>> {
    let api = HttpDashboardApi::new(config).context("Failed to build HTTP client")?;
    Ok(Arc::new(api))
}

/// Poll continuously and redraw on every update
pub async fn watch(config: &GuardianConfig, opts: WatchOptions) -> Result<i32> {
    let api = http_api(config)?;
    let source = Arc::new(FallbackSource::new(Arc::clone(&api)));
    let poller = Poller::start(source, opts.interval)?;
    let mut updates = poller.subscribe();

    let mut store = DashboardStore::new();
    let mut announcer = config.announce_critical.then(|| {
        let speaker: Box<dyn Speaker> = if opts.speech {
            Box::new(CommandSpeaker::new(&config.speech_command))
        } else {
            Box::new(LogSpeaker)
        };
        Announcer::new(speaker)
    });

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let update = updates.borrow_and_update().clone();
                if let Some(update) = update {
                    store.apply(&update);
                    if let (Some(announcer), Some(snapshot)) = (announcer.as_mut(), store.snapshot()) {
                        announcer.announce(&snapshot.alerts);
                    }
                    draw(&store, opts.render);
                }
            }
            line = stdin.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) => match SessionCommand::parse(&line) {
                        Some(SessionCommand::Acknowledge(id)) => {
                            // Updates published meanwhile wait in the watch channel
                            let acked =
                                acknowledge_until(&mut store, api.as_ref(), &id, &mut shutdown)
                                    .await;
                            match acked {
                                Some(ok) => {
                                    draw(&store, opts.render);
                                    if !ok {
                                        println!("Failed to acknowledge {}", id);
                                    }
                                }
                                None => {
                                    info!("Shutting down gracefully");
                                    break;
                                }
                            }
                        }
                        Some(SessionCommand::Refresh) => poller.refresh(),
                        Some(SessionCommand::Quit) => break,
                        Some(SessionCommand::Unknown(input)) => {
                            println!("Unknown command: {} (ack <id> | refresh | quit)", input);
                        }
                        None => {}
                    },
                    Ok(None) => stdin_open = false,
                    Err(e) => {
                        warn!("Stopped reading stdin: {}", e);
                        stdin_open = false;
                    }
                }
            }
            _ = &mut shutdown => {
                info!("Shutting down gracefully");
                break;
            }
        }
    }

    poller.stop();
    Ok(EXIT_SUCCESS)
}

/// Acknowledge unless `shutdown` completes first. `None` means shutdown won
/// and the store is unchanged.
async fn acknowledge_until<S: Future>(
    store: &mut DashboardStore,
    api: &dyn DashboardApi,
    alert_id: &str,
    shutdown: S,
) -> Option<bool> {
    tokio::select! {
        ok = store.acknowledge(api, alert_id) => Some(ok),
        _ = shutdown => None,
    }
}

fn draw(store: &DashboardStore, opts: RenderOptions) {
    let Some(snapshot) = store.snapshot() else {
        return;
    };
    let frame = Frame {
        machines: &snapshot.machines,
        alerts: &snapshot.alerts,
        derived: store.derived(),
        last_update: store.last_update(),
        error: store.last_error(),
        now: Utc::now(),
    };
    if opts.color {
        print!("{}", CLEAR_SCREEN);
    }
    print!("{}", render(&frame, opts));
    println!("Commands: ack <id> | refresh | quit");
}

#[derive(Serialize)]
struct StatusReport<'a> {
    snapshot: &'a DashboardSnapshot,
    derived: &'a DerivedState,
    #[serde(skip_serializing_if = "Option::is_none")]
    fallback: Option<&'a str>,
}

/// Fetch once and print
pub async fn status(config: &GuardianConfig, render_opts: RenderOptions, json: bool) -> Result<i32> {
    let api = http_api(config)?;
    let source = FallbackSource::new(api);
    let fetched = source.fetch().await;

    let mut store = DashboardStore::new();
    store.apply_snapshot(fetched.snapshot, fetched.fallback.as_ref(), Utc::now());

    let Some(snapshot) = store.snapshot() else {
        return Ok(EXIT_GENERAL_ERROR);
    };

    if json {
        let report = StatusReport {
            snapshot,
            derived: store.derived(),
            fallback: store.last_error(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let frame = Frame {
            machines: &snapshot.machines,
            alerts: &snapshot.alerts,
            derived: store.derived(),
            last_update: store.last_update(),
            error: store.last_error(),
            now: Utc::now(),
        };
        print!("{}", render(&frame, render_opts));
    }

    Ok(EXIT_SUCCESS)
}

/// Acknowledge one alert
pub async fn ack(config: &GuardianConfig, alert_id: &str) -> Result<i32> {
    let api = http_api(config)?;
    let mut store = DashboardStore::new();

    if store.acknowledge(api.as_ref(), alert_id).await {
        println!("[OK] Alert {} acknowledged", alert_id);
        Ok(EXIT_SUCCESS)
    } else {
        println!("[FAILED] Alert {} was not acknowledged", alert_id);
        Ok(EXIT_GENERAL_ERROR)
    }
}

/// Check backend liveness
pub async fn health(config: &GuardianConfig) -> Result<i32> {
    let api = http_api(config)?;

    if api.health().await {
        println!("[OK] Backend reachable at {}", config.api_base_url);
        Ok(EXIT_SUCCESS)
    } else {
        println!("[DOWN] Backend unreachable at {}", config.api_base_url);
        Ok(EXIT_BACKEND_UNAVAILABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use guardian_common::{fixture, AckError, FetchError};

    /// Acknowledge either succeeds at once or never completes
    struct AckApi {
        stall: bool,
    }

    #[async_trait]
    impl DashboardApi for AckApi {
        async fn fetch_dashboard(&self) -> Result<DashboardSnapshot, FetchError> {
            Ok(fixture::baseline(Utc::now()))
        }

        async fn acknowledge(&self, _alert_id: &str) -> Result<(), AckError> {
            if self.stall {
                std::future::pending::<()>().await;
            }
            Ok(())
        }

        async fn health(&self) -> bool {
            true
        }
    }

    fn loaded_store() -> DashboardStore {
        let mut store = DashboardStore::new();
        let now = Utc::now();
        store.apply_snapshot(fixture::baseline(now), None, now);
        store
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_stalled_acknowledgment() {
        let mut store = loaded_store();
        let api = AckApi { stall: true };

        let result =
            acknowledge_until(&mut store, &api, "alert-001", std::future::ready(())).await;

        assert_eq!(result, None);
        assert!(!store.is_acknowledged("alert-001"));
    }

    #[tokio::test]
    async fn test_acknowledgment_completes_without_shutdown() {
        let mut store = loaded_store();
        let api = AckApi { stall: false };

        let result = acknowledge_until(
            &mut store,
            &api,
            "alert-001",
            std::future::pending::<()>(),
        )
        .await;

        assert_eq!(result, Some(true));
        assert!(store.is_acknowledged("alert-001"));
    }

    #[test]
    fn test_parse_session_commands() {
        assert_eq!(
            SessionCommand::parse("ack alert-001"),
            Some(SessionCommand::Acknowledge("alert-001".to_string()))
        );
        assert_eq!(
            SessionCommand::parse("  a alert-002 "),
            Some(SessionCommand::Acknowledge("alert-002".to_string()))
        );
        assert_eq!(SessionCommand::parse("r"), Some(SessionCommand::Refresh));
        assert_eq!(SessionCommand::parse("quit"), Some(SessionCommand::Quit));
        assert_eq!(
            SessionCommand::parse("ack"),
            Some(SessionCommand::Unknown("ack".to_string()))
        );
        assert_eq!(SessionCommand::parse("   "), None);
    }
}
