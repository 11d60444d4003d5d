//! Snapshot source with fixture fallback.
//!
//! Every fetch yields a snapshot. When the backend fails the snapshot comes
//! from the perturbed fixture and the error travels alongside it.

use crate::api::DashboardApi;
use chrono::Utc;
use guardian_common::{fixture, DashboardSnapshot, FetchError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Result of one fetch through the fallback source
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub snapshot: DashboardSnapshot,
    /// Set when `snapshot` was synthesized from the fixture
    pub fallback: Option<FetchError>,
}

impl Fetched {
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

pub struct FallbackSource {
    api: Arc<dyn DashboardApi>,
    rng: Mutex<StdRng>,
}

impl FallbackSource {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        Self {
            api,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic perturbation, for tests
    pub fn with_seed(api: Arc<dyn DashboardApi>, seed: u64) -> Self {
        Self {
            api,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn api(&self) -> &Arc<dyn DashboardApi> {
        &self.api
    }

    pub async fn fetch(&self) -> Fetched {
        match self.api.fetch_dashboard().await {
            Ok(snapshot) => Fetched {
                snapshot,
                fallback: None,
            },
            Err(err) => {
                warn!(kind = err.kind(), "API request failed, using mock data: {}", err);
                Fetched {
                    snapshot: self.synthesize(),
                    fallback: Some(err),
                }
            }
        }
    }

    fn synthesize(&self) -> DashboardSnapshot {
        // Generator state stays valid across a poisoned lock.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        fixture::synthesize(&mut *rng, Utc::now())
    }
}
