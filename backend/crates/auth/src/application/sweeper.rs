//! Verification Code Sweeper
//!
//! Periodically drops stale verification codes. Failures are logged and the
//! next tick tries again.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::application::verification::VerificationCodes;
use crate::domain::repository::VerificationStore;

pub struct ExpirySweeper<V> {
    codes: VerificationCodes<V>,
    period: Duration,
}

impl<V> ExpirySweeper<V>
where
    V: VerificationStore + Send + Sync + 'static,
{
    pub fn new(codes: VerificationCodes<V>, period: Duration) -> Self {
        Self { codes, period }
    }

    /// Run one sweep, logging the outcome
    pub async fn tick(&self) {
        match self.codes.sweep().await {
            Ok(0) => {}
            Ok(removed) => {
                tracing::debug!(removed, "Swept stale verification codes");
            }
            Err(e) => {
                tracing::error!(error = %e, "Verification code sweep failed");
            }
        }
    }

    /// Spawn the sweep loop on the tokio runtime. The first sweep runs one
    /// period after spawning.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            interval.tick().await;

            loop {
                interval.tick().await;
                self.tick().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeDelta, Utc};

    use super::*;
    use crate::domain::entity::verification::VerificationEntry;
    use crate::infra::memory::InMemoryVerificationStore;

    #[tokio::test]
    async fn test_spawned_sweeper_removes_stale_codes() {
        let store = Arc::new(InMemoryVerificationStore::new());
        let now = Utc::now();
        store
            .set("old@example.com", VerificationEntry::new(111_111, now - TimeDelta::minutes(11)))
            .await
            .unwrap();
        store
            .set("new@example.com", VerificationEntry::new(222_222, now))
            .await
            .unwrap();

        let codes = VerificationCodes::new(Arc::clone(&store), TimeDelta::minutes(10));
        let handle = ExpirySweeper::new(codes, Duration::from_millis(10)).spawn();

        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();

        assert!(store.get("old@example.com").await.unwrap().is_none());
        assert!(store.get("new@example.com").await.unwrap().is_some());
    }
}
