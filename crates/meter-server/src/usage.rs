//! Detached last-used recording.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use uuid::Uuid;

use meter_auth::CredentialStore;

/// One allowed request's usage stamp. `at` is the request's own clock read,
/// captured at allow time, so concurrent stamps for the same credential are
/// commutative (last write wins).
#[derive(Debug, Clone, Copy)]
pub struct UsageEvent {
    pub credential_id: Uuid,
    pub at: DateTime<Utc>,
}

/// Hands `last_used` updates to a background worker over a bounded channel.
///
/// Recording never blocks a request and never reports failure to it: a full
/// queue drops the event, and write errors stay on the worker's own log.
/// The worker's lifetime is independent of any request's cancellation.
#[derive(Clone)]
pub struct UsageRecorder {
    tx: mpsc::Sender<UsageEvent>,
}

impl UsageRecorder {
    /// Spawn the worker task and return the sending half.
    pub fn spawn(store: Arc<dyn CredentialStore>, queue_depth: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<UsageEvent>(queue_depth.max(1));
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                if let Err(err) = store.touch_last_used(event.credential_id, event.at).await {
                    tracing::warn!(
                        credential_id = %event.credential_id,
                        error = %err,
                        "failed to record credential usage"
                    );
                }
            }
        });
        Self { tx }
    }

    /// Queue a usage stamp, dropping it if the worker is saturated or gone.
    pub fn record(&self, credential_id: Uuid, at: DateTime<Utc>) {
        if let Err(err) = self.tx.try_send(UsageEvent { credential_id, at }) {
            tracing::debug!(credential_id = %credential_id, error = %err, "usage event dropped");
        }
    }
}
