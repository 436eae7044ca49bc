//! Completion handoff: where finished profiles go.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use super::model::ProfileRecord;
use crate::error::HandoffError;

/// A finished wizard session, as delivered to the rest of the application.
///
/// `record` is passed through exactly as the wizard assembled it: unset
/// fields stay unset and nothing is validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedProfile {
    pub session_id: Uuid,
    pub record: ProfileRecord,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

/// Receives completed profiles.
#[async_trait]
pub trait CompletionHandoff: Send + Sync {
    /// Accept a completed profile. An error leaves the session resumable.
    async fn deliver(&self, profile: &CompletedProfile) -> Result<(), HandoffError>;
}

/// Forwards completed profiles to an mpsc receiver.
#[derive(Clone)]
pub struct ChannelHandoff {
    tx: mpsc::Sender<CompletedProfile>,
}

impl ChannelHandoff {
    /// Create a handoff and the receiver it feeds.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<CompletedProfile>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl CompletionHandoff for ChannelHandoff {
    async fn deliver(&self, profile: &CompletedProfile) -> Result<(), HandoffError> {
        self.tx
            .send(profile.clone())
            .await
            .map_err(|_| HandoffError::ChannelClosed)
    }
}

/// Records completions in the log and nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogHandoff;

#[async_trait]
impl CompletionHandoff for LogHandoff {
    async fn deliver(&self, profile: &CompletedProfile) -> Result<(), HandoffError> {
        let elapsed = profile.completed_at - profile.started_at;
        info!(
            session_id = %profile.session_id,
            role = %profile.record.role(),
            elapsed_secs = elapsed.num_seconds(),
            "Onboarding profile completed"
        );
        Ok(())
    }
}
