//! OnboardingManager keeps one isolated wizard per session and hands
//! finished profiles to the completion handoff.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::fields::ProfileField;
use super::handoff::{CompletedProfile, CompletionHandoff};
use super::model::Role;
use super::state::{Advance, WizardState};
use super::steps::StepKind;
use crate::config::OnboardingConfig;
use crate::error::{Result, SessionError, WizardError};

struct WizardSession {
    state: WizardState,
    started_at: DateTime<Utc>,
    /// Set while the finished profile is out for delivery. The session still
    /// counts toward the limit and can be read or abandoned, but not edited.
    completing: bool,
}

/// Look up a session that is not mid-delivery.
fn editable(
    sessions: &mut HashMap<Uuid, WizardSession>,
    id: Uuid,
) -> std::result::Result<&mut WizardSession, SessionError> {
    let session = sessions.get_mut(&id).ok_or(SessionError::NotFound { id })?;
    if session.completing {
        return Err(SessionError::Completing { id });
    }
    Ok(session)
}

/// Position summary of one session. Never includes field values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OnboardingStatus {
    pub session_id: Uuid,
    pub role: Role,
    pub step: u32,
    pub total_steps: u32,
    /// Unrounded percentage; consumers round for display.
    pub progress: f64,
    pub step_kind: StepKind,
    pub is_final_step: bool,
    /// The profile is being handed off.
    pub completing: bool,
    pub started_at: DateTime<Utc>,
}

impl OnboardingStatus {
    fn new(session_id: Uuid, session: &WizardSession) -> std::result::Result<Self, WizardError> {
        let state = &session.state;
        Ok(Self {
            session_id,
            role: state.role(),
            step: state.current_step(),
            total_steps: state.total_steps(),
            progress: state.progress(),
            step_kind: state.step_kind()?,
            is_final_step: state.is_final_step(),
            completing: session.completing,
            started_at: session.started_at,
        })
    }
}

/// Result of advancing a session.
#[derive(Debug, Clone)]
pub enum SessionAdvance {
    /// The session moved to its next step.
    Step(OnboardingStatus),
    /// The session finished and its profile was handed off.
    Completed(CompletedProfile),
}

/// Coordinates wizard sessions: creation, edits, navigation and completion.
pub struct OnboardingManager {
    sessions: RwLock<HashMap<Uuid, WizardSession>>,
    handoff: Arc<dyn CompletionHandoff>,
    max_sessions: usize,
}

impl OnboardingManager {
    pub fn new(config: &OnboardingConfig, handoff: Arc<dyn CompletionHandoff>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            handoff,
            max_sessions: config.max_sessions,
        }
    }

    /// Start a wizard for `role` and return its session id.
    pub async fn start(&self, role: Role) -> Result<Uuid> {
        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.max_sessions {
            warn!(max = self.max_sessions, "Onboarding session limit reached");
            return Err(SessionError::LimitReached {
                max: self.max_sessions,
            }
            .into());
        }

        let id = Uuid::new_v4();
        sessions.insert(
            id,
            WizardSession {
                state: WizardState::initialize(role),
                started_at: Utc::now(),
                completing: false,
            },
        );
        info!(session_id = %id, role = %role, "Onboarding session started");
        Ok(id)
    }

    /// Copy of the session's current state.
    pub async fn snapshot(&self, id: Uuid) -> Result<WizardState> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(&id).ok_or(SessionError::NotFound { id })?;
        Ok(session.state.clone())
    }

    pub async fn status(&self, id: Uuid) -> Result<OnboardingStatus> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(&id).ok_or(SessionError::NotFound { id })?;
        Ok(OnboardingStatus::new(id, session)?)
    }

    /// Write a field in the session's record. Set-valued fields toggle.
    pub async fn update_field(
        &self,
        id: Uuid,
        field: ProfileField,
        value: impl Into<String>,
    ) -> Result<OnboardingStatus> {
        let value = value.into();
        let mut sessions = self.sessions.write().await;
        let session = editable(&mut sessions, id)?;

        let next = session.state.update_field(field, value).inspect_err(|e| {
            debug!(session_id = %id, field = %field, error = %e, "Field update rejected");
        })?;
        session.state = next;
        debug!(session_id = %id, field = %field, "Field updated");
        Ok(OnboardingStatus::new(id, session)?)
    }

    /// [`update_field`](Self::update_field) keyed by the field's name.
    pub async fn update_field_by_name(
        &self,
        id: Uuid,
        name: &str,
        value: impl Into<String>,
    ) -> Result<OnboardingStatus> {
        let field: ProfileField = name.parse()?;
        self.update_field(id, field, value).await
    }

    /// Advance a session. From the last step this completes the session and
    /// delivers the profile.
    ///
    /// During delivery the session stays registered and is marked completing.
    /// It is removed once delivery succeeds. If delivery fails it is left at
    /// its last step so the caller can retry, unless it was abandoned in the
    /// meantime.
    pub async fn advance(&self, id: Uuid) -> Result<SessionAdvance> {
        let mut sessions = self.sessions.write().await;
        let session = editable(&mut sessions, id)?;

        let record = match session.state.clone().advance() {
            Advance::InProgress(next) => {
                session.state = next;
                info!(
                    session_id = %id,
                    step = session.state.current_step(),
                    "Onboarding step advanced"
                );
                return Ok(SessionAdvance::Step(OnboardingStatus::new(id, session)?));
            }
            Advance::Completed(record) => record,
        };
        session.completing = true;
        let started_at = session.started_at;
        // Deliver without holding the lock; other sessions keep moving.
        drop(sessions);

        let completed = CompletedProfile {
            session_id: id,
            record,
            started_at,
            completed_at: Utc::now(),
        };
        let delivered = self.handoff.deliver(&completed).await;

        let mut sessions = self.sessions.write().await;
        if let Err(e) = delivered {
            match sessions.get_mut(&id) {
                Some(session) => {
                    session.completing = false;
                    warn!(session_id = %id, error = %e, "Completion handoff failed, session kept");
                }
                None => {
                    warn!(session_id = %id, error = %e, "Completion handoff failed after abandon");
                }
            }
            return Err(e.into());
        }

        sessions.remove(&id);
        info!(session_id = %id, role = %completed.record.role(), "Onboarding session completed");
        Ok(SessionAdvance::Completed(completed))
    }

    /// Step a session back. Clamped at step 1.
    pub async fn retreat(&self, id: Uuid) -> Result<OnboardingStatus> {
        let mut sessions = self.sessions.write().await;
        let session = editable(&mut sessions, id)?;
        session.state = session.state.clone().retreat();
        debug!(session_id = %id, step = session.state.current_step(), "Onboarding step retreated");
        Ok(OnboardingStatus::new(id, session)?)
    }

    /// Drop a session without completing it. Returns whether it existed.
    ///
    /// A session that is mid-delivery is dropped too; a failed delivery will
    /// not bring it back.
    pub async fn abandon(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id);
        if let Some(session) = &removed {
            info!(
                session_id = %id,
                step = session.state.current_step(),
                completing = session.completing,
                "Onboarding session abandoned"
            );
        }
        removed.is_some()
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, HandoffError};
    use crate::onboarding::handoff::ChannelHandoff;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::Notify;
    use tokio::time::timeout;

    const TEST_TIMEOUT: Duration = Duration::from_secs(5);

    struct RejectingHandoff;

    #[async_trait]
    impl CompletionHandoff for RejectingHandoff {
        async fn deliver(
            &self,
            _profile: &CompletedProfile,
        ) -> std::result::Result<(), HandoffError> {
            Err(HandoffError::Rejected {
                reason: "dashboard offline".to_string(),
            })
        }
    }

    /// Holds each delivery until released, then accepts or rejects it.
    struct GatedHandoff {
        entered: Notify,
        release: Notify,
        accept: bool,
    }

    impl GatedHandoff {
        fn new(accept: bool) -> Arc<Self> {
            Arc::new(Self {
                entered: Notify::new(),
                release: Notify::new(),
                accept,
            })
        }
    }

    #[async_trait]
    impl CompletionHandoff for GatedHandoff {
        async fn deliver(
            &self,
            _profile: &CompletedProfile,
        ) -> std::result::Result<(), HandoffError> {
            self.entered.notify_one();
            self.release.notified().await;
            if self.accept {
                Ok(())
            } else {
                Err(HandoffError::Rejected {
                    reason: "dashboard offline".to_string(),
                })
            }
        }
    }

    /// Walk a fresh session to its last step and start completing it in the
    /// background. Returns once the handoff has the profile.
    async fn start_completing(
        manager: &Arc<OnboardingManager>,
        gate: &GatedHandoff,
    ) -> (Uuid, tokio::task::JoinHandle<Result<SessionAdvance>>) {
        let id = manager.start(Role::Creator).await.unwrap();
        manager.advance(id).await.unwrap();
        manager.advance(id).await.unwrap();
        let task = tokio::spawn({
            let manager = Arc::clone(manager);
            async move { manager.advance(id).await }
        });
        gate.entered.notified().await;
        (id, task)
    }

    fn manager_with(handoff: Arc<dyn CompletionHandoff>, max_sessions: usize) -> OnboardingManager {
        let config = OnboardingConfig {
            max_sessions,
            ..OnboardingConfig::default()
        };
        OnboardingManager::new(&config, handoff)
    }

    #[tokio::test]
    async fn start_creates_session_at_step_one() {
        let (handoff, _rx) = ChannelHandoff::new(1);
        let manager = manager_with(Arc::new(handoff), 8);
        let id = manager.start(Role::Brand).await.unwrap();

        let status = manager.status(id).await.unwrap();
        assert_eq!(status.step, 1);
        assert_eq!(status.total_steps, 3);
        assert_eq!(status.role, Role::Brand);
        assert_eq!(status.step_kind, StepKind::Auth);
        assert!(!status.is_final_step);
        assert_eq!(manager.active_sessions().await, 1);
    }

    #[tokio::test]
    async fn session_limit_is_enforced() {
        let (handoff, _rx) = ChannelHandoff::new(1);
        let manager = manager_with(Arc::new(handoff), 1);
        manager.start(Role::Creator).await.unwrap();
        let err = manager.start(Role::Creator).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Session(SessionError::LimitReached { max: 1 })
        ));
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let (handoff, _rx) = ChannelHandoff::new(1);
        let manager = manager_with(Arc::new(handoff), 8);
        let missing = Uuid::new_v4();
        assert!(matches!(
            manager.advance(missing).await,
            Err(Error::Session(SessionError::NotFound { id })) if id == missing
        ));
        assert!(!manager.abandon(missing).await);
    }

    #[tokio::test]
    async fn rejected_field_leaves_session_unchanged() {
        let (handoff, _rx) = ChannelHandoff::new(1);
        let manager = manager_with(Arc::new(handoff), 8);
        let id = manager.start(Role::Brand).await.unwrap();
        let before = manager.snapshot(id).await.unwrap();

        let err = manager
            .update_field(id, ProfileField::Niches, "Tech")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Wizard(WizardError::FieldNotForRole { .. })
        ));
        assert_eq!(manager.snapshot(id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn completion_delivers_and_ends_session() {
        let (handoff, mut rx) = ChannelHandoff::new(1);
        let manager = manager_with(Arc::new(handoff), 8);
        let id = manager.start(Role::Brand).await.unwrap();
        manager
            .update_field_by_name(id, "companyName", "Acme")
            .await
            .unwrap();

        for _ in 0..2 {
            assert!(matches!(
                manager.advance(id).await.unwrap(),
                SessionAdvance::Step(_)
            ));
        }
        let SessionAdvance::Completed(completed) = manager.advance(id).await.unwrap() else {
            panic!("expected completion");
        };
        assert_eq!(completed.session_id, id);
        assert_eq!(
            completed.record.brand().unwrap().company_name.as_deref(),
            Some("Acme")
        );
        assert_eq!(rx.recv().await.unwrap(), completed);
        assert_eq!(manager.active_sessions().await, 0);
    }

    #[tokio::test]
    async fn failed_handoff_keeps_session_resumable() {
        let manager = manager_with(Arc::new(RejectingHandoff), 8);
        let id = manager.start(Role::Creator).await.unwrap();
        manager.advance(id).await.unwrap();
        manager.advance(id).await.unwrap();

        let err = manager.advance(id).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Handoff(HandoffError::Rejected { .. })
        ));
        let status = manager.status(id).await.unwrap();
        assert_eq!(status.step, 3);
        assert!(status.is_final_step);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let (handoff, _rx) = ChannelHandoff::new(1);
        let manager = manager_with(Arc::new(handoff), 8);
        let a = manager.start(Role::Creator).await.unwrap();
        let b = manager.start(Role::Creator).await.unwrap();

        manager
            .update_field(a, ProfileField::Email, "a@example.com")
            .await
            .unwrap();
        manager.advance(a).await.unwrap();

        let b_state = manager.snapshot(b).await.unwrap();
        assert_eq!(b_state.current_step(), 1);
        assert_eq!(b_state.record().email(), "");
    }

    #[tokio::test]
    async fn retreat_and_abandon() {
        let (handoff, _rx) = ChannelHandoff::new(1);
        let manager = manager_with(Arc::new(handoff), 8);
        let id = manager.start(Role::Creator).await.unwrap();

        assert_eq!(manager.retreat(id).await.unwrap().step, 1);
        manager.advance(id).await.unwrap();
        assert_eq!(manager.retreat(id).await.unwrap().step, 1);

        assert!(manager.abandon(id).await);
        assert!(manager.snapshot(id).await.is_err());
    }

    #[tokio::test]
    async fn completing_session_stays_registered_during_delivery() {
        timeout(TEST_TIMEOUT, async {
            let gate = GatedHandoff::new(true);
            let manager = Arc::new(manager_with(gate.clone(), 1));
            let (id, task) = start_completing(&manager, &gate).await;

            let status = manager.status(id).await.unwrap();
            assert_eq!(status.step, 3);
            assert!(status.completing);
            assert_eq!(manager.active_sessions().await, 1);
            assert!(matches!(
                manager.start(Role::Brand).await,
                Err(Error::Session(SessionError::LimitReached { max: 1 }))
            ));

            gate.release.notify_one();
            let done = task.await.unwrap().unwrap();
            assert!(matches!(done, SessionAdvance::Completed(ref p) if p.session_id == id));
            assert_eq!(manager.active_sessions().await, 0);
            assert!(manager.start(Role::Brand).await.is_ok());
        })
        .await
        .expect("test timed out");
    }

    #[tokio::test]
    async fn completing_session_rejects_edits_and_second_advance() {
        timeout(TEST_TIMEOUT, async {
            let gate = GatedHandoff::new(false);
            let manager = Arc::new(manager_with(gate.clone(), 4));
            let (id, task) = start_completing(&manager, &gate).await;

            assert!(matches!(
                manager.advance(id).await,
                Err(Error::Session(SessionError::Completing { id: busy })) if busy == id
            ));
            assert!(matches!(
                manager.update_field(id, ProfileField::Bio, "late edit").await,
                Err(Error::Session(SessionError::Completing { .. }))
            ));
            assert!(matches!(
                manager.retreat(id).await,
                Err(Error::Session(SessionError::Completing { .. }))
            ));

            gate.release.notify_one();
            assert!(matches!(
                task.await.unwrap(),
                Err(Error::Handoff(HandoffError::Rejected { .. }))
            ));

            // Failed delivery leaves the session editable again at its last step.
            let status = manager.status(id).await.unwrap();
            assert_eq!(status.step, 3);
            assert!(!status.completing);
            manager
                .update_field(id, ProfileField::Bio, "retry")
                .await
                .unwrap();
        })
        .await
        .expect("test timed out");
    }

    #[tokio::test]
    async fn abandon_during_failed_delivery_is_final() {
        timeout(TEST_TIMEOUT, async {
            let gate = GatedHandoff::new(false);
            let manager = Arc::new(manager_with(gate.clone(), 1));
            let (id, task) = start_completing(&manager, &gate).await;

            assert!(manager.abandon(id).await);
            assert_eq!(manager.active_sessions().await, 0);

            gate.release.notify_one();
            assert!(matches!(
                task.await.unwrap(),
                Err(Error::Handoff(HandoffError::Rejected { .. }))
            ));

            assert!(matches!(
                manager.status(id).await,
                Err(Error::Session(SessionError::NotFound { .. }))
            ));
            assert_eq!(manager.active_sessions().await, 0);
            assert!(manager.start(Role::Brand).await.is_ok());
            assert_eq!(manager.active_sessions().await, 1);
        })
        .await
        .expect("test timed out");
    }
}
