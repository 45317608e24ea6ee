//! Best-effort side effects of committed actions.
//!
//! Internal notifications and transactional emails never decide the outcome
//! of the request that triggered them. Handlers push a [`SideEffect`] onto a
//! bounded queue with [`SideEffects::dispatch`], which never blocks and never
//! fails, and a background worker drains the queue. Failures are logged and
//! counted by the worker instead of being returned to anyone.

use std::future::Future;
use std::pin::Pin;

use sqlx::PgPool;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error, warn};

use scholaris_config::EmailConfig;
use scholaris_models::NewNotification;

use crate::metrics::{track_side_effect_dispatched, track_side_effect_dropped, track_side_effect_failed};
use crate::modules::notifications::service::NotificationService;
use crate::utils::email::{EmailService, OutboundEmail};

#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    Notify(NewNotification),
    Email(OutboundEmail),
}

impl SideEffect {
    pub fn kind(&self) -> &'static str {
        match self {
            SideEffect::Notify(_) => "notification",
            SideEffect::Email(_) => "email",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SideEffectError {
    #[error("Failed to create notification")]
    Notification,

    #[error("Failed to send email: {0}")]
    Email(String),
}

pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<(), SideEffectError>> + Send + 'a>>;

/// Executes side effects pulled off the queue.
pub trait SideEffectHandler: Send + Sync + 'static {
    fn handle(&self, effect: SideEffect) -> HandlerFuture<'_>;
}

/// Sending half of the side-effect queue, cloned into application state.
#[derive(Debug, Clone)]
pub struct SideEffects {
    tx: mpsc::Sender<SideEffect>,
}

impl SideEffects {
    /// Creates the queue and spawns its worker on the current runtime.
    pub fn spawn<H: SideEffectHandler>(capacity: usize, handler: H) -> Self {
        let (side_effects, rx) = Self::channel(capacity);
        tokio::spawn(run_worker(rx, handler));
        side_effects
    }

    /// Creates the queue without a worker. The caller owns the receiver.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<SideEffect>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Queues `effect` without waiting. A full or closed queue drops it.
    pub fn dispatch(&self, effect: SideEffect) {
        let kind = effect.kind();
        match self.tx.try_send(effect) {
            Ok(()) => track_side_effect_dispatched(kind),
            Err(TrySendError::Full(_)) => {
                warn!(kind, "Side-effect queue is full, dropping effect");
                track_side_effect_dropped(kind);
            }
            Err(TrySendError::Closed(_)) => {
                warn!(kind, "Side-effect queue is closed, dropping effect");
                track_side_effect_dropped(kind);
            }
        }
    }

    pub fn notify(&self, notification: NewNotification) {
        self.dispatch(SideEffect::Notify(notification));
    }

    pub fn email(&self, email: OutboundEmail) {
        self.dispatch(SideEffect::Email(email));
    }
}

/// Drains the queue until every sender is dropped.
pub async fn run_worker<H: SideEffectHandler>(mut rx: mpsc::Receiver<SideEffect>, handler: H) {
    while let Some(effect) = rx.recv().await {
        let kind = effect.kind();
        if let Err(e) = handler.handle(effect).await {
            error!(kind, error = %e, "Side effect failed");
            track_side_effect_failed(kind);
        }
    }
    debug!("Side-effect worker stopped");
}

/// Writes notifications to the database and sends email over SMTP.
pub struct AppSideEffectHandler {
    db: PgPool,
    email: EmailService,
}

impl AppSideEffectHandler {
    pub fn new(db: PgPool, email_config: EmailConfig) -> Self {
        Self {
            db,
            email: EmailService::new(email_config),
        }
    }
}

impl SideEffectHandler for AppSideEffectHandler {
    fn handle(&self, effect: SideEffect) -> HandlerFuture<'_> {
        Box::pin(async move {
            match effect {
                SideEffect::Notify(notification) => {
                    NotificationService::raise(&self.db, notification)
                        .await
                        .map(|_| ())
                        .ok_or(SideEffectError::Notification)
                }
                SideEffect::Email(email) => self
                    .email
                    .send(&email)
                    .await
                    .map_err(|e| SideEffectError::Email(e.message())),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use scholaris_models::enums::NotificationType;

    /// Fails every other effect and counts every call.
    struct FlakyHandler {
        calls: Arc<AtomicUsize>,
    }

    impl SideEffectHandler for FlakyHandler {
        fn handle(&self, _effect: SideEffect) -> HandlerFuture<'_> {
            Box::pin(async move {
                let n = self.calls.fetch_add(1, Ordering::SeqCst);
                if n % 2 == 0 {
                    Err(SideEffectError::Notification)
                } else {
                    Ok(())
                }
            })
        }
    }

    fn notification() -> NewNotification {
        NewNotification::new(NotificationType::Contact, "New message", "Hello")
    }

    #[tokio::test]
    async fn test_worker_survives_handler_failures() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (side_effects, rx) = SideEffects::channel(8);
        let worker = tokio::spawn(run_worker(
            rx,
            FlakyHandler {
                calls: calls.clone(),
            },
        ));

        for _ in 0..4 {
            side_effects.notify(notification());
        }
        drop(side_effects);
        worker.await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_full_queue_drops_without_blocking() {
        let (side_effects, mut rx) = SideEffects::channel(1);
        side_effects.notify(notification());
        side_effects.notify(notification());
        drop(side_effects);

        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_closed_queue_is_not_an_error() {
        let (side_effects, rx) = SideEffects::channel(1);
        drop(rx);
        side_effects.notify(notification());
    }

    #[test]
    fn test_kind() {
        assert_eq!(SideEffect::Notify(notification()).kind(), "notification");
    }
}
