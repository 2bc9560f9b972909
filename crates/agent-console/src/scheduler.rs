//! # Notification Scheduler
//!
//! Owns the two periodic tasks behind the transfer notification lifecycle:
//!
//! - **countdown ticker**: once per tick interval, ages every pending
//!   notification and removes the ones whose countdown hit zero
//! - **generator**: pulls requests from a [`TransferRequestSource`] and, while
//!   the agent is online, turns each one into a pending notification
//!
//! Both tasks are tracked and cancellable. Whoever calls
//! [`NotificationScheduler::start`] owns them: [`stop`](NotificationScheduler::stop),
//! [`shutdown`](NotificationScheduler::shutdown) or dropping the scheduler
//! cancels them, so no timer outlives its presenter.
//!
//! ```text
//! ┌──────────────┐  request   ┌──────────────┐  insert   ┌─────────────────┐
//! │ RequestSource│ ─────────▶ │  generator   │ ────────▶ │                 │
//! └──────────────┘            └──────────────┘           │ NotificationStore│
//!                             ┌──────────────┐   tick    │                 │
//!                             │   ticker     │ ────────▶ │                 │
//!                             └──────────────┘           └─────────────────┘
//! ```
//!
//! Each callback takes the store lock for its whole body, so a tick, an
//! arrival and an operator action never interleave.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::alert::{play_best_effort, AudioAlert};
use crate::config::NotificationConfig;
use crate::error::{ConsoleError, Result};
use crate::events::{EventEmitter, NotificationEvent};
use crate::notification::{Resolution, SharedStore, TransferNotification, TransferRequestSource};
use crate::presence::PresenceStatus;

type BoxedSource = Box<dyn TransferRequestSource>;

/// Runs the countdown ticker and the notification generator
pub struct NotificationScheduler {
    /// Store shared with the presenter
    store: SharedStore,

    /// Latest agent presence
    presence: watch::Receiver<PresenceStatus>,

    /// Lifecycle event publisher
    events: EventEmitter,

    /// Alert played on arrival
    alert: Arc<dyn AudioAlert>,

    /// Request feed; the generator task holds the lock while it runs
    source: Arc<AsyncMutex<BoxedSource>>,

    /// Countdown tick period
    tick_interval: Duration,

    /// How long `shutdown` waits before aborting
    shutdown_timeout: Duration,

    /// Token for the current run
    cancel_token: Option<CancellationToken>,

    ticker_handle: Option<JoinHandle<()>>,
    generator_handle: Option<JoinHandle<()>>,
}

impl NotificationScheduler {
    pub fn new(
        config: &NotificationConfig,
        store: SharedStore,
        presence: watch::Receiver<PresenceStatus>,
        events: EventEmitter,
        alert: Arc<dyn AudioAlert>,
        source: BoxedSource,
    ) -> Self {
        Self {
            store,
            presence,
            events,
            alert,
            source: Arc::new(AsyncMutex::new(source)),
            tick_interval: config.tick_interval(),
            shutdown_timeout: config.shutdown_timeout(),
            cancel_token: None,
            ticker_handle: None,
            generator_handle: None,
        }
    }

    /// Spawn the ticker and the generator
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(ConsoleError::invalid_state(
                "notification scheduler is already running",
            ));
        }

        let token = CancellationToken::new();

        self.ticker_handle = Some(tokio::spawn(Self::ticker_loop(
            self.store.clone(),
            self.events.clone(),
            self.tick_interval,
            token.clone(),
        )));

        self.generator_handle = Some(tokio::spawn(Self::generator_loop(
            self.store.clone(),
            self.presence.clone(),
            self.events.clone(),
            self.alert.clone(),
            self.source.clone(),
            token.clone(),
        )));

        self.cancel_token = Some(token);
        info!(
            "⏱️ Notification scheduler started (tick every {:?})",
            self.tick_interval
        );
        Ok(())
    }

    /// Cancel both tasks without waiting for them
    pub fn stop(&mut self) {
        let Some(token) = self.cancel_token.take() else {
            return;
        };
        token.cancel();
        for handle in [self.ticker_handle.take(), self.generator_handle.take()]
            .into_iter()
            .flatten()
        {
            handle.abort();
        }
        info!("🛑 Notification scheduler stopped");
    }

    /// Cancel both tasks and wait for them to finish
    pub async fn shutdown(&mut self) {
        let Some(token) = self.cancel_token.take() else {
            return;
        };
        token.cancel();

        let handles: Vec<_> = [self.ticker_handle.take(), self.generator_handle.take()]
            .into_iter()
            .flatten()
            .collect();

        for mut handle in handles {
            if tokio::time::timeout(self.shutdown_timeout, &mut handle)
                .await
                .is_err()
            {
                warn!(
                    "Scheduler task did not stop within {:?}, aborting",
                    self.shutdown_timeout
                );
                handle.abort();
            }
        }
        info!("🛑 Notification scheduler shut down");
    }

    pub fn is_running(&self) -> bool {
        self.cancel_token.is_some()
    }

    /// Whether the generator task has ended on its own (source exhausted)
    pub fn generator_finished(&self) -> bool {
        self.generator_handle
            .as_ref()
            .map_or(true, |handle| handle.is_finished())
    }

    async fn ticker_loop(
        store: SharedStore,
        events: EventEmitter,
        period: Duration,
        cancel: CancellationToken,
    ) {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let expired = store.lock().tick();
                    for notification in expired {
                        info!(
                            "⌛ Transfer of {} from {} expired",
                            notification.customer_name, notification.from_agent
                        );
                        events.emit(NotificationEvent::Resolved {
                            notification,
                            resolution: Resolution::Expired,
                        });
                    }
                }
            }
        }
        debug!("Countdown ticker exited");
    }

    async fn generator_loop(
        store: SharedStore,
        presence: watch::Receiver<PresenceStatus>,
        events: EventEmitter,
        alert: Arc<dyn AudioAlert>,
        source: Arc<AsyncMutex<BoxedSource>>,
        cancel: CancellationToken,
    ) {
        let mut source = tokio::select! {
            _ = cancel.cancelled() => return,
            source = source.lock_owned() => source,
        };
        source.reset();
        debug!("Transfer generator reading from {} source", source.name());

        loop {
            let request = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                request = source.next_request() => request,
            };

            let Some(request) = request else {
                info!("📭 {} transfer source exhausted", source.name());
                break;
            };

            let status = *presence.borrow();
            if !status.accepts_transfers() {
                debug!(
                    "Transfer request from {} suppressed while {}",
                    request.from_agent, status
                );
                events.emit(NotificationEvent::Suppressed { presence: status });
                continue;
            }

            let notification = TransferNotification::from_request(request);
            let remaining = {
                let mut store = store.lock();
                let id = store.insert(notification.clone());
                store.remaining(&id)
            };
            info!(
                "📨 Transfer request from {} for {} ({}s to respond)",
                notification.from_agent,
                notification.customer_name,
                remaining.unwrap_or_default()
            );
            play_best_effort(alert.as_ref(), &notification);
            events.emit(NotificationEvent::Arrived(notification));
        }
        debug!("Transfer generator exited");
    }
}

impl Drop for NotificationScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
