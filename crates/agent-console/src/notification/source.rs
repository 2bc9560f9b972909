//! Sources of incoming transfer requests
//!
//! The generator does not care where requests come from. A
//! [`SimulatedSource`] picks a random template on a fixed period, while a
//! [`ChannelSource`] forwards whatever a live feed pushes into it. Tests can
//! plug in their own implementation.

use std::time::Duration;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::debug;

use super::types::TransferRequest;

/// Produces transfer requests for the notification generator
///
/// `next_request` must be cancel-safe: the scheduler drops the pending
/// future when it is stopped.
#[async_trait]
pub trait TransferRequestSource: Send {
    /// Wait for the next request; `None` means the source is exhausted
    async fn next_request(&mut self) -> Option<TransferRequest>;

    /// Short name used in logs
    fn name(&self) -> &str;

    /// Called each time a generator run takes over the source
    fn reset(&mut self) {}
}

/// Simulated feed choosing uniformly among fixed templates
pub struct SimulatedSource {
    templates: Vec<TransferRequest>,
    period: Duration,
    /// Created on the first poll so the period counts from generator start
    ticker: Option<Interval>,
    rng: StdRng,
}

impl SimulatedSource {
    /// Yield one random template every `period`, the first one `period` after the first poll
    pub fn new(templates: Vec<TransferRequest>, period: Duration) -> Self {
        Self::with_rng(templates, period, StdRng::from_entropy())
    }

    /// Same as [`new`](Self::new) with a fixed seed
    pub fn seeded(templates: Vec<TransferRequest>, period: Duration, seed: u64) -> Self {
        Self::with_rng(templates, period, StdRng::seed_from_u64(seed))
    }

    fn with_rng(templates: Vec<TransferRequest>, period: Duration, rng: StdRng) -> Self {
        Self {
            templates,
            period,
            ticker: None,
            rng,
        }
    }

    pub fn templates(&self) -> &[TransferRequest] {
        &self.templates
    }
}

#[async_trait]
impl TransferRequestSource for SimulatedSource {
    async fn next_request(&mut self) -> Option<TransferRequest> {
        if self.templates.is_empty() {
            return None;
        }
        let period = self.period;
        let ticker = self.ticker.get_or_insert_with(|| {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });
        ticker.tick().await;
        let request = self.templates.choose(&mut self.rng).cloned();
        debug!("Simulated transfer request: {:?}", request);
        request
    }

    fn name(&self) -> &str {
        "simulated"
    }

    /// Drop the old ticker so a restarted run waits a full period again
    fn reset(&mut self) {
        self.ticker = None;
    }
}

/// Live feed backed by an mpsc channel
pub struct ChannelSource {
    receiver: mpsc::Receiver<TransferRequest>,
}

impl ChannelSource {
    /// Create a source and the sender a feed pushes requests into
    pub fn new(capacity: usize) -> (mpsc::Sender<TransferRequest>, Self) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (sender, Self { receiver })
    }

    pub fn from_receiver(receiver: mpsc::Receiver<TransferRequest>) -> Self {
        Self { receiver }
    }
}

#[async_trait]
impl TransferRequestSource for ChannelSource {
    async fn next_request(&mut self) -> Option<TransferRequest> {
        self.receiver.recv().await
    }

    fn name(&self) -> &str {
        "channel"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn templates() -> Vec<TransferRequest> {
        vec![
            TransferRequest::new("Agent Li", "Zhang Wei", "Billing"),
            TransferRequest::new("Agent Chen", "Wang Fang", "Technical"),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_source_waits_one_period() {
        let start = Instant::now();
        let mut source = SimulatedSource::seeded(templates(), Duration::from_secs(10), 7);

        let request = source.next_request().await.unwrap();
        assert!(templates().contains(&request));
        assert_eq!(start.elapsed(), Duration::from_secs(10));

        source.next_request().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(20));
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_source_reset_rearms_period() {
        let mut source = SimulatedSource::seeded(templates(), Duration::from_secs(10), 7);
        source.next_request().await.unwrap();

        tokio::time::sleep(Duration::from_secs(60)).await;
        source.reset();

        let start = Instant::now();
        source.next_request().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_simulated_source_without_templates_is_exhausted() {
        let mut source = SimulatedSource::new(Vec::new(), Duration::from_secs(10));
        assert!(source.next_request().await.is_none());
    }

    #[tokio::test]
    async fn test_channel_source_ends_when_senders_drop() {
        let (sender, mut source) = ChannelSource::new(4);
        sender
            .send(TransferRequest::new("Agent Zhao", "Liu Yang", "Escalation"))
            .await
            .unwrap();
        drop(sender);

        let request = source.next_request().await.unwrap();
        assert_eq!(request.customer_name, "Liu Yang");
        assert!(source.next_request().await.is_none());
        assert_eq!(source.name(), "channel");
    }
}
