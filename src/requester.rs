use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::domain::Order;
use crate::error::QueueError;
use crate::order_queue::OrderSubmitter;

/// Outcome of a requester task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The order was placed on the queue.
    Placed,
    /// Shutdown arrived while the requester was still sleeping; no order was
    /// placed.
    Cancelled,
}

/// One-shot producer task: sleep for a randomized arrival delay, then place
/// exactly one order. Fire-and-forget; the requester never learns whether
/// its order was eventually fulfilled.
pub struct Requester {
    id: String,
    quantity: u32,
    submitter: OrderSubmitter,
    max_arrival_delay: Duration,
    cancel: CancellationToken,
}

impl Requester {
    pub fn new(
        id: impl Into<String>,
        quantity: u32,
        submitter: OrderSubmitter,
        max_arrival_delay: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            id: id.into(),
            quantity,
            submitter,
            max_arrival_delay,
            cancel,
        }
    }

    #[instrument(name = "requester", skip(self), fields(requester_id = %self.id))]
    pub async fn run(self) -> Result<Placement, QueueError> {
        let delay = self.arrival_delay();
        debug!(delay_ms = delay.as_millis() as u64, "Simulating arrival delay");

        tokio::select! {
            _ = self.cancel.cancelled() => {
                info!("Requester cancelled before placing an order");
                return Ok(Placement::Cancelled);
            }
            _ = tokio::time::sleep(delay) => {}
        }

        self.submitter.place(Order::new(self.id.clone(), self.quantity))?;
        Ok(Placement::Placed)
    }

    /// Uniform random delay in `[0, max_arrival_delay)`.
    fn arrival_delay(&self) -> Duration {
        let max_ms = self.max_arrival_delay.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..max_ms))
    }
}
