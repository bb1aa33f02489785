use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

use crate::domain::Order;
use crate::error::QueueError;

/// Unbounded FIFO mailbox between requesters and the fulfillment worker.
///
/// Producers hold cloned [`OrderSubmitter`]s; the single consumer owns the
/// [`OrderIntake`]. The queue closes once every submitter has been dropped,
/// which is the shutdown sentinel the worker drains toward. There is no
/// backpressure: `place` never blocks and never fails while the queue is
/// open.
pub struct OrderQueue;

impl OrderQueue {
    pub fn new() -> (OrderSubmitter, OrderIntake) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (OrderSubmitter { sender }, OrderIntake { receiver })
    }
}

/// Producer-side handle. Cheap to clone; one per requester.
#[derive(Clone)]
pub struct OrderSubmitter {
    sender: mpsc::UnboundedSender<Order>,
}

impl OrderSubmitter {
    /// Appends an order to the tail of the queue and wakes the consumer if
    /// it is waiting.
    #[instrument(
        skip(self, order),
        fields(requester_id = %order.requester_id, quantity = order.quantity)
    )]
    pub fn place(&self, order: Order) -> Result<(), QueueError> {
        self.sender.send(order).map_err(|_| QueueError::Closed)?;
        info!("Order placed");
        Ok(())
    }
}

/// Consumer-side handle, held exclusively by the fulfillment worker.
pub struct OrderIntake {
    receiver: mpsc::UnboundedReceiver<Order>,
}

impl OrderIntake {
    /// Waits until an order is available and removes it from the head of the
    /// queue. Returns `None` only once the queue is closed and fully
    /// drained.
    pub async fn next_order(&mut self) -> Option<Order> {
        let order = self.receiver.recv().await;
        if order.is_none() {
            debug!("Order queue closed and drained");
        }
        order
    }
}
