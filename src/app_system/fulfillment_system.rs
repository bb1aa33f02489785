use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::SystemConfig;
use crate::error::{QueueError, SystemError};
use crate::fulfillment::{FulfillmentReport, FulfillmentWorker};
use crate::inventory::Inventory;
use crate::order_queue::{OrderQueue, OrderSubmitter};
use crate::requester::{Placement, Requester};

/// The assembled order-fulfillment system.
///
/// Responsible for wiring the inventory, the order queue, and the single
/// fulfillment worker together, spawning requesters against them, and
/// handling shutdown. All sharing is explicit: each spawned task receives
/// its own handles, there is no global state.
pub struct FulfillmentSystem {
    submitter: OrderSubmitter,
    inventory: Arc<Inventory>,
    cancel: CancellationToken,
    worker: JoinHandle<FulfillmentReport>,
}

impl FulfillmentSystem {
    pub fn new(initial_stock: u32, processing_delay: Duration) -> Self {
        let inventory = Arc::new(Inventory::new(initial_stock));
        let (submitter, intake) = OrderQueue::new();
        let cancel = CancellationToken::new();

        let worker = FulfillmentWorker::new(
            intake,
            Arc::clone(&inventory),
            processing_delay,
            cancel.child_token(),
        );
        let worker = tokio::spawn(worker.run());

        Self {
            submitter,
            inventory,
            cancel,
            worker,
        }
    }

    /// A producer-side handle for placing orders directly.
    pub fn submitter(&self) -> OrderSubmitter {
        self.submitter.clone()
    }

    pub fn inventory(&self) -> Arc<Inventory> {
        Arc::clone(&self.inventory)
    }

    /// Spawns a one-shot requester task that will place a single order after
    /// a randomized arrival delay.
    pub fn spawn_requester(
        &self,
        requester_id: impl Into<String>,
        quantity: u32,
        max_arrival_delay: Duration,
    ) -> JoinHandle<Result<Placement, QueueError>> {
        let requester = Requester::new(
            requester_id,
            quantity,
            self.submitter.clone(),
            max_arrival_delay,
            self.cancel.child_token(),
        );
        tokio::spawn(requester.run())
    }

    /// Signals every task to stop at its next suspension point. The worker
    /// does not drain remaining orders after this.
    pub fn cancel(&self) {
        info!("Cancelling fulfillment system");
        self.cancel.cancel();
    }

    /// Graceful shutdown: closes the queue by dropping this system's
    /// submitter, then waits for the worker to drain what remains and
    /// return its report.
    ///
    /// Any submitter clones still held by live requesters keep the queue
    /// open until they finish, so no accepted order is lost.
    pub async fn shutdown(self) -> Result<FulfillmentReport, SystemError> {
        info!("Shutting down fulfillment system");
        drop(self.submitter);

        let report = self.worker.await.map_err(|e| {
            error!("Fulfillment worker task failed: {:?}", e);
            SystemError::TaskFailed(format!("Fulfillment worker task failed: {:?}", e))
        })?;

        info!("System shutdown complete");
        Ok(report)
    }
}

/// Runs one complete finite fulfillment pass: spawn every configured
/// requester, wait for them all to place their orders, then drain the queue
/// and return the worker's report.
pub async fn run(config: SystemConfig) -> Result<FulfillmentReport, SystemError> {
    config.validate()?;

    let system = FulfillmentSystem::new(config.initial_stock, config.processing_delay);

    let handles: Vec<_> = config
        .orders
        .iter()
        .map(|spec| {
            system.spawn_requester(
                spec.requester_id.clone(),
                spec.quantity,
                config.max_arrival_delay,
            )
        })
        .collect();

    for handle in handles {
        let placement = handle
            .await
            .map_err(|e| SystemError::TaskFailed(format!("Requester task failed: {:?}", e)))??;
        if placement == Placement::Cancelled {
            info!("A requester was cancelled before placing its order");
        }
    }

    system.shutdown().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    #[tokio::test]
    async fn shutdown_with_no_orders_returns_empty_report() {
        let system = FulfillmentSystem::new(25, Duration::from_millis(1));
        let report = system.shutdown().await.unwrap();

        assert_eq!(report, FulfillmentReport {
            processed: 0,
            rejected: 0,
            remaining_stock: 25,
        });
    }

    #[tokio::test]
    async fn cancel_stops_a_blocked_worker_promptly() {
        let system = FulfillmentSystem::new(10, Duration::from_millis(1));

        // Keep the queue open so only the token can stop the worker.
        let submitter = system.submitter();
        system.cancel();

        let report = timeout(Duration::from_millis(500), system.shutdown())
            .await
            .expect("shutdown should complete promptly after cancel")
            .unwrap();
        assert_eq!(report.remaining_stock, 10);
        drop(submitter);
    }

    #[tokio::test]
    async fn orders_placed_through_the_submitter_are_fulfilled() {
        use crate::domain::Order;

        let system = FulfillmentSystem::new(12, Duration::from_millis(1));
        let submitter = system.submitter();
        let inventory = system.inventory();

        submitter.place(Order::new("walk_in", 12)).unwrap();
        drop(submitter);

        let report = system.shutdown().await.unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.remaining_stock, 0);
        assert_eq!(inventory.stock().await, 0);
    }
}
