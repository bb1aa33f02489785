use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::domain::Order;
use crate::inventory::Inventory;
use crate::order_queue::OrderIntake;

/// Final tally returned when the worker stops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FulfillmentReport {
    pub processed: u32,
    pub rejected: u32,
    pub remaining_stock: u32,
}

/// The single consumer of the order queue.
///
/// Runs one long loop: wait for an order, apply it against inventory, then
/// pause for the processing delay before picking up the next one. The delay
/// models real fulfillment latency and bounds throughput to one order per
/// interval; fulfillment is deliberately serial.
///
/// The loop ends in one of two ways: the queue closes (every submitter
/// dropped, remaining orders drained) or the cancellation token fires. The
/// token is checked at both suspension points, so a cancelled worker stops
/// within one cooperative-check interval without touching inventory or the
/// queue again.
pub struct FulfillmentWorker {
    intake: OrderIntake,
    inventory: Arc<Inventory>,
    processing_delay: Duration,
    cancel: CancellationToken,
    processed: u32,
    rejected: u32,
}

impl FulfillmentWorker {
    pub fn new(
        intake: OrderIntake,
        inventory: Arc<Inventory>,
        processing_delay: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            intake,
            inventory,
            processing_delay,
            cancel,
            processed: 0,
            rejected: 0,
        }
    }

    #[instrument(name = "fulfillment_worker", skip(self))]
    pub async fn run(mut self) -> FulfillmentReport {
        info!("Fulfillment worker starting");

        loop {
            let order = tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("Fulfillment worker cancelled while waiting for orders");
                    break;
                }
                order = self.intake.next_order() => match order {
                    Some(order) => order,
                    None => {
                        info!("Order queue closed, all orders drained");
                        break;
                    }
                },
            };

            self.handle_order(order).await;

            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("Fulfillment worker cancelled during processing delay");
                    break;
                }
                _ = tokio::time::sleep(self.processing_delay) => {}
            }
        }

        let report = FulfillmentReport {
            processed: self.processed,
            rejected: self.rejected,
            remaining_stock: self.inventory.stock().await,
        };
        info!(
            processed = report.processed,
            rejected = report.rejected,
            remaining_stock = report.remaining_stock,
            "Fulfillment worker stopped"
        );
        report
    }

    /// Applies one order against inventory. Rejected orders are dropped
    /// permanently; there is no retry or requeue.
    #[instrument(
        skip(self, order),
        fields(requester_id = %order.requester_id, quantity = order.quantity)
    )]
    async fn handle_order(&mut self, order: Order) {
        debug!("Processing order");

        if self
            .inventory
            .try_reserve(&order.requester_id, order.quantity)
            .await
        {
            self.processed += 1;
        } else {
            self.rejected += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order_queue::OrderQueue;
    use tokio::time::timeout;

    fn spawn_worker(
        intake: OrderIntake,
        inventory: &Arc<Inventory>,
        cancel: CancellationToken,
    ) -> tokio::task::JoinHandle<FulfillmentReport> {
        let worker = FulfillmentWorker::new(
            intake,
            Arc::clone(inventory),
            Duration::from_millis(1),
            cancel,
        );
        tokio::spawn(worker.run())
    }

    #[tokio::test]
    async fn worker_drains_queue_and_reports() {
        let inventory = Arc::new(Inventory::new(60));
        let (submitter, intake) = OrderQueue::new();
        let handle = spawn_worker(intake, &inventory, CancellationToken::new());

        submitter.place(Order::new("aliyan", 10)).unwrap();
        submitter.place(Order::new("Kanwal", 20)).unwrap();
        drop(submitter);

        let report = handle.await.unwrap();
        assert_eq!(report.processed, 2);
        assert_eq!(report.rejected, 0);
        assert_eq!(report.remaining_stock, 30);
    }

    #[tokio::test]
    async fn rejected_orders_are_counted_and_dropped() {
        let inventory = Arc::new(Inventory::new(5));
        let (submitter, intake) = OrderQueue::new();
        let handle = spawn_worker(intake, &inventory, CancellationToken::new());

        submitter.place(Order::new("bulk_buyer", 10)).unwrap();
        submitter.place(Order::new("modest_buyer", 3)).unwrap();
        drop(submitter);

        let report = handle.await.unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.rejected, 1);
        assert_eq!(report.remaining_stock, 2);
    }

    #[tokio::test]
    async fn queued_orders_are_serviced_in_arrival_order() {
        // Stock only covers the first two orders, so service order is
        // observable through which requesters win.
        let inventory = Arc::new(Inventory::new(30));
        let (submitter, intake) = OrderQueue::new();

        submitter.place(Order::new("first", 20)).unwrap();
        submitter.place(Order::new("second", 10)).unwrap();
        submitter.place(Order::new("third", 10)).unwrap();
        drop(submitter);

        let handle = spawn_worker(intake, &inventory, CancellationToken::new());
        let report = handle.await.unwrap();

        assert_eq!(report.processed, 2);
        assert_eq!(report.rejected, 1);
        assert_eq!(report.remaining_stock, 0);
    }

    #[tokio::test]
    async fn cancellation_while_blocked_on_empty_queue_stops_worker() {
        let inventory = Arc::new(Inventory::new(10));
        let (submitter, intake) = OrderQueue::new();
        let cancel = CancellationToken::new();
        let handle = spawn_worker(intake, &inventory, cancel.clone());

        // Queue stays open: only the token can stop the worker.
        cancel.cancel();
        let report = timeout(Duration::from_millis(500), handle)
            .await
            .expect("worker should stop promptly after cancellation")
            .unwrap();

        assert_eq!(report.processed, 0);
        assert_eq!(report.remaining_stock, 10);
        drop(submitter);
    }

    #[tokio::test]
    async fn cancellation_during_processing_delay_stops_worker() {
        let inventory = Arc::new(Inventory::new(10));
        let (submitter, intake) = OrderQueue::new();
        let cancel = CancellationToken::new();
        let worker = FulfillmentWorker::new(
            intake,
            Arc::clone(&inventory),
            // Long enough that the worker is still sleeping when cancelled.
            Duration::from_secs(60),
            cancel.clone(),
        );
        let handle = tokio::spawn(worker.run());

        submitter.place(Order::new("only_order", 4)).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();

        let report = timeout(Duration::from_millis(500), handle)
            .await
            .expect("worker should stop promptly after cancellation")
            .unwrap();

        // The in-flight order completed before the delay was cancelled.
        assert_eq!(report.processed, 1);
        assert_eq!(report.remaining_stock, 6);
    }
}
