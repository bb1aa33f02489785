use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Shared stock counter with an atomic check-and-decrement operation.
///
/// The counter is the only piece of state in the system that multiple tasks
/// mutate, so every read-modify-write goes through a single mutex-guarded
/// reservation. `u32` plus the guarded compare makes a negative stock level
/// unrepresentable.
///
/// Shared as `Arc<Inventory>` and injected into each task that needs it.
pub struct Inventory {
    stock: Mutex<u32>,
}

impl Inventory {
    pub fn new(initial_stock: u32) -> Self {
        Self {
            stock: Mutex::new(initial_stock),
        }
    }

    /// Atomically reserves `quantity` units for `requester_id`.
    ///
    /// Checks and decrements the stock level under one lock acquisition: no
    /// interleaving of concurrent calls can overcommit stock that neither
    /// call alone would have exceeded.
    ///
    /// Insufficient stock is a normal business outcome, not a fault: the
    /// reservation returns `false`, the stock level is untouched, and the
    /// rejection is reported as a warn event.
    #[instrument(skip(self))]
    pub async fn try_reserve(&self, requester_id: &str, quantity: u32) -> bool {
        debug!("Processing reservation request");

        let mut stock = self.stock.lock().await;
        if quantity <= *stock {
            *stock -= quantity;
            info!(remaining_stock = *stock, "Order processed");
            true
        } else {
            warn!(
                available = *stock,
                "Order rejected due to insufficient stock"
            );
            false
        }
    }

    /// Current stock level.
    pub async fn stock(&self) -> u32 {
        *self.stock.lock().await
    }
}
