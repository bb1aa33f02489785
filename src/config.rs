use std::time::Duration;

use crate::error::SystemError;

/// One requester to spawn at startup.
#[derive(Debug, Clone)]
pub struct OrderSpec {
    pub requester_id: String,
    pub quantity: u32,
}

impl OrderSpec {
    pub fn new(requester_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            requester_id: requester_id.into(),
            quantity,
        }
    }
}

/// Startup parameters for a fulfillment run.
#[derive(Debug, Clone)]
pub struct SystemConfig {
    pub initial_stock: u32,
    pub orders: Vec<OrderSpec>,
    /// Upper bound (exclusive) for each requester's randomized arrival delay.
    pub max_arrival_delay: Duration,
    /// Fixed delay the worker pauses after each order.
    pub processing_delay: Duration,
}

impl Default for SystemConfig {
    /// Default scenario: 60 units of stock against four orders totalling 53.
    fn default() -> Self {
        Self {
            initial_stock: 60,
            orders: vec![
                OrderSpec::new("aliyan", 10),
                OrderSpec::new("Kanwal", 20),
                OrderSpec::new("akbar", 15),
                OrderSpec::new("ishaal", 8),
            ],
            max_arrival_delay: Duration::from_millis(2000),
            processing_delay: Duration::from_millis(1000),
        }
    }
}

impl SystemConfig {
    /// Rejects order specs a reservation could never act on.
    pub fn validate(&self) -> Result<(), SystemError> {
        for spec in &self.orders {
            if spec.quantity == 0 {
                return Err(SystemError::InvalidQuantity {
                    requester_id: spec.requester_id.clone(),
                });
            }
        }
        Ok(())
    }
}
