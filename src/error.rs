use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("Order queue is closed")]
    Closed,
}

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Invalid quantity for requester {requester_id}: must be positive")]
    InvalidQuantity { requester_id: String },
    #[error("Order queue closed before all orders were placed")]
    QueueClosed(#[from] QueueError),
    #[error("Task failed: {0}")]
    TaskFailed(String),
}
