/// Represents a single order placed by a requester.
///
/// Orders are immutable after construction: they are built by a requester,
/// travel through the order queue, and are dropped once the fulfillment
/// worker has applied them against inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub requester_id: String,
    pub quantity: u32,
}

impl Order {
    /// Creates a new Order.
    ///
    /// # Arguments
    /// * `requester_id` - Identity of the customer placing the order
    /// * `quantity` - Number of units requested (expected to be positive;
    ///   see `SystemConfig::validate`)
    pub fn new(requester_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            requester_id: requester_id.into(),
            quantity,
        }
    }
}
