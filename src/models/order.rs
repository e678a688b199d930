use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub dish_id: Uuid,
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub restaurant_id: Uuid,
    pub restaurant_name: String,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub feedback_submitted: bool,
    pub created_at: DateTime<Utc>,
}
