use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::engine::feedback::{apply_to_restaurant, blend_user_taste, TasteFeedback};
use crate::error::AppError;
use crate::models::order::{Order, OrderItem};
use crate::models::restaurant::Restaurant;
use crate::models::taste::TasteVector;
use crate::state::AppState;

pub fn place_order(
    state: &AppState,
    user_id: Uuid,
    restaurant_id: Uuid,
    items: Vec<OrderItem>,
    total: f64,
) -> Result<Order, AppError> {
    if items.is_empty() {
        return Err(AppError::InvalidInput("order has no items".to_string()));
    }
    if !total.is_finite() || total <= 0.0 {
        return Err(AppError::InvalidInput(format!("invalid order total {total}")));
    }
    if !state.users.contains_key(&user_id) {
        return Err(AppError::NotFound(format!("user {} not found", user_id)));
    }
    let restaurant = state
        .restaurants
        .get(restaurant_id)
        .ok_or_else(|| AppError::NotFound(format!("restaurant {} not found", restaurant_id)))?;

    let order = Order {
        id: Uuid::new_v4(),
        user_id,
        restaurant_id,
        restaurant_name: restaurant.name,
        items,
        total,
        feedback_submitted: false,
        created_at: Utc::now(),
    };

    state.orders.insert(order.id, order.clone());
    info!(order_id = %order.id, restaurant_id = %restaurant_id, "order placed");
    Ok(order)
}

pub fn orders_for_user(state: &AppState, user_id: Uuid) -> Vec<Order> {
    let mut orders: Vec<Order> = state
        .orders
        .iter()
        .filter(|entry| entry.user_id == user_id)
        .map(|entry| entry.value().clone())
        .collect();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    orders
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackOutcome {
    pub restaurant: Restaurant,
    pub user_taste: TasteVector,
}

/// Folds a diner's taste report into the restaurant profile and their own
/// taste vector. Accepted once per order.
pub fn submit_feedback(
    state: &AppState,
    user_id: Uuid,
    order_id: Uuid,
    feedback: TasteFeedback,
) -> Result<FeedbackOutcome, AppError> {
    feedback.validate()?;

    let mut order = state
        .orders
        .get_mut(&order_id)
        .filter(|order| order.user_id == user_id)
        .ok_or_else(|| AppError::NotFound(format!("order {} not found", order_id)))?;

    if order.feedback_submitted {
        return Err(AppError::Conflict("feedback already submitted".to_string()));
    }

    let mut user = state
        .users
        .get_mut(&user_id)
        .ok_or_else(|| AppError::NotFound(format!("user {} not found", user_id)))?;

    let restaurant = state
        .restaurants
        .update(order.restaurant_id, &mut |r| apply_to_restaurant(r, &feedback))?;

    let user_taste = blend_user_taste(&user.taste(), &feedback);
    user.taste = Some(user_taste);
    order.feedback_submitted = true;

    info!(
        order_id = %order_id,
        restaurant_id = %restaurant.id,
        rating = restaurant.rating(),
        "feedback applied"
    );
    Ok(FeedbackOutcome {
        restaurant,
        user_taste,
    })
}
