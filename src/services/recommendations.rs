use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::engine::profile::{restaurant_profile, RestaurantProfile};
use crate::engine::ranking::rank;
use crate::error::AppError;
use crate::models::location::GeoPoint;
use crate::models::restaurant::Restaurant;
use crate::models::scored::Recommendations;
use crate::models::user::UserProfile;
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationQuery {
    pub user_id: Uuid,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub radius_km: Option<f64>,
}

pub fn register_user(state: &AppState, user: UserProfile) -> Result<UserProfile, AppError> {
    if user.name.trim().is_empty() {
        return Err(AppError::InvalidInput("name cannot be empty".to_string()));
    }
    let user = UserProfile {
        cuisines: user.cuisines.iter().map(|c| c.trim().to_lowercase()).collect(),
        ..user
    };

    state.users.insert(user.id, user.clone());
    Ok(user)
}

pub fn register_restaurant(
    state: &AppState,
    restaurant: Restaurant,
) -> Result<Restaurant, AppError> {
    if restaurant.name.trim().is_empty() {
        return Err(AppError::InvalidInput("name cannot be empty".to_string()));
    }
    restaurant.location.validate()?;

    state.restaurants.insert(restaurant.clone());
    Ok(restaurant)
}

fn user(state: &AppState, user_id: Uuid) -> Result<UserProfile, AppError> {
    state
        .users
        .get(&user_id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("user {} not found", user_id)))
}

/// Ranks the restaurants around the user, or every restaurant when no
/// location is given.
pub fn recommend(
    state: &AppState,
    query: &RecommendationQuery,
) -> Result<Recommendations, AppError> {
    let user = user(state, query.user_id)?;

    let radius_km = query
        .radius_km
        .unwrap_or(state.config.restaurant_search_radius_km);
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(AppError::InvalidInput(format!(
            "radius must be a positive number of km, got {radius_km}"
        )));
    }

    let candidates = match &query.location {
        Some(location) => {
            location.validate()?;
            state.restaurants.within_radius(location, radius_km * 1000.0)
        }
        None => state.restaurants.all(),
    };

    let recommendations = rank(&user, &candidates);
    state.metrics.recommendations_total.inc();

    debug!(
        user_id = %query.user_id,
        candidates = candidates.len(),
        restaurants = recommendations.restaurants.len(),
        dishes = recommendations.dishes.len(),
        "recommendations computed"
    );
    Ok(recommendations)
}

pub fn profile_for(
    state: &AppState,
    user_id: Uuid,
    restaurant_id: Uuid,
) -> Result<RestaurantProfile, AppError> {
    let user = user(state, user_id)?;
    let restaurant = state
        .restaurants
        .get(restaurant_id)
        .ok_or_else(|| AppError::NotFound(format!("restaurant {} not found", restaurant_id)))?;

    Ok(restaurant_profile(&user.taste(), &restaurant))
}
