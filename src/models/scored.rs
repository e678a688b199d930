use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A ranked entity with its score rounded to four decimals, the score as a
/// whole percentage, and a human readable reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredResult<T> {
    pub entity: T,
    pub final_score: f64,
    pub match_percent: i64,
    pub explanation: String,
}

impl<T> ScoredResult<T> {
    pub fn new(entity: T, raw_score: f64, explanation: String) -> Self {
        let final_score = round_to(raw_score, 4);
        Self {
            entity,
            final_score,
            match_percent: half_up(final_score * 100.0) as i64,
            explanation,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantSummary {
    pub restaurant_id: Uuid,
    pub name: String,
    pub cuisine: Option<String>,
    pub rating: f64,
    pub distance_meters: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishSummary {
    pub restaurant_id: Uuid,
    pub restaurant_name: String,
    pub dish_id: Uuid,
    pub name: String,
    pub price: Option<f64>,
    pub image: String,
    pub popularity: f64,
    pub distance_meters: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Recommendations {
    pub restaurants: Vec<ScoredResult<RestaurantSummary>>,
    pub dishes: Vec<ScoredResult<DishSummary>>,
}

/// Rounds halves towards positive infinity, so `-2.5` becomes `-2`.
fn half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    half_up(value * factor) / factor
}
