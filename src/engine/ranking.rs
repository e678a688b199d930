use crate::engine::explanation::Explanation;
use crate::engine::similarity::taste_similarity;
use crate::models::restaurant::{Dish, RestaurantCandidate};
use crate::models::scored::{DishSummary, Recommendations, RestaurantSummary, ScoredResult};
use crate::models::user::UserProfile;

pub const MAX_RESTAURANTS: usize = 30;
pub const MAX_DISHES: usize = 50;

const RESTAURANT_TASTE_WEIGHT: f64 = 0.40;
const RESTAURANT_POPULARITY_WEIGHT: f64 = 0.20;
const RESTAURANT_RATING_WEIGHT: f64 = 0.40;
const RATING_SCALE: f64 = 5.0;

const DISH_TASTE_WEIGHT: f64 = 0.55;
const DISH_POPULARITY_WEIGHT: f64 = 0.25;
const DISH_RESTAURANT_WEIGHT: f64 = 0.10;
const DISH_CUISINE_WEIGHT: f64 = 0.08;

const CUISINE_BONUS: f64 = 0.2;
const DIET_PENALTY: f64 = -0.15;

/// Per-component values behind a dish score.
#[derive(Debug, Clone, Copy)]
pub struct DishSignals {
    pub taste_score: f64,
    pub popularity: f64,
    pub restaurant_score: f64,
    pub cuisine_bonus: f64,
    pub diet_penalty: f64,
}

impl DishSignals {
    pub fn total(&self) -> f64 {
        (self.taste_score * DISH_TASTE_WEIGHT)
            + (self.popularity * DISH_POPULARITY_WEIGHT)
            + (self.restaurant_score * DISH_RESTAURANT_WEIGHT)
            + (self.cuisine_bonus * DISH_CUISINE_WEIGHT)
            + self.diet_penalty
    }

    pub fn explain(&self) -> String {
        Explanation::new()
            .taste(self.taste_score)
            .cuisine(self.cuisine_bonus > 0.0)
            .diet(self.diet_penalty == 0.0)
            .popularity(self.popularity)
            .render()
    }
}

pub fn max_popularity(restaurants: &[RestaurantCandidate]) -> f64 {
    restaurants
        .iter()
        .flat_map(|c| c.restaurant.menu.iter())
        .map(Dish::popularity)
        .fold(0.0, f64::max)
}

fn normalized(value: f64, max: f64) -> f64 {
    if max > 0.0 { value / max } else { 0.0 }
}

pub fn score_restaurant(
    user: &UserProfile,
    candidate: &RestaurantCandidate,
    max_popularity: f64,
) -> ScoredResult<RestaurantSummary> {
    let restaurant = &candidate.restaurant;
    let taste_score = taste_similarity(&user.taste(), &restaurant.taste_tags());
    let popularity = normalized(restaurant.average_popularity(), max_popularity);
    let rating = restaurant.rating();

    let score = (taste_score * RESTAURANT_TASTE_WEIGHT)
        + (popularity * RESTAURANT_POPULARITY_WEIGHT)
        + ((rating / RATING_SCALE) * RESTAURANT_RATING_WEIGHT);

    let explanation = Explanation::new()
        .taste(taste_score)
        .popularity(popularity)
        .restaurant_taste(taste_score)
        .render();

    let summary = RestaurantSummary {
        restaurant_id: restaurant.id,
        name: restaurant.name.clone(),
        cuisine: restaurant.cuisine.clone(),
        rating,
        distance_meters: candidate.distance_meters,
    };

    ScoredResult::new(summary, score, explanation)
}

pub fn dish_signals(
    user: &UserProfile,
    candidate: &RestaurantCandidate,
    dish: &Dish,
    max_popularity: f64,
) -> DishSignals {
    let restaurant = &candidate.restaurant;
    let user_taste = user.taste();

    DishSignals {
        taste_score: taste_similarity(&user_taste, &dish.taste()),
        popularity: normalized(dish.popularity(), max_popularity),
        restaurant_score: taste_similarity(&user_taste, &restaurant.taste_tags()),
        cuisine_bonus: if user.prefers_cuisine(&dish.cuisine_within(restaurant)) {
            CUISINE_BONUS
        } else {
            0.0
        },
        diet_penalty: if user.diet.conflicts_with(dish.diet()) {
            DIET_PENALTY
        } else {
            0.0
        },
    }
}

pub fn score_dish(
    user: &UserProfile,
    candidate: &RestaurantCandidate,
    dish: &Dish,
    max_popularity: f64,
) -> ScoredResult<DishSummary> {
    let signals = dish_signals(user, candidate, dish, max_popularity);

    let summary = DishSummary {
        restaurant_id: candidate.restaurant.id,
        restaurant_name: candidate.restaurant.name.clone(),
        dish_id: dish.id,
        name: dish.name.clone(),
        price: dish.price,
        image: dish.image_or_placeholder(),
        popularity: dish.popularity(),
        distance_meters: candidate.distance_meters,
    };

    ScoredResult::new(summary, signals.total(), signals.explain())
}

fn top_n<T>(mut scored: Vec<ScoredResult<T>>, limit: usize) -> Vec<ScoredResult<T>> {
    // sort_by is stable: equal scores keep candidate order
    scored.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
    scored.truncate(limit);
    scored
}

/// Ranks restaurants and their individual dishes for `user`.
pub fn rank(user: &UserProfile, restaurants: &[RestaurantCandidate]) -> Recommendations {
    let max_popularity = max_popularity(restaurants);

    let scored_restaurants = restaurants
        .iter()
        .map(|candidate| score_restaurant(user, candidate, max_popularity))
        .collect();

    let scored_dishes = restaurants
        .iter()
        .flat_map(|candidate| {
            candidate
                .restaurant
                .menu
                .iter()
                .map(move |dish| score_dish(user, candidate, dish, max_popularity))
        })
        .collect();

    Recommendations {
        restaurants: top_n(scored_restaurants, MAX_RESTAURANTS),
        dishes: top_n(scored_dishes, MAX_DISHES),
    }
}
