use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::restaurant::Restaurant;
use crate::models::scored::DishSummary;
use crate::models::taste::TasteVector;

const HIGHLIGHT_COUNT: usize = 2;
const HIGHLIGHT_BASELINE: f64 = 5.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightedDish {
    pub dish: DishSummary,
    pub score: f64,
}

/// How a single restaurant's flavour lines up with one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantProfile {
    pub restaurant_id: Uuid,
    pub name: String,
    pub taste_tags: TasteVector,
    pub explanation: String,
    pub recommended_dishes: Vec<HighlightedDish>,
}

fn taste_notes(restaurant: &TasteVector, user: &TasteVector) -> String {
    let mut notes = Vec::new();
    if restaurant.spice > user.spice {
        notes.push("Spicy like you prefer.");
    }
    if restaurant.oil < user.oil {
        notes.push("Low oil matches your taste.");
    }
    if restaurant.sweet > user.sweet {
        notes.push("Sweeter just for you.");
    }
    if notes.is_empty() {
        notes.push("Perfectly balanced for you.");
    }
    notes.join(" ")
}

fn manhattan(a: &TasteVector, b: &TasteVector) -> f64 {
    a.components()
        .iter()
        .zip(b.components().iter())
        .map(|(x, y)| (x - y).abs())
        .sum()
}

pub fn restaurant_profile(user_taste: &TasteVector, restaurant: &Restaurant) -> RestaurantProfile {
    let user_taste = TasteVector::normalize(Some(user_taste));
    let tags = restaurant.taste_tags();

    let mut highlights: Vec<HighlightedDish> = restaurant
        .menu
        .iter()
        .map(|dish| HighlightedDish {
            score: HIGHLIGHT_BASELINE - manhattan(&dish.taste(), &user_taste),
            dish: DishSummary {
                restaurant_id: restaurant.id,
                restaurant_name: restaurant.name.clone(),
                dish_id: dish.id,
                name: dish.name.clone(),
                price: dish.price,
                image: dish.image_or_placeholder(),
                popularity: dish.popularity(),
                distance_meters: 0.0,
            },
        })
        .collect();
    highlights.sort_by(|a, b| b.score.total_cmp(&a.score));
    highlights.truncate(HIGHLIGHT_COUNT);

    RestaurantProfile {
        restaurant_id: restaurant.id,
        name: restaurant.name.clone(),
        taste_tags: tags,
        explanation: taste_notes(&tags, &user_taste),
        recommended_dishes: highlights,
    }
}
