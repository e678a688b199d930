use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::location::GeoPoint;
use crate::models::number_or;
use crate::models::taste::TasteVector;
use crate::models::user::Diet;

pub const DEFAULT_RATING: f64 = 4.0;
pub const DEFAULT_POPULARITY: f64 = 0.0;
pub const FALLBACK_CUISINE: &str = "indian";
pub const PLACEHOLDER_IMAGE: &str = "/images/placeholder_food.jpg";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dish {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub taste: Option<TasteVector>,
    #[serde(default)]
    pub diet: Option<Diet>,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Dish {
    pub fn new(name: impl Into<String>, taste: TasteVector) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            price: None,
            taste: Some(taste),
            diet: None,
            cuisine: None,
            popularity: None,
            image: None,
        }
    }

    pub fn with_popularity(mut self, popularity: f64) -> Self {
        self.popularity = Some(popularity);
        self
    }

    pub fn with_diet(mut self, diet: Diet) -> Self {
        self.diet = Some(diet);
        self
    }

    pub fn with_cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = Some(cuisine.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn taste(&self) -> TasteVector {
        TasteVector::normalize(self.taste.as_ref())
    }

    pub fn popularity(&self) -> f64 {
        number_or(self.popularity, DEFAULT_POPULARITY)
    }

    pub fn diet(&self) -> Diet {
        self.diet.unwrap_or_default()
    }

    /// Dish cuisine, else the restaurant's, else the house fallback. Always
    /// lower-cased.
    pub fn cuisine_within(&self, restaurant: &Restaurant) -> String {
        self.cuisine
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .or(restaurant.cuisine.as_deref().filter(|c| !c.trim().is_empty()))
            .unwrap_or(FALLBACK_CUISINE)
            .to_lowercase()
    }

    pub fn image_or_placeholder(&self) -> String {
        self.image
            .clone()
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub taste_tags: Option<TasteVector>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub feedback_count: u32,
    pub location: GeoPoint,
    #[serde(default)]
    pub menu: Vec<Dish>,
}

impl Restaurant {
    pub fn new(name: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            cuisine: None,
            taste_tags: None,
            rating: None,
            feedback_count: 0,
            location,
            menu: Vec::new(),
        }
    }

    pub fn with_cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = Some(cuisine.into());
        self
    }

    pub fn with_taste_tags(mut self, taste: TasteVector) -> Self {
        self.taste_tags = Some(taste);
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_dish(mut self, dish: Dish) -> Self {
        self.menu.push(dish);
        self
    }

    pub fn taste_tags(&self) -> TasteVector {
        TasteVector::normalize(self.taste_tags.as_ref())
    }

    pub fn rating(&self) -> f64 {
        number_or(self.rating, DEFAULT_RATING)
    }

    /// Mean popularity over the menu, 0 for an empty menu.
    pub fn average_popularity(&self) -> f64 {
        if self.menu.is_empty() {
            return 0.0;
        }
        let total: f64 = self.menu.iter().map(Dish::popularity).sum();
        total / self.menu.len() as f64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantCandidate {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    pub distance_meters: f64,
}

impl RestaurantCandidate {
    pub fn new(restaurant: Restaurant, distance_meters: f64) -> Self {
        Self {
            restaurant,
            distance_meters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Dish, Restaurant};
    use crate::models::location::GeoPoint;
    use crate::models::taste::TasteVector;
    use crate::models::user::Diet;

    fn restaurant() -> Restaurant {
        Restaurant::new("Spice Route", GeoPoint::new(12.97, 77.59))
    }

    #[test]
    fn absent_fields_use_documented_defaults() {
        let dish: Dish = serde_json::from_str(
            r#"{"id": "00000000-0000-0000-0000-000000000001", "name": "dal"}"#,
        )
        .unwrap();

        assert_eq!(dish.taste(), TasteVector::default());
        assert_eq!(dish.popularity(), 0.0);
        assert_eq!(dish.diet(), Diet::Veg);
        assert_eq!(dish.cuisine_within(&restaurant()), "indian");
        assert_eq!(restaurant().rating(), 4.0);
    }

    #[test]
    fn loose_dish_fields_still_load() {
        let dish: Dish = serde_json::from_str(
            r#"{
                "id": "00000000-0000-0000-0000-000000000002",
                "name": "egg curry",
                "taste": {"spice": null, "oil": 6},
                "diet": "eggetarian"
            }"#,
        )
        .unwrap();

        assert_eq!(dish.taste(), TasteVector::new(3.0, 6.0, 3.0));
        assert_eq!(dish.diet(), Diet::Other);
    }

    #[test]
    fn dish_cuisine_falls_back_to_restaurant() {
        let r = restaurant().with_cuisine("Chinese");
        let plain = Dish::new("noodles", TasteVector::default());
        let own = Dish::new("pasta", TasteVector::default()).with_cuisine("Italian");

        assert_eq!(plain.cuisine_within(&r), "chinese");
        assert_eq!(own.cuisine_within(&r), "italian");
    }

    #[test]
    fn average_popularity_of_empty_menu_is_zero() {
        assert_eq!(restaurant().average_popularity(), 0.0);

        let r = restaurant()
            .with_dish(Dish::new("a", TasteVector::default()).with_popularity(4.0))
            .with_dish(Dish::new("b", TasteVector::default()));
        assert_eq!(r.average_popularity(), 2.0);
    }
}
