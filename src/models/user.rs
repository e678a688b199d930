use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::taste::TasteVector;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Diet {
    #[default]
    Veg,
    NonVeg,
    Vegan,
    /// Any label outside the three above, e.g. `eggetarian`.
    #[serde(other)]
    Other,
}

impl Diet {
    /// Whether a dish labelled `dish` conflicts with this dietary preference.
    pub fn conflicts_with(self, dish: Diet) -> bool {
        match self {
            Diet::Veg => dish == Diet::NonVeg,
            Diet::Vegan => dish != Diet::Vegan,
            Diet::NonVeg | Diet::Other => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub taste: Option<TasteVector>,
    #[serde(default)]
    pub diet: Diet,
    #[serde(default)]
    pub cuisines: Vec<String>,
}

impl UserProfile {
    pub fn new(name: impl Into<String>, taste: TasteVector, diet: Diet, cuisines: &[&str]) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            taste: Some(taste),
            diet,
            cuisines: cuisines.iter().map(|c| c.to_lowercase()).collect(),
        }
    }

    pub fn taste(&self) -> TasteVector {
        TasteVector::normalize(self.taste.as_ref())
    }

    pub fn prefers_cuisine(&self, cuisine: &str) -> bool {
        let cuisine = cuisine.to_lowercase();
        self.cuisines.iter().any(|c| c.to_lowercase() == cuisine)
    }
}
