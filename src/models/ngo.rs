use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::location::GeoPoint;

pub const DEFAULT_CAPACITY_KG: f64 = 100.0;
pub const INITIAL_RELIABILITY: f64 = 1.0;
/// Added to an NGO's reliability for every pickup a donor confirms.
pub const RELIABILITY_INCREMENT: f64 = 0.1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ngo {
    pub id: Uuid,
    pub name: String,
    pub location: GeoPoint,
    pub capacity_kg: f64,
    pub reliability_score: f64,
    pub availability: bool,
}

impl Ngo {
    pub fn new(name: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            location,
            capacity_kg: DEFAULT_CAPACITY_KG,
            reliability_score: INITIAL_RELIABILITY,
            availability: true,
        }
    }

    pub fn with_capacity(mut self, capacity_kg: f64) -> Self {
        self.capacity_kg = capacity_kg;
        self
    }

    pub fn with_reliability(mut self, reliability_score: f64) -> Self {
        self.reliability_score = reliability_score;
        self
    }
}

/// An NGO returned by a radius query, annotated with its distance to the
/// donation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NgoCandidate {
    #[serde(flatten)]
    pub ngo: Ngo,
    pub distance_meters: f64,
}
