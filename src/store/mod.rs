//! Storage seams for the service layer.
//!
//! Scoring code never touches these; it receives the candidates a repository
//! returns and hands back what to mutate.

pub mod memory;

use uuid::Uuid;

use crate::error::AppError;
use crate::models::location::GeoPoint;
use crate::models::ngo::{Ngo, NgoCandidate};
use crate::models::restaurant::{Restaurant, RestaurantCandidate};

pub trait NgoRepository: Send + Sync {
    fn insert(&self, ngo: Ngo);

    fn get(&self, id: Uuid) -> Option<Ngo>;

    /// NGOs within `radius_meters` of `center`, nearest first.
    fn within_radius(&self, center: &GeoPoint, radius_meters: f64) -> Vec<NgoCandidate>;

    /// Takes `quantity_kg` out of the NGO's capacity iff enough is left, as a
    /// single step. Returns the remaining capacity, or `Conflict` when the
    /// capacity is no longer sufficient.
    fn reserve_capacity(&self, id: Uuid, quantity_kg: f64) -> Result<f64, AppError>;

    /// Gives back a reservation that could not be committed. Returns the
    /// capacity after the release.
    fn release_capacity(&self, id: Uuid, quantity_kg: f64) -> Result<f64, AppError>;

    fn set_capacity(&self, id: Uuid, capacity_kg: f64) -> Result<Ngo, AppError>;

    /// Adds `increment` to the NGO's reliability score.
    fn bump_reliability(&self, id: Uuid, increment: f64) -> Result<Ngo, AppError>;
}

pub trait RestaurantRepository: Send + Sync {
    fn insert(&self, restaurant: Restaurant);

    fn get(&self, id: Uuid) -> Option<Restaurant>;

    /// Restaurants within `radius_meters` of `center`, nearest first.
    fn within_radius(&self, center: &GeoPoint, radius_meters: f64) -> Vec<RestaurantCandidate>;

    /// Every restaurant with a distance of zero, for requests without a
    /// location.
    fn all(&self) -> Vec<RestaurantCandidate>;

    fn update(
        &self,
        id: Uuid,
        apply: &mut dyn FnMut(&mut Restaurant),
    ) -> Result<Restaurant, AppError>;
}
