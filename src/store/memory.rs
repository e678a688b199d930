use dashmap::DashMap;
use uuid::Uuid;

use crate::error::AppError;
use crate::geo::haversine_meters;
use crate::models::location::GeoPoint;
use crate::models::ngo::{Ngo, NgoCandidate};
use crate::models::restaurant::{Restaurant, RestaurantCandidate};
use crate::store::{NgoRepository, RestaurantRepository};

/// DashMap-backed NGO directory. Each entry is guarded by its shard lock, so
/// read-check-write on a single NGO is atomic.
#[derive(Default)]
pub struct MemoryNgoRepository {
    ngos: DashMap<Uuid, Ngo>,
}

impl MemoryNgoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sort_by_distance<T>(items: &mut [T], distance: impl Fn(&T) -> f64) {
    items.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

impl NgoRepository for MemoryNgoRepository {
    fn insert(&self, ngo: Ngo) {
        self.ngos.insert(ngo.id, ngo);
    }

    fn get(&self, id: Uuid) -> Option<Ngo> {
        self.ngos.get(&id).map(|entry| entry.value().clone())
    }

    fn within_radius(&self, center: &GeoPoint, radius_meters: f64) -> Vec<NgoCandidate> {
        let mut candidates: Vec<NgoCandidate> = self
            .ngos
            .iter()
            .filter_map(|entry| {
                let ngo = entry.value();
                let distance_meters = haversine_meters(center, &ngo.location);
                (distance_meters <= radius_meters).then(|| NgoCandidate {
                    ngo: ngo.clone(),
                    distance_meters,
                })
            })
            .collect();

        sort_by_distance(&mut candidates, |c| c.distance_meters);
        candidates
    }

    fn reserve_capacity(&self, id: Uuid, quantity_kg: f64) -> Result<f64, AppError> {
        let mut ngo = self
            .ngos
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("ngo {} not found", id)))?;

        if ngo.capacity_kg < quantity_kg {
            return Err(AppError::Conflict(format!(
                "ngo {} has {} kg left, {} kg requested",
                id, ngo.capacity_kg, quantity_kg
            )));
        }

        ngo.capacity_kg -= quantity_kg;
        Ok(ngo.capacity_kg)
    }

    fn release_capacity(&self, id: Uuid, quantity_kg: f64) -> Result<f64, AppError> {
        let mut ngo = self
            .ngos
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("ngo {} not found", id)))?;

        ngo.capacity_kg += quantity_kg;
        Ok(ngo.capacity_kg)
    }

    fn set_capacity(&self, id: Uuid, capacity_kg: f64) -> Result<Ngo, AppError> {
        let mut ngo = self
            .ngos
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("ngo {} not found", id)))?;

        ngo.capacity_kg = capacity_kg;
        Ok(ngo.clone())
    }

    fn bump_reliability(&self, id: Uuid, increment: f64) -> Result<Ngo, AppError> {
        let mut ngo = self
            .ngos
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("ngo {} not found", id)))?;

        ngo.reliability_score += increment;
        Ok(ngo.clone())
    }
}

#[derive(Default)]
pub struct MemoryRestaurantRepository {
    restaurants: DashMap<Uuid, Restaurant>,
}

impl MemoryRestaurantRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RestaurantRepository for MemoryRestaurantRepository {
    fn insert(&self, restaurant: Restaurant) {
        self.restaurants.insert(restaurant.id, restaurant);
    }

    fn get(&self, id: Uuid) -> Option<Restaurant> {
        self.restaurants.get(&id).map(|entry| entry.value().clone())
    }

    fn within_radius(&self, center: &GeoPoint, radius_meters: f64) -> Vec<RestaurantCandidate> {
        let mut candidates: Vec<RestaurantCandidate> = self
            .restaurants
            .iter()
            .filter_map(|entry| {
                let restaurant = entry.value();
                let distance_meters = haversine_meters(center, &restaurant.location);
                (distance_meters <= radius_meters)
                    .then(|| RestaurantCandidate::new(restaurant.clone(), distance_meters))
            })
            .collect();

        sort_by_distance(&mut candidates, |c| c.distance_meters);
        candidates
    }

    fn all(&self) -> Vec<RestaurantCandidate> {
        self.restaurants
            .iter()
            .map(|entry| RestaurantCandidate::new(entry.value().clone(), 0.0))
            .collect()
    }

    fn update(
        &self,
        id: Uuid,
        apply: &mut dyn FnMut(&mut Restaurant),
    ) -> Result<Restaurant, AppError> {
        let mut restaurant = self
            .restaurants
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("restaurant {} not found", id)))?;

        apply(restaurant.value_mut());
        Ok(restaurant.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::{MemoryNgoRepository, MemoryRestaurantRepository};
    use crate::error::AppError;
    use crate::models::location::GeoPoint;
    use crate::models::ngo::Ngo;
    use crate::models::restaurant::Restaurant;
    use crate::store::{NgoRepository, RestaurantRepository};

    const CENTER: GeoPoint = GeoPoint {
        lat: 12.9716,
        lng: 77.5946,
    };

    #[test]
    fn radius_query_is_sorted_and_bounded() {
        let repo = MemoryNgoRepository::new();
        repo.insert(Ngo::new("mid", GeoPoint::new(12.99, 77.5946)));
        repo.insert(Ngo::new("near", GeoPoint::new(12.972, 77.5946)));
        repo.insert(Ngo::new("far", GeoPoint::new(13.5, 77.5946)));

        let found = repo.within_radius(&CENTER, 10_000.0);
        let names: Vec<&str> = found.iter().map(|c| c.ngo.name.as_str()).collect();
        assert_eq!(names, vec!["near", "mid"]);
        assert!(found[0].distance_meters < found[1].distance_meters);
    }

    #[test]
    fn reservation_fails_without_touching_capacity() {
        let repo = MemoryNgoRepository::new();
        let ngo = Ngo::new("n", CENTER).with_capacity(10.0);
        let id = ngo.id;
        repo.insert(ngo);

        assert_eq!(repo.reserve_capacity(id, 6.0).unwrap(), 4.0);
        assert!(matches!(
            repo.reserve_capacity(id, 6.0),
            Err(AppError::Conflict(_))
        ));
        assert_eq!(repo.get(id).unwrap().capacity_kg, 4.0);

        assert_eq!(repo.release_capacity(id, 6.0).unwrap(), 10.0);
    }

    #[test]
    fn concurrent_reservations_never_overdraw() {
        let repo = Arc::new(MemoryNgoRepository::new());
        let ngo = Ngo::new("n", CENTER).with_capacity(50.0);
        let id = ngo.id;
        repo.insert(ngo);

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let repo = repo.clone();
                thread::spawn(move || repo.reserve_capacity(id, 5.0).is_ok())
            })
            .collect();

        let granted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(granted, 10);
        assert_eq!(repo.get(id).unwrap().capacity_kg, 0.0);
    }

    #[test]
    fn missing_ngo_is_not_found() {
        let repo = MemoryNgoRepository::new();
        let result = repo.bump_reliability(uuid::Uuid::nil(), 0.1);
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn restaurant_update_applies_in_place() {
        let repo = MemoryRestaurantRepository::new();
        let r = Restaurant::new("r", CENTER);
        let id = r.id;
        repo.insert(r);

        let updated = repo.update(id, &mut |r| r.feedback_count += 1).unwrap();
        assert_eq!(updated.feedback_count, 1);
        assert_eq!(repo.all().len(), 1);
        assert_eq!(repo.all()[0].distance_meters, 0.0);
    }
}
