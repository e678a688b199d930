use crate::models::location::GeoPoint;

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two points in meters.
pub fn haversine_meters(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let sin_lat = (delta_lat / 2.0).sin();
    let sin_lng = (delta_lng / 2.0).sin();

    let haversine = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lng * sin_lng;
    let central_angle = 2.0 * haversine.sqrt().asin();

    EARTH_RADIUS_METERS * central_angle
}

#[cfg(test)]
mod tests {
    use super::haversine_meters;
    use crate::models::location::GeoPoint;

    #[test]
    fn zero_distance_for_same_point() {
        let p = GeoPoint::new(19.076, 72.8777);
        assert!(haversine_meters(&p, &p) < 1e-6);
    }

    #[test]
    fn mumbai_to_pune_is_around_120_km() {
        let mumbai = GeoPoint::new(19.076, 72.8777);
        let pune = GeoPoint::new(18.5204, 73.8567);
        let distance = haversine_meters(&mumbai, &pune);
        assert!((distance - 120_000.0).abs() < 5_000.0);
    }
}
