use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::location::GeoPoint;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DonationStatus {
    Pending,
    Assigned,
    #[serde(rename = "Awaiting Confirmation")]
    AwaitingConfirmation,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Donation {
    pub id: Uuid,
    pub donor_id: Uuid,
    pub food_type: String,
    pub quantity_kg: f64,
    pub prepared_at: Option<DateTime<Utc>>,
    pub location: GeoPoint,
    pub status: DonationStatus,
    pub assigned_ngo: Option<Uuid>,
    pub pickup_confirmed: bool,
    pub created_at: DateTime<Utc>,
}

impl Donation {
    /// Hours elapsed between preparation and `now`. Unknown preparation time
    /// counts as freshly prepared.
    pub fn age_hours(&self, now: DateTime<Utc>) -> f64 {
        match self.prepared_at {
            Some(prepared_at) => (now - prepared_at).num_milliseconds() as f64 / 3_600_000.0,
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::{Donation, DonationStatus};
    use crate::models::location::GeoPoint;

    fn donation(prepared_hours_ago: Option<i64>) -> Donation {
        let now = Utc::now();
        Donation {
            id: Uuid::new_v4(),
            donor_id: Uuid::new_v4(),
            food_type: "rice".to_string(),
            quantity_kg: 5.0,
            prepared_at: prepared_hours_ago.map(|h| now - Duration::hours(h)),
            location: GeoPoint::new(12.97, 77.59),
            status: DonationStatus::Pending,
            assigned_ngo: None,
            pickup_confirmed: false,
            created_at: now,
        }
    }

    #[test]
    fn age_is_measured_from_preparation() {
        let d = donation(Some(3));
        let age = d.age_hours(d.created_at);
        assert!((age - 3.0).abs() < 1e-6);
    }

    #[test]
    fn missing_preparation_time_is_fresh() {
        let d = donation(None);
        assert_eq!(d.age_hours(Utc::now()), 0.0);
    }

    #[test]
    fn awaiting_confirmation_serializes_with_space() {
        let json = serde_json::to_string(&DonationStatus::AwaitingConfirmation).unwrap();
        assert_eq!(json, r#""Awaiting Confirmation""#);
    }
}
