use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NgoScoreBreakdown {
    pub proximity_score: f64,
    pub capacity_score: f64,
    pub reliability_score: f64,
    pub perishability: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: Uuid,
    pub donation_id: Uuid,
    pub ngo_id: Uuid,
    pub score: f64,
    pub score_breakdown: NgoScoreBreakdown,
    pub remaining_capacity_kg: f64,
    pub assigned_at: DateTime<Utc>,
}

/// Result of one matching attempt for a donation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchReport {
    Assigned(Assignment),
    NoNgoInRange,
    NoSuitableNgo,
    /// Every ranked NGO lost its capacity to a concurrent donation.
    Conflict,
}

impl MatchReport {
    pub fn label(&self) -> &'static str {
        match self {
            MatchReport::Assigned(_) => "assigned",
            MatchReport::NoNgoInRange => "no_ngo_in_range",
            MatchReport::NoSuitableNgo => "no_suitable_ngo",
            MatchReport::Conflict => "conflict",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            MatchReport::Assigned(_) => "Donation Assigned",
            MatchReport::NoNgoInRange => "No NGO available nearby",
            MatchReport::NoSuitableNgo => "No suitable NGO found",
            MatchReport::Conflict => "NGO capacity was claimed by another donation",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchEvent {
    pub donation_id: Uuid,
    pub report: MatchReport,
    pub at: DateTime<Utc>,
}
