use crate::error::AppError;
use crate::models::assignment::NgoScoreBreakdown;
use crate::models::ngo::NgoCandidate;

const PROXIMITY_WEIGHT: f64 = 0.40;
const CAPACITY_WEIGHT: f64 = 0.20;
const RELIABILITY_WEIGHT: f64 = 0.40;

const CAPACITY_SCALE_KG: f64 = 100.0;

/// What the matcher needs to know about a donation.
#[derive(Debug, Clone, Copy)]
pub struct DonationRequest {
    pub quantity_kg: f64,
    pub age_hours: f64,
}

impl DonationRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.quantity_kg.is_finite() || self.quantity_kg <= 0.0 {
            return Err(AppError::InvalidInput(format!(
                "quantity must be a positive number of kg, got {}",
                self.quantity_kg
            )));
        }
        if !self.age_hours.is_finite() {
            return Err(AppError::InvalidInput(
                "food age must be a finite number of hours".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ScoredNgo {
    pub candidate: NgoCandidate,
    pub score: f64,
    pub breakdown: NgoScoreBreakdown,
}

#[derive(Debug, Clone)]
pub enum MatchOutcome {
    Selected(ScoredNgo),
    /// The radius query came back empty.
    NoNgoInRange,
    /// NGOs were in range but none had room or was available.
    NoSuitableNgo,
}

/// Eligible candidates in descending score order. The first entry is the
/// match; the rest are fallbacks when its capacity has been taken meanwhile.
#[derive(Debug, Clone)]
pub struct NgoRanking {
    pub in_range: usize,
    pub ranked: Vec<ScoredNgo>,
}

impl NgoRanking {
    pub fn into_outcome(self) -> MatchOutcome {
        if self.in_range == 0 {
            return MatchOutcome::NoNgoInRange;
        }
        match self.ranked.into_iter().next() {
            Some(best) => MatchOutcome::Selected(best),
            None => MatchOutcome::NoSuitableNgo,
        }
    }
}

/// Step discount on reliability by food age: fresher food favours reliable
/// NGOs more strongly.
pub fn perishability_score(age_hours: f64) -> f64 {
    if age_hours > 4.0 {
        0.4
    } else if age_hours > 2.0 {
        0.7
    } else {
        1.0
    }
}

pub fn compute_score(candidate: &NgoCandidate, perishability: f64) -> (f64, NgoScoreBreakdown) {
    let breakdown = NgoScoreBreakdown {
        proximity_score: 1.0 / (candidate.distance_meters + 1.0),
        capacity_score: candidate.ngo.capacity_kg / CAPACITY_SCALE_KG,
        reliability_score: candidate.ngo.reliability_score * perishability,
        perishability,
    };

    let score = weighted_score(&breakdown);
    (score, breakdown)
}

pub fn weighted_score(breakdown: &NgoScoreBreakdown) -> f64 {
    (breakdown.proximity_score * PROXIMITY_WEIGHT)
        + (breakdown.capacity_score * CAPACITY_WEIGHT)
        + (breakdown.reliability_score * RELIABILITY_WEIGHT)
}

/// Candidates whose numbers cannot produce a meaningful score. They are
/// neither counted as in range nor ranked.
fn is_scorable(candidate: &NgoCandidate) -> bool {
    candidate.distance_meters.is_finite()
        && candidate.distance_meters >= 0.0
        && candidate.ngo.capacity_kg.is_finite()
        && candidate.ngo.reliability_score.is_finite()
}

fn is_eligible(candidate: &NgoCandidate, quantity_kg: f64, max_distance_meters: f64) -> bool {
    is_scorable(candidate)
        && candidate.distance_meters <= max_distance_meters
        && candidate.ngo.capacity_kg >= quantity_kg
        && candidate.ngo.availability
}

/// Scores every eligible candidate. `candidates` is expected in ascending
/// distance order; equal scores keep that order.
pub fn rank_ngos(
    request: &DonationRequest,
    candidates: &[NgoCandidate],
    max_distance_meters: f64,
) -> Result<NgoRanking, AppError> {
    request.validate()?;

    let perishability = perishability_score(request.age_hours);
    let in_range = candidates
        .iter()
        .filter(|c| is_scorable(c) && c.distance_meters <= max_distance_meters)
        .count();

    let mut ranked: Vec<ScoredNgo> = candidates
        .iter()
        .filter(|c| is_eligible(c, request.quantity_kg, max_distance_meters))
        .filter_map(|candidate| {
            let (score, breakdown) = compute_score(candidate, perishability);
            score.is_finite().then(|| ScoredNgo {
                candidate: candidate.clone(),
                score,
                breakdown,
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    Ok(NgoRanking { in_range, ranked })
}

pub fn match_ngo(
    request: &DonationRequest,
    candidates: &[NgoCandidate],
    max_distance_meters: f64,
) -> Result<MatchOutcome, AppError> {
    Ok(rank_ngos(request, candidates, max_distance_meters)?.into_outcome())
}
