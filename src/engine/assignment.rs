use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::engine::matching::{rank_ngos, DonationRequest, ScoredNgo};
use crate::error::AppError;
use crate::models::assignment::{Assignment, MatchEvent, MatchReport};
use crate::models::donation::{Donation, DonationStatus};
use crate::state::AppState;

pub async fn run_matching_engine(state: Arc<AppState>, mut donation_rx: mpsc::Receiver<Uuid>) {
    info!("matching engine started");

    while let Some(donation_id) = donation_rx.recv().await {
        state.metrics.donations_in_queue.dec();

        let start = Instant::now();
        let outcome = match process_donation(&state, donation_id, Utc::now()) {
            Ok(report) => report.label(),
            Err(err) => {
                error!(donation_id = %donation_id, error = %err, "failed to match donation");
                "error"
            }
        };
        state
            .metrics
            .observe_match(outcome, start.elapsed().as_secs_f64());
    }

    warn!("matching engine stopped: queue channel closed");
}

/// Matches one pending donation against the NGOs around it and commits the
/// capacity reservation. Publishes a [`MatchEvent`] for every outcome.
pub fn process_donation(
    state: &AppState,
    donation_id: Uuid,
    now: DateTime<Utc>,
) -> Result<MatchReport, AppError> {
    let donation = state
        .donations
        .get(&donation_id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("donation {} not found", donation_id)))?;

    if donation.status != DonationStatus::Pending {
        return Err(AppError::Conflict(format!(
            "donation {} is already {:?}",
            donation_id, donation.status
        )));
    }

    let radius = state.config.ngo_search_radius_meters;
    let candidates = state.ngos.within_radius(&donation.location, radius);
    let request = DonationRequest {
        quantity_kg: donation.quantity_kg,
        age_hours: donation.age_hours(now),
    };
    let ranking = rank_ngos(&request, &candidates, radius)?;

    let report = if ranking.in_range == 0 {
        warn!(donation_id = %donation_id, "no NGO within range");
        MatchReport::NoNgoInRange
    } else if ranking.ranked.is_empty() {
        warn!(
            donation_id = %donation_id,
            in_range = ranking.in_range,
            "no NGO in range can take the donation"
        );
        MatchReport::NoSuitableNgo
    } else {
        match reserve_best(state, &donation, ranking.ranked)? {
            Some((winner, remaining)) => {
                MatchReport::Assigned(commit_assignment(state, &donation, winner, remaining, now)?)
            }
            None => MatchReport::Conflict,
        }
    };

    let _ = state.match_events_tx.send(MatchEvent {
        donation_id,
        report: report.clone(),
        at: now,
    });

    Ok(report)
}

/// Walks the ranking until one NGO's capacity can be reserved.
fn reserve_best(
    state: &AppState,
    donation: &Donation,
    ranked: Vec<ScoredNgo>,
) -> Result<Option<(ScoredNgo, f64)>, AppError> {
    for scored in ranked {
        let ngo_id = scored.candidate.ngo.id;
        match state.ngos.reserve_capacity(ngo_id, donation.quantity_kg) {
            Ok(remaining) => return Ok(Some((scored, remaining))),
            Err(err) if err.is_conflict() => {
                warn!(
                    donation_id = %donation.id,
                    ngo_id = %ngo_id,
                    "capacity claimed concurrently; trying next candidate"
                );
            }
            Err(err) => return Err(err),
        }
    }

    warn!(donation_id = %donation.id, "every ranked NGO lost its capacity");
    Ok(None)
}

fn commit_assignment(
    state: &AppState,
    donation: &Donation,
    winner: ScoredNgo,
    remaining_capacity_kg: f64,
    now: DateTime<Utc>,
) -> Result<Assignment, AppError> {
    let ngo_id = winner.candidate.ngo.id;

    // Status check and write happen under the same entry lock.
    let claimed = match state.donations.get_mut(&donation.id) {
        Some(mut stored) if stored.status == DonationStatus::Pending => {
            stored.status = DonationStatus::Assigned;
            stored.assigned_ngo = Some(ngo_id);
            true
        }
        _ => false,
    };

    if !claimed {
        state.ngos.release_capacity(ngo_id, donation.quantity_kg)?;
        warn!(
            donation_id = %donation.id,
            ngo_id = %ngo_id,
            "donation left pending state during matching; reservation released"
        );
        return Err(AppError::Conflict(format!(
            "donation {} was matched concurrently",
            donation.id
        )));
    }

    state
        .metrics
        .ngo_capacity_remaining_kg
        .with_label_values(&[&ngo_id.to_string()])
        .set(remaining_capacity_kg);

    let assignment = Assignment {
        id: Uuid::new_v4(),
        donation_id: donation.id,
        ngo_id,
        score: winner.score,
        score_breakdown: winner.breakdown,
        remaining_capacity_kg,
        assigned_at: now,
    };
    state.assignments.insert(assignment.id, assignment.clone());

    info!(
        donation_id = %donation.id,
        ngo_id = %ngo_id,
        ngo = %winner.candidate.ngo.name,
        score = winner.score,
        "donation assigned"
    );

    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::{commit_assignment, process_donation};
    use crate::config::Config;
    use crate::engine::matching::{rank_ngos, DonationRequest};
    use crate::error::AppError;
    use crate::models::assignment::MatchReport;
    use crate::models::donation::{Donation, DonationStatus};
    use crate::models::location::GeoPoint;
    use crate::models::ngo::Ngo;
    use crate::state::AppState;

    const DONOR_SPOT: GeoPoint = GeoPoint {
        lat: 12.9716,
        lng: 77.5946,
    };

    fn state() -> Arc<AppState> {
        let (state, _rx) = AppState::new(Config::default());
        Arc::new(state)
    }

    fn pending(state: &AppState, quantity_kg: f64, hours_old: i64) -> Uuid {
        let now = Utc::now();
        let donation = Donation {
            id: Uuid::new_v4(),
            donor_id: Uuid::new_v4(),
            food_type: "curry".to_string(),
            quantity_kg,
            prepared_at: Some(now - Duration::hours(hours_old)),
            location: DONOR_SPOT,
            status: DonationStatus::Pending,
            assigned_ngo: None,
            pickup_confirmed: false,
            created_at: now,
        };
        let id = donation.id;
        state.donations.insert(id, donation);
        id
    }

    #[test]
    fn assigns_and_reserves_capacity() {
        let state = state();
        let ngo = Ngo::new("Food Bank", GeoPoint::new(12.975, 77.5946)).with_capacity(30.0);
        let ngo_id = ngo.id;
        state.ngos.insert(ngo);
        let donation_id = pending(&state, 12.0, 1);

        let report = process_donation(&state, donation_id, Utc::now()).unwrap();

        let assignment = match report {
            MatchReport::Assigned(assignment) => assignment,
            other => panic!("expected assignment, got {other:?}"),
        };
        assert_eq!(assignment.ngo_id, ngo_id);
        assert_eq!(assignment.remaining_capacity_kg, 18.0);
        assert_eq!(state.ngos.get(ngo_id).unwrap().capacity_kg, 18.0);

        let donation = state.donations.get(&donation_id).unwrap().clone();
        assert_eq!(donation.status, DonationStatus::Assigned);
        assert_eq!(donation.assigned_ngo, Some(ngo_id));
        assert_eq!(state.assignments.len(), 1);
    }

    #[test]
    fn empty_neighbourhood_leaves_donation_pending() {
        let state = state();
        state
            .ngos
            .insert(Ngo::new("Elsewhere", GeoPoint::new(28.61, 77.20)));
        let donation_id = pending(&state, 5.0, 0);

        let report = process_donation(&state, donation_id, Utc::now()).unwrap();

        assert!(matches!(report, MatchReport::NoNgoInRange));
        let donation = state.donations.get(&donation_id).unwrap().clone();
        assert_eq!(donation.status, DonationStatus::Pending);
    }

    #[test]
    fn full_ngos_are_reported_as_unsuitable() {
        let state = state();
        state
            .ngos
            .insert(Ngo::new("Full", GeoPoint::new(12.972, 77.5946)).with_capacity(2.0));
        let donation_id = pending(&state, 5.0, 0);

        let report = process_donation(&state, donation_id, Utc::now()).unwrap();
        assert!(matches!(report, MatchReport::NoSuitableNgo));
        assert_eq!(report.message(), "No suitable NGO found");
    }

    #[test]
    fn assigned_donation_is_not_matched_twice() {
        let state = state();
        state
            .ngos
            .insert(Ngo::new("Food Bank", GeoPoint::new(12.975, 77.5946)));
        let donation_id = pending(&state, 5.0, 0);

        process_donation(&state, donation_id, Utc::now()).unwrap();
        let again = process_donation(&state, donation_id, Utc::now());
        assert!(matches!(again, Err(AppError::Conflict(_))));
    }

    #[test]
    fn invalid_quantity_is_rejected() {
        let state = state();
        state
            .ngos
            .insert(Ngo::new("Food Bank", GeoPoint::new(12.975, 77.5946)));
        let donation_id = pending(&state, 0.0, 0);

        let result = process_donation(&state, donation_id, Utc::now());
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn commit_releases_capacity_when_donation_was_taken_meanwhile() {
        let state = state();
        let ngo = Ngo::new("Food Bank", GeoPoint::new(12.975, 77.5946)).with_capacity(30.0);
        let ngo_id = ngo.id;
        state.ngos.insert(ngo);
        let donation_id = pending(&state, 12.0, 0);
        let donation = state.donations.get(&donation_id).unwrap().clone();

        let request = DonationRequest {
            quantity_kg: 12.0,
            age_hours: 0.0,
        };
        let candidates = state.ngos.within_radius(&DONOR_SPOT, 10_000.0);
        let winner = rank_ngos(&request, &candidates, 10_000.0)
            .unwrap()
            .ranked
            .remove(0);
        let remaining = state.ngos.reserve_capacity(ngo_id, 12.0).unwrap();

        state.donations.get_mut(&donation_id).unwrap().status = DonationStatus::Assigned;

        let result = commit_assignment(&state, &donation, winner, remaining, Utc::now());
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(state.ngos.get(ngo_id).unwrap().capacity_kg, 30.0);
        assert!(state.assignments.is_empty());
    }

    #[test]
    fn concurrent_matching_of_one_donation_reserves_once() {
        let state = state();
        let ngo = Ngo::new("Food Bank", GeoPoint::new(12.975, 77.5946)).with_capacity(30.0);
        let ngo_id = ngo.id;
        state.ngos.insert(ngo);
        let donation_id = pending(&state, 12.0, 0);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let state = state.clone();
                thread::spawn(move || {
                    matches!(
                        process_donation(&state, donation_id, Utc::now()),
                        Ok(MatchReport::Assigned(_))
                    )
                })
            })
            .collect();

        let assigned = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();

        assert_eq!(assigned, 1);
        assert_eq!(state.ngos.get(ngo_id).unwrap().capacity_kg, 18.0);
        assert_eq!(state.assignments.len(), 1);
    }
}
