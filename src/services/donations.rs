use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::info;
use uuid::Uuid;

use crate::engine::queue::enqueue_donation;
use crate::error::AppError;
use crate::models::assignment::MatchEvent;
use crate::models::donation::{Donation, DonationStatus};
use crate::models::location::GeoPoint;
use crate::models::ngo::{Ngo, RELIABILITY_INCREMENT};
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct DonationSubmission {
    pub donor_id: Uuid,
    pub food_type: String,
    pub quantity_kg: f64,
    #[serde(default)]
    pub prepared_at: Option<DateTime<Utc>>,
    pub location: GeoPoint,
}

fn validate_capacity(capacity_kg: f64) -> Result<(), AppError> {
    if !capacity_kg.is_finite() || capacity_kg < 0.0 {
        return Err(AppError::InvalidInput(format!(
            "capacity must be a non-negative number of kg, got {capacity_kg}"
        )));
    }
    Ok(())
}

pub fn register_ngo(
    state: &AppState,
    name: &str,
    location: GeoPoint,
    capacity_kg: Option<f64>,
) -> Result<Ngo, AppError> {
    if name.trim().is_empty() {
        return Err(AppError::InvalidInput("name cannot be empty".to_string()));
    }
    location.validate()?;

    let mut ngo = Ngo::new(name.trim(), location);
    if let Some(capacity_kg) = capacity_kg {
        validate_capacity(capacity_kg)?;
        ngo = ngo.with_capacity(capacity_kg);
    }

    state.ngos.insert(ngo.clone());
    Ok(ngo)
}

/// Records a pending donation and queues it for matching.
pub async fn submit_donation(
    state: &AppState,
    submission: DonationSubmission,
) -> Result<Donation, AppError> {
    if submission.food_type.trim().is_empty() {
        return Err(AppError::InvalidInput("food type cannot be empty".to_string()));
    }
    if !submission.quantity_kg.is_finite() || submission.quantity_kg <= 0.0 {
        return Err(AppError::InvalidInput(format!(
            "quantity must be a positive number of kg, got {}",
            submission.quantity_kg
        )));
    }
    submission.location.validate()?;

    let donation = Donation {
        id: Uuid::new_v4(),
        donor_id: submission.donor_id,
        food_type: submission.food_type,
        quantity_kg: submission.quantity_kg,
        prepared_at: submission.prepared_at,
        location: submission.location,
        status: DonationStatus::Pending,
        assigned_ngo: None,
        pickup_confirmed: false,
        created_at: Utc::now(),
    };

    state.donations.insert(donation.id, donation.clone());
    enqueue_donation(state, donation.id).await?;

    info!(donation_id = %donation.id, quantity_kg = donation.quantity_kg, "donation submitted");
    Ok(donation)
}

pub fn update_capacity(state: &AppState, ngo_id: Uuid, capacity_kg: f64) -> Result<Ngo, AppError> {
    validate_capacity(capacity_kg)?;
    let ngo = state.ngos.set_capacity(ngo_id, capacity_kg)?;

    info!(ngo_id = %ngo_id, capacity_kg, "ngo capacity updated");
    Ok(ngo)
}

/// The assigned NGO asks the donor to confirm a pickup.
pub fn request_pickup(
    state: &AppState,
    ngo_id: Uuid,
    donation_id: Uuid,
) -> Result<Donation, AppError> {
    let mut donation = state
        .donations
        .get_mut(&donation_id)
        .ok_or_else(|| AppError::NotFound(format!("donation {} not found", donation_id)))?;

    if donation.assigned_ngo != Some(ngo_id) {
        return Err(AppError::Forbidden(
            "this donation is not assigned to you".to_string(),
        ));
    }
    if donation.status != DonationStatus::Assigned {
        return Err(AppError::Conflict(format!(
            "pickup can only be requested for an assigned donation, it is {:?}",
            donation.status
        )));
    }

    donation.status = DonationStatus::AwaitingConfirmation;
    Ok(donation.clone())
}

/// The donor confirms the pickup; the NGO earns reliability for it.
pub fn confirm_pickup(
    state: &AppState,
    donor_id: Uuid,
    donation_id: Uuid,
) -> Result<(Donation, Ngo), AppError> {
    let mut donation = state
        .donations
        .get_mut(&donation_id)
        .ok_or_else(|| AppError::NotFound(format!("donation {} not found", donation_id)))?;

    if donation.donor_id != donor_id {
        return Err(AppError::Forbidden("not your donation".to_string()));
    }
    if !matches!(
        donation.status,
        DonationStatus::Assigned | DonationStatus::AwaitingConfirmation
    ) {
        return Err(AppError::Conflict(format!(
            "pickup cannot be confirmed while the donation is {:?}",
            donation.status
        )));
    }
    let ngo_id = donation
        .assigned_ngo
        .ok_or_else(|| AppError::Internal(format!("donation {} has no NGO", donation_id)))?;

    let ngo = state.ngos.bump_reliability(ngo_id, RELIABILITY_INCREMENT)?;

    donation.status = DonationStatus::Completed;
    donation.pickup_confirmed = true;

    info!(
        donation_id = %donation_id,
        ngo_id = %ngo_id,
        reliability = ngo.reliability_score,
        "pickup confirmed"
    );
    Ok((donation.clone(), ngo))
}

fn newest_first(mut donations: Vec<Donation>) -> Vec<Donation> {
    donations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    donations
}

pub fn donations_by_donor(state: &AppState, donor_id: Uuid) -> Vec<Donation> {
    newest_first(
        state
            .donations
            .iter()
            .filter(|entry| entry.donor_id == donor_id)
            .map(|entry| entry.value().clone())
            .collect(),
    )
}

pub fn donations_assigned_to(state: &AppState, ngo_id: Uuid) -> Vec<Donation> {
    newest_first(
        state
            .donations
            .iter()
            .filter(|entry| entry.assigned_ngo == Some(ngo_id))
            .map(|entry| entry.value().clone())
            .collect(),
    )
}

/// Live feed of matching outcomes. Lagged subscribers skip what they missed.
pub fn watch_match_events(state: &AppState) -> impl Stream<Item = MatchEvent> + Send + use<> {
    let rx = state.match_events_tx.subscribe();
    BroadcastStream::new(rx).filter_map(|result| result.ok())
}
