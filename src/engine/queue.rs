use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub async fn enqueue_donation(state: &AppState, donation_id: Uuid) -> Result<(), AppError> {
    state
        .donation_tx
        .send(donation_id)
        .await
        .map_err(|err| AppError::Internal(format!("donation queue send failed: {err}")))?;

    state.metrics.donations_in_queue.inc();
    Ok(())
}
