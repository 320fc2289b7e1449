use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header::LOCATION},
    response::IntoResponse,
};
use serde_json::{Value, json};

use crate::types::{Donation, NewDonation};
use crate::{DonationError, router::AppState};

/// GET /donations -> every donation, newest first.
pub async fn list_donations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Donation>>, DonationError> {
    Ok(Json(state.donations.list_donations().await?))
}

/// POST /donations -> 201 with the donation after its CRM sync.
pub async fn create_donation(
    State(state): State<AppState>,
    body: Result<Json<NewDonation>, JsonRejection>,
) -> Result<impl IntoResponse, DonationError> {
    let Json(new) = body.map_err(|e| DonationError::InvalidBody(e.body_text()))?;
    let donation = state.donations.create_donation(new).await?;
    let location = format!("/donations?id={}", donation.id);
    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(donation)))
}

pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}
