use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::errors::AppError;
use crate::services::mail::ContactForm;
use crate::state::AppState;

// POST /api/contact
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    Json(form): Json<ContactForm>,
) -> Result<Json<serde_json::Value>, AppError> {
    let message = form.validate()?;

    state
        .mailer
        .send(&message)
        .await
        .map_err(|e| AppError::Mail(format!("{e:#}")))?;

    Ok(Json(serde_json::json!({ "success": true })))
}
