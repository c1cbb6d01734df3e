//! Win-probability endpoint (`POST /win-probability/calculate`). Not
//! persisted — spec §3/§6 name no unique key for this result, unlike
//! relevance scores and risk assessments.

use crate::api::AppState;
use crate::error::AppResult;
use crate::models::WinProbability;
use crate::repository::Repository;
use crate::scoring::win_probability;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    pub organization_id: Uuid,
    pub opportunity_id: Uuid,
}

pub async fn calculate(
    State(state): State<AppState>,
    Json(req): Json<CalculateRequest>,
) -> AppResult<Json<WinProbability>> {
    let organization = state.repo.get_org(req.organization_id).await?;
    let opportunity = state.repo.get_opportunity(req.opportunity_id).await?;

    let result = win_probability::calculate(&organization, &opportunity);
    Ok(Json(result))
}
