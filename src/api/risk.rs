//! Risk assessment endpoint (`POST /risk/assess`).

use crate::api::AppState;
use crate::error::AppResult;
use crate::models::RiskAssessment;
use crate::repository::Repository;
use crate::scoring::risk;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct AssessRequest {
    pub organization_id: Uuid,
    pub opportunity_id: Uuid,
}

pub async fn assess(
    State(state): State<AppState>,
    Json(req): Json<AssessRequest>,
) -> AppResult<Json<RiskAssessment>> {
    let organization = state.repo.get_org(req.organization_id).await?;
    let opportunity = state.repo.get_opportunity(req.opportunity_id).await?;

    let assessment = risk::assess(&organization, &opportunity);
    let upserted = state.repo.upsert_assessment(assessment).await?;
    Ok(Json(upserted.value))
}
