//! Proposal outline endpoint (`POST /proposals/generate`). Not named in
//! spec §6's core HTTP surface, but the template-fallback module it
//! fronts is part of the supplemented scope — exposed here so the
//! deterministic outline is reachable without a separate client-side
//! relevance/risk call.

use crate::api::AppState;
use crate::error::AppResult;
use crate::proposal::{self, ProposalOutline};
use crate::repository::Repository;
use crate::scoring::{relevance, risk};
use crate::models::RelevanceWeights;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub organization_id: Uuid,
    pub opportunity_id: Uuid,
}

pub async fn generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> AppResult<Json<ProposalOutline>> {
    let organization = state.repo.get_org(req.organization_id).await?;
    let opportunity = state.repo.get_opportunity(req.opportunity_id).await?;

    let relevance = relevance::score(&organization, &opportunity, RelevanceWeights::default());
    let risk = risk::assess(&organization, &opportunity);

    let outline = proposal::generate(&organization, &opportunity, &relevance, &risk);
    Ok(Json(outline))
}
