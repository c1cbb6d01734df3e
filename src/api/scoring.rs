//! Relevance scoring endpoints (`POST /scoring/calculate`, `POST /scoring/batch`).

use crate::api::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{RelevanceScore, RelevanceWeights};
use crate::repository::Repository;
use crate::scoring::relevance;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

const MAX_BATCH_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    pub organization_id: Uuid,
    pub opportunity_id: Uuid,
}

pub async fn calculate(
    State(state): State<AppState>,
    Json(req): Json<CalculateRequest>,
) -> AppResult<Json<RelevanceScore>> {
    let organization = state.repo.get_org(req.organization_id).await?;
    let opportunity = state.repo.get_opportunity(req.opportunity_id).await?;

    let score = relevance::score(&organization, &opportunity, RelevanceWeights::default());
    let upserted = state.repo.upsert_score(score).await?;
    Ok(Json(upserted.value))
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub organization_id: Uuid,
    pub opportunity_ids: Vec<Uuid>,
}

pub async fn batch(
    State(state): State<AppState>,
    Json(req): Json<BatchRequest>,
) -> AppResult<Json<Vec<RelevanceScore>>> {
    if req.opportunity_ids.len() > MAX_BATCH_SIZE {
        return Err(AppError::Validation(format!(
            "opportunity_ids must contain at most {MAX_BATCH_SIZE} entries"
        )));
    }

    let organization = state.repo.get_org(req.organization_id).await?;

    let mut scores = Vec::with_capacity(req.opportunity_ids.len());
    for opportunity_id in &req.opportunity_ids {
        let opportunity = state.repo.get_opportunity(*opportunity_id).await?;
        let score = relevance::score(&organization, &opportunity, RelevanceWeights::default());
        let upserted = state.repo.upsert_score(score).await?;
        scores.push(upserted.value);
    }

    // Ranked by overall score descending; stable for ties.
    scores.sort_by(|a, b| {
        b.overall_score
            .partial_cmp(&a.overall_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(Json(scores))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_over_limit_request_deserializes_with_too_many_ids() {
        let ids: Vec<Uuid> = (0..MAX_BATCH_SIZE + 1).map(|_| Uuid::new_v4()).collect();
        assert!(ids.len() > MAX_BATCH_SIZE);
    }
}
