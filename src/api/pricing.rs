//! Pricing intelligence endpoints: price-band recommendation and a
//! should-cost estimate driven by a caller-supplied labor mix.

use crate::api::AppState;
use crate::error::AppResult;
use crate::models::{PricingRecommendation, ShouldCostEstimate};
use crate::repository::Repository;
use crate::scoring::pricing;
use axum::extract::State;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub opportunity_id: Uuid,
    pub labor_mix: Option<HashMap<String, u32>>,
}

pub async fn recommendation(
    State(state): State<AppState>,
    Json(req): Json<RecommendationRequest>,
) -> AppResult<Json<PricingRecommendation>> {
    let opportunity = state.repo.get_opportunity(req.opportunity_id).await?;
    let result = pricing::recommend(&opportunity, req.labor_mix.as_ref());
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct ShouldCostRequest {
    pub labor_mix: HashMap<String, u32>,
    pub duration_months: u32,
    pub overhead_rate: Decimal,
    pub profit_margin: Decimal,
}

pub async fn should_cost(
    Json(req): Json<ShouldCostRequest>,
) -> AppResult<Json<ShouldCostEstimate>> {
    let result = pricing::calculate_should_cost(
        &req.labor_mix,
        req.duration_months,
        req.overhead_rate,
        req.profit_margin,
    );
    Ok(Json(result))
}
