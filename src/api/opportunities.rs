//! CRUD and listing surface for opportunities, including the
//! NAICS-prefix-filtered listing at `/opportunities/naics/{code}`.

use crate::api::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{Opportunity, OpportunityStatus};
use crate::repository::{OpportunityFilter, Repository};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Deserialize, Default)]
pub struct ListQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListQuery {
    fn into_filter(self, naics_prefix: Option<String>) -> AppResult<OpportunityFilter> {
        let status = self
            .status
            .map(|s| {
                OpportunityStatus::from_str(&s)
                    .map_err(|_| AppError::Validation(format!("unknown opportunity status: {s}")))
            })
            .transpose()?;

        Ok(OpportunityFilter {
            naics_prefix,
            status,
            page: self.page.unwrap_or(1),
            page_size: self.page_size.unwrap_or(20),
        }
        .normalized())
    }
}

pub async fn get_opportunity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Opportunity>> {
    let opportunity = state.repo.get_opportunity(id).await?;
    Ok(Json(opportunity))
}

pub async fn upsert_opportunity(
    State(state): State<AppState>,
    Json(opportunity): Json<Opportunity>,
) -> AppResult<Json<Opportunity>> {
    if opportunity.title.trim().is_empty() {
        return Err(AppError::Validation("opportunity title must not be empty".into()));
    }
    let upserted = state.repo.upsert_opportunity(opportunity).await?;
    Ok(Json(upserted.value))
}

pub async fn list_opportunities(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Opportunity>>> {
    let filter = query.into_filter(None)?;
    let opportunities = state.repo.list_opportunities(filter).await?;
    Ok(Json(opportunities))
}

pub async fn list_opportunities_by_naics(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Opportunity>>> {
    let filter = query.into_filter(Some(code))?;
    let opportunities = state.repo.list_opportunities(filter).await?;
    Ok(Json(opportunities))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_query_normalizes_to_page_one_size_twenty() {
        let filter = ListQuery::default().into_filter(None).unwrap();
        assert_eq!(filter.page, 1);
        assert_eq!(filter.page_size, 20);
        assert!(filter.naics_prefix.is_none());
    }

    #[test]
    fn page_size_is_capped_at_one_hundred() {
        let query = ListQuery {
            status: None,
            page: Some(1),
            page_size: Some(500),
        };
        let filter = query.into_filter(None).unwrap();
        assert_eq!(filter.page_size, 100);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let query = ListQuery {
            status: Some("not_a_status".to_string()),
            page: None,
            page_size: None,
        };
        assert!(query.into_filter(None).is_err());
    }

    #[test]
    fn naics_prefix_is_carried_through() {
        let filter = ListQuery::default().into_filter(Some("5415".to_string())).unwrap();
        assert_eq!(filter.naics_prefix.as_deref(), Some("5415"));
    }
}
