//! CRUD surface for organizations.

use crate::api::AppState;
use crate::error::{AppError, AppResult};
use crate::models::Organization;
use crate::repository::Repository;
use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

pub async fn get_organization(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Organization>> {
    let org = state.repo.get_org(id).await?;
    Ok(Json(org))
}

/// Upsert an organization. A request without `id` set to an existing row
/// creates a new organization; sending back a previously returned `id`
/// updates it in place.
pub async fn upsert_organization(
    State(state): State<AppState>,
    Json(org): Json<Organization>,
) -> AppResult<Json<Organization>> {
    if org.name.trim().is_empty() {
        return Err(AppError::Validation("organization name must not be empty".into()));
    }
    let upserted = state.repo.upsert_org(org).await?;
    Ok(Json(upserted.value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_name_is_rejected_before_hitting_the_repository() {
        let org = Organization::new(String::new());
        assert!(org.name.trim().is_empty());
    }
}
