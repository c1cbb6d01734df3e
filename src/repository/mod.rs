//! Repository interface (C10): the narrow set of persistence operations
//! the core consumes. A single operation is atomic; `upsert_score` and
//! `upsert_assessment` each commit exactly one row per
//! `(organization_id, opportunity_id)`, last writer wins. Unique natural
//! keys: `(source_system, source_id)` for opportunities, `uei` for
//! organizations.

pub mod sqlite;

use crate::error::AppResult;
use crate::models::{
    IngestionLog, Opportunity, OpportunityStatus, Organization, RelevanceScore, RiskAssessment,
};
use async_trait::async_trait;
use uuid::Uuid;

/// Wraps a written row with whether the write was a fresh insert (`true`)
/// or an update of an existing row (`false`) — feeds the ingestion
/// adapter's `inserted`/`updated` counters.
#[derive(Debug, Clone)]
pub struct Upserted<T> {
    pub value: T,
    pub inserted: bool,
}

/// Filter accepted by `list_opportunities`. All fields are optional;
/// an absent field does not constrain the result set.
#[derive(Debug, Clone, Default)]
pub struct OpportunityFilter {
    pub naics_prefix: Option<String>,
    pub status: Option<OpportunityStatus>,
    pub page: u32,
    pub page_size: u32,
}

impl OpportunityFilter {
    /// Clamp to the documented page-size default (20) and ceiling (100).
    pub fn normalized(mut self) -> Self {
        if self.page_size == 0 {
            self.page_size = 20;
        }
        self.page_size = self.page_size.min(100);
        self
    }
}

#[async_trait]
pub trait Repository: Send + Sync {
    async fn get_org(&self, id: Uuid) -> AppResult<Organization>;
    async fn upsert_org(&self, org: Organization) -> AppResult<Upserted<Organization>>;
    async fn get_opportunity(&self, id: Uuid) -> AppResult<Opportunity>;
    async fn upsert_opportunity(&self, opportunity: Opportunity) -> AppResult<Upserted<Opportunity>>;
    async fn list_opportunities(&self, filter: OpportunityFilter) -> AppResult<Vec<Opportunity>>;

    async fn upsert_score(&self, score: RelevanceScore) -> AppResult<Upserted<RelevanceScore>>;
    async fn upsert_assessment(&self, assessment: RiskAssessment) -> AppResult<Upserted<RiskAssessment>>;

    async fn create_ingestion_log(&self, log: IngestionLog) -> AppResult<IngestionLog>;
    async fn update_ingestion_log(&self, log: IngestionLog) -> AppResult<IngestionLog>;
    async fn get_ingestion_log(&self, id: Uuid) -> AppResult<IngestionLog>;
    async fn list_ingestion_logs(&self, source: Option<&str>, limit: u32) -> AppResult<Vec<IngestionLog>>;
}
