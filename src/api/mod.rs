//! HTTP transport (host harness): thin axum adapters over the core. Every
//! handler parses/validates input, calls a pure core function or the
//! repository trait, and maps `AppError` to a status code. No business
//! logic lives here.

pub mod ingestion;
pub mod opportunities;
pub mod organizations;
pub mod pricing;
pub mod proposal;
pub mod risk;
pub mod scoring;
pub mod supply_chain;
pub mod win_probability;

use crate::ingestion::SamGovFetcher;
use crate::models::Config;
use crate::repository::sqlite::SqliteRepository;
use std::sync::Arc;

/// Shared application state injected into every handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<SqliteRepository>,
    pub fetcher: Arc<SamGovFetcher>,
    pub config: Arc<Config>,
}
