//! Pure scoring functions (C4-C8). Each takes `(Organization, Opportunity, ...)`
//! and returns a result struct; no I/O, no rule-table mutation. Async/network
//! access lives only at the repository and ingestion boundaries.

pub mod pricing;
pub mod relevance;
pub mod risk;
pub mod supply_chain;
pub mod win_probability;
