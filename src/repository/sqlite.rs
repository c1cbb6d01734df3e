//! SQLite-backed `Repository`. WAL mode for concurrent reads during
//! writes; one connection behind a `parking_lot::Mutex` shared across
//! requests, matching the rest of the storage layer's locking style.

use super::{OpportunityFilter, Repository, Upserted};
use crate::error::{AppError, AppResult};
use crate::models::{
    IngestionLog, IngestionStatus, Opportunity, OpportunityStatus, Organization, RelevanceScore,
    RiskAssessment,
};
use crate::rules::set_aside::SetAside;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OpenFlags};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

const SCHEMA_SQL: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS organizations (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    legal_name TEXT,
    uei TEXT UNIQUE,
    duns_number TEXT,
    cage_code TEXT,
    ein TEXT,
    naics_codes_json TEXT NOT NULL,
    psc_codes_json TEXT NOT NULL,
    set_aside_types_json TEXT NOT NULL,
    city TEXT,
    state TEXT,
    zip_code TEXT,
    country TEXT NOT NULL,
    website TEXT,
    employee_count INTEGER,
    annual_revenue TEXT,
    founded_year INTEGER,
    capabilities_narrative TEXT,
    past_performance_summary TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS opportunities (
    id TEXT PRIMARY KEY,
    source_id TEXT NOT NULL,
    source_system TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT,
    notice_type TEXT,
    solicitation_number TEXT,
    naics_code TEXT,
    naics_description TEXT,
    psc_code TEXT,
    psc_description TEXT,
    set_aside_type TEXT,
    posted_date TEXT,
    response_deadline TEXT,
    archive_date TEXT,
    contract_type TEXT,
    estimated_value_min TEXT,
    estimated_value_max TEXT,
    place_of_performance_city TEXT,
    place_of_performance_state TEXT,
    place_of_performance_zip TEXT,
    place_of_performance_country TEXT,
    contracting_office_name TEXT,
    point_of_contact_name TEXT,
    point_of_contact_email TEXT,
    point_of_contact_phone TEXT,
    status TEXT NOT NULL,
    security_clearance_required TEXT,
    raw_data_json TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    ingested_at TEXT NOT NULL,
    UNIQUE(source_system, source_id)
);

CREATE INDEX IF NOT EXISTS idx_opportunities_naics ON opportunities(naics_code);

CREATE TABLE IF NOT EXISTS relevance_scores (
    id TEXT PRIMARY KEY,
    organization_id TEXT NOT NULL,
    opportunity_id TEXT NOT NULL,
    overall_score REAL NOT NULL,
    naics_score REAL NOT NULL,
    semantic_score REAL NOT NULL,
    geographic_score REAL NOT NULL,
    size_score REAL NOT NULL,
    past_performance_score REAL NOT NULL,
    component_weights_json TEXT NOT NULL,
    explanation TEXT NOT NULL,
    calculated_at TEXT NOT NULL,
    UNIQUE(organization_id, opportunity_id)
);

CREATE TABLE IF NOT EXISTS risk_assessments (
    id TEXT PRIMARY KEY,
    organization_id TEXT NOT NULL,
    opportunity_id TEXT NOT NULL,
    overall_risk_score REAL NOT NULL,
    overall_risk_level TEXT NOT NULL,
    eligibility_risk_json TEXT NOT NULL,
    technical_risk_json TEXT NOT NULL,
    pricing_risk_json TEXT NOT NULL,
    resource_risk_json TEXT NOT NULL,
    compliance_risk_json TEXT NOT NULL,
    timeline_risk_json TEXT NOT NULL,
    risk_factors_json TEXT NOT NULL,
    mitigation_suggestions_json TEXT NOT NULL,
    assessed_at TEXT NOT NULL,
    UNIQUE(organization_id, opportunity_id)
);

CREATE TABLE IF NOT EXISTS ingestion_logs (
    id TEXT PRIMARY KEY,
    source_system TEXT NOT NULL,
    started_at TEXT NOT NULL,
    completed_at TEXT,
    status TEXT NOT NULL,
    records_fetched INTEGER NOT NULL,
    records_inserted INTEGER NOT NULL,
    records_updated INTEGER NOT NULL,
    records_failed INTEGER NOT NULL,
    error_message TEXT
);
"#;

pub struct SqliteRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRepository {
    pub fn new(db_path: &str) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = Connection::open_with_flags(db_path, flags)
            .with_context(|| format!("failed to open database at {}", db_path))?;

        conn.execute_batch(SCHEMA_SQL)
            .context("failed to initialize repository schema")?;

        tracing::info!(db_path, "repository database initialized");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn not_found(kind: &str, id: Uuid) -> AppError {
        AppError::NotFound(format!("{} {} not found", kind, id))
    }
}

fn dec_to_sql(d: Decimal) -> String {
    d.to_string()
}

fn opt_dec_to_sql(d: Option<Decimal>) -> Option<String> {
    d.map(dec_to_sql)
}

fn sql_to_dec(s: &str) -> Result<Decimal> {
    Decimal::from_str(s).context("stored decimal is not parseable")
}

fn opt_sql_to_dec(s: Option<String>) -> Result<Option<Decimal>> {
    s.map(|s| sql_to_dec(&s)).transpose()
}

fn dt_to_sql(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn opt_dt_to_sql(dt: Option<DateTime<Utc>>) -> Option<String> {
    dt.map(dt_to_sql)
}

fn sql_to_dt(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc))
}

fn opt_sql_to_dt(s: Option<String>) -> Result<Option<DateTime<Utc>>> {
    s.map(|s| sql_to_dt(&s)).transpose()
}

fn row_to_organization(row: &rusqlite::Row) -> rusqlite::Result<Organization> {
    let naics_codes_json: String = row.get("naics_codes_json")?;
    let psc_codes_json: String = row.get("psc_codes_json")?;
    let set_aside_types_json: String = row.get("set_aside_types_json")?;
    let annual_revenue: Option<String> = row.get("annual_revenue")?;
    let id: String = row.get("id")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;

    Ok(Organization {
        id: Uuid::parse_str(&id).unwrap_or_default(),
        name: row.get("name")?,
        legal_name: row.get("legal_name")?,
        uei: row.get("uei")?,
        duns_number: row.get("duns_number")?,
        cage_code: row.get("cage_code")?,
        ein: row.get("ein")?,
        naics_codes: serde_json::from_str(&naics_codes_json).unwrap_or_default(),
        psc_codes: serde_json::from_str(&psc_codes_json).unwrap_or_default(),
        set_aside_types: serde_json::from_str(&set_aside_types_json).unwrap_or_default(),
        city: row.get("city")?,
        state: row.get("state")?,
        zip_code: row.get("zip_code")?,
        country: row.get("country")?,
        website: row.get("website")?,
        employee_count: row.get("employee_count")?,
        annual_revenue: opt_sql_to_dec(annual_revenue).unwrap_or_default(),
        founded_year: row.get("founded_year")?,
        capabilities_narrative: row.get("capabilities_narrative")?,
        past_performance_summary: row.get("past_performance_summary")?,
        created_at: sql_to_dt(&created_at).unwrap_or_else(|_| Utc::now()),
        updated_at: sql_to_dt(&updated_at).unwrap_or_else(|_| Utc::now()),
    })
}

fn row_to_opportunity(row: &rusqlite::Row) -> rusqlite::Result<Opportunity> {
    let id: String = row.get("id")?;
    let set_aside_type: Option<String> = row.get("set_aside_type")?;
    let status: String = row.get("status")?;
    let estimated_value_min: Option<String> = row.get("estimated_value_min")?;
    let estimated_value_max: Option<String> = row.get("estimated_value_max")?;
    let posted_date: Option<String> = row.get("posted_date")?;
    let response_deadline: Option<String> = row.get("response_deadline")?;
    let archive_date: Option<String> = row.get("archive_date")?;
    let raw_data_json: Option<String> = row.get("raw_data_json")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;
    let ingested_at: String = row.get("ingested_at")?;

    Ok(Opportunity {
        id: Uuid::parse_str(&id).unwrap_or_default(),
        source_id: row.get("source_id")?,
        source_system: row.get("source_system")?,
        title: row.get("title")?,
        description: row.get("description")?,
        notice_type: row.get("notice_type")?,
        solicitation_number: row.get("solicitation_number")?,
        naics_code: row.get("naics_code")?,
        naics_description: row.get("naics_description")?,
        psc_code: row.get("psc_code")?,
        psc_description: row.get("psc_description")?,
        set_aside_type: set_aside_type.and_then(|s| SetAside::from_str(&s)),
        posted_date: opt_sql_to_dt(posted_date).unwrap_or_default(),
        response_deadline: opt_sql_to_dt(response_deadline).unwrap_or_default(),
        archive_date: opt_sql_to_dt(archive_date).unwrap_or_default(),
        contract_type: row.get("contract_type")?,
        estimated_value_min: opt_sql_to_dec(estimated_value_min).unwrap_or_default(),
        estimated_value_max: opt_sql_to_dec(estimated_value_max).unwrap_or_default(),
        place_of_performance_city: row.get("place_of_performance_city")?,
        place_of_performance_state: row.get("place_of_performance_state")?,
        place_of_performance_zip: row.get("place_of_performance_zip")?,
        place_of_performance_country: row.get("place_of_performance_country")?,
        contracting_office_name: row.get("contracting_office_name")?,
        point_of_contact_name: row.get("point_of_contact_name")?,
        point_of_contact_email: row.get("point_of_contact_email")?,
        point_of_contact_phone: row.get("point_of_contact_phone")?,
        status: OpportunityStatus::from_str(&status).unwrap_or(OpportunityStatus::Active),
        security_clearance_required: row.get("security_clearance_required")?,
        raw_data: raw_data_json.and_then(|s| serde_json::from_str(&s).ok()),
        created_at: sql_to_dt(&created_at).unwrap_or_else(|_| Utc::now()),
        updated_at: sql_to_dt(&updated_at).unwrap_or_else(|_| Utc::now()),
        ingested_at: sql_to_dt(&ingested_at).unwrap_or_else(|_| Utc::now()),
    })
}

fn row_to_ingestion_log(row: &rusqlite::Row) -> rusqlite::Result<IngestionLog> {
    let id: String = row.get("id")?;
    let started_at: String = row.get("started_at")?;
    let completed_at: Option<String> = row.get("completed_at")?;
    let status: String = row.get("status")?;

    Ok(IngestionLog {
        id: Uuid::parse_str(&id).unwrap_or_default(),
        source_system: row.get("source_system")?,
        started_at: sql_to_dt(&started_at).unwrap_or_else(|_| Utc::now()),
        completed_at: opt_sql_to_dt(completed_at).unwrap_or_default(),
        status: IngestionStatus::from_str(&status).unwrap_or(IngestionStatus::Queued),
        records_fetched: row.get("records_fetched")?,
        records_inserted: row.get("records_inserted")?,
        records_updated: row.get("records_updated")?,
        records_failed: row.get("records_failed")?,
        error_message: row.get("error_message")?,
    })
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn get_org(&self, id: Uuid) -> AppResult<Organization> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached("SELECT * FROM organizations WHERE id = ?1")
            .map_err(|e| AppError::StorageError(e.into()))?;
        stmt.query_row(params![id.to_string()], row_to_organization)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Self::not_found("organization", id),
                other => AppError::StorageError(other.into()),
            })
    }

    async fn upsert_org(&self, org: Organization) -> AppResult<Upserted<Organization>> {
        let conn = self.conn.lock();

        let existing_id: Option<String> = org
            .uei
            .as_ref()
            .and_then(|uei| {
                conn.query_row(
                    "SELECT id FROM organizations WHERE uei = ?1",
                    params![uei],
                    |row| row.get(0),
                )
                .ok()
            })
            .or_else(|| {
                conn.query_row(
                    "SELECT id FROM organizations WHERE id = ?1",
                    params![org.id.to_string()],
                    |row| row.get(0),
                )
                .ok()
            });

        let inserted = existing_id.is_none();
        let id = existing_id
            .map(|s| Uuid::parse_str(&s).unwrap_or(org.id))
            .unwrap_or(org.id);

        conn.execute(
            "INSERT INTO organizations (
                id, name, legal_name, uei, duns_number, cage_code, ein,
                naics_codes_json, psc_codes_json, set_aside_types_json,
                city, state, zip_code, country, website, employee_count,
                annual_revenue, founded_year, capabilities_narrative,
                past_performance_summary, created_at, updated_at
            ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,?18,?19,?20,?21,?22)
            ON CONFLICT(id) DO UPDATE SET
                name=excluded.name, legal_name=excluded.legal_name, uei=excluded.uei,
                duns_number=excluded.duns_number, cage_code=excluded.cage_code, ein=excluded.ein,
                naics_codes_json=excluded.naics_codes_json, psc_codes_json=excluded.psc_codes_json,
                set_aside_types_json=excluded.set_aside_types_json, city=excluded.city,
                state=excluded.state, zip_code=excluded.zip_code, country=excluded.country,
                website=excluded.website, employee_count=excluded.employee_count,
                annual_revenue=excluded.annual_revenue, founded_year=excluded.founded_year,
                capabilities_narrative=excluded.capabilities_narrative,
                past_performance_summary=excluded.past_performance_summary,
                updated_at=excluded.updated_at",
            params![
                id.to_string(),
                org.name,
                org.legal_name,
                org.uei,
                org.duns_number,
                org.cage_code,
                org.ein,
                serde_json::to_string(&org.naics_codes).unwrap(),
                serde_json::to_string(&org.psc_codes).unwrap(),
                serde_json::to_string(&org.set_aside_types).unwrap(),
                org.city,
                org.state,
                org.zip_code,
                org.country,
                org.website,
                org.employee_count,
                opt_dec_to_sql(org.annual_revenue),
                org.founded_year,
                org.capabilities_narrative,
                org.past_performance_summary,
                dt_to_sql(org.created_at),
                dt_to_sql(Utc::now()),
            ],
        )
        .map_err(|e| AppError::StorageError(e.into()))?;

        drop(conn);
        let value = self.get_org(id).await?;
        Ok(Upserted { value, inserted })
    }

    async fn get_opportunity(&self, id: Uuid) -> AppResult<Opportunity> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached("SELECT * FROM opportunities WHERE id = ?1")
            .map_err(|e| AppError::StorageError(e.into()))?;
        stmt.query_row(params![id.to_string()], row_to_opportunity)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Self::not_found("opportunity", id),
                other => AppError::StorageError(other.into()),
            })
    }

    async fn upsert_opportunity(&self, opp: Opportunity) -> AppResult<Upserted<Opportunity>> {
        let conn = self.conn.lock();

        let existing_id: Option<String> = conn
            .query_row(
                "SELECT id FROM opportunities WHERE source_system = ?1 AND source_id = ?2",
                params![opp.source_system, opp.source_id],
                |row| row.get(0),
            )
            .ok();

        let inserted = existing_id.is_none();
        let id = existing_id
            .map(|s| Uuid::parse_str(&s).unwrap_or(opp.id))
            .unwrap_or(opp.id);

        conn.execute(
            "INSERT INTO opportunities (
                id, source_id, source_system, title, description, notice_type,
                solicitation_number, naics_code, naics_description, psc_code,
                psc_description, set_aside_type, posted_date, response_deadline,
                archive_date, contract_type, estimated_value_min, estimated_value_max,
                place_of_performance_city, place_of_performance_state,
                place_of_performance_zip, place_of_performance_country,
                contracting_office_name, point_of_contact_name, point_of_contact_email,
                point_of_contact_phone, status, security_clearance_required,
                raw_data_json, created_at, updated_at, ingested_at
            ) VALUES (
                ?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,?18,?19,?20,
                ?21,?22,?23,?24,?25,?26,?27,?28,?29,?30,?31,?32
            )
            ON CONFLICT(source_system, source_id) DO UPDATE SET
                title=excluded.title, description=excluded.description,
                notice_type=excluded.notice_type, solicitation_number=excluded.solicitation_number,
                naics_code=excluded.naics_code, naics_description=excluded.naics_description,
                psc_code=excluded.psc_code, psc_description=excluded.psc_description,
                set_aside_type=excluded.set_aside_type, posted_date=excluded.posted_date,
                response_deadline=excluded.response_deadline, archive_date=excluded.archive_date,
                contract_type=excluded.contract_type, estimated_value_min=excluded.estimated_value_min,
                estimated_value_max=excluded.estimated_value_max,
                place_of_performance_city=excluded.place_of_performance_city,
                place_of_performance_state=excluded.place_of_performance_state,
                place_of_performance_zip=excluded.place_of_performance_zip,
                place_of_performance_country=excluded.place_of_performance_country,
                contracting_office_name=excluded.contracting_office_name,
                point_of_contact_name=excluded.point_of_contact_name,
                point_of_contact_email=excluded.point_of_contact_email,
                point_of_contact_phone=excluded.point_of_contact_phone,
                status=excluded.status, security_clearance_required=excluded.security_clearance_required,
                raw_data_json=excluded.raw_data_json, updated_at=excluded.updated_at",
            params![
                id.to_string(),
                opp.source_id,
                opp.source_system,
                opp.title,
                opp.description,
                opp.notice_type,
                opp.solicitation_number,
                opp.naics_code,
                opp.naics_description,
                opp.psc_code,
                opp.psc_description,
                opp.set_aside_type.map(|s| s.as_str().to_string()),
                opt_dt_to_sql(opp.posted_date),
                opt_dt_to_sql(opp.response_deadline),
                opt_dt_to_sql(opp.archive_date),
                opp.contract_type,
                opt_dec_to_sql(opp.estimated_value_min),
                opt_dec_to_sql(opp.estimated_value_max),
                opp.place_of_performance_city,
                opp.place_of_performance_state,
                opp.place_of_performance_zip,
                opp.place_of_performance_country,
                opp.contracting_office_name,
                opp.point_of_contact_name,
                opp.point_of_contact_email,
                opp.point_of_contact_phone,
                format!("{:?}", opp.status).to_lowercase(),
                opp.security_clearance_required,
                opp.raw_data.as_ref().map(|v| v.to_string()),
                dt_to_sql(opp.created_at),
                dt_to_sql(Utc::now()),
                dt_to_sql(opp.ingested_at),
            ],
        )
        .map_err(|e| AppError::StorageError(e.into()))?;

        drop(conn);
        let value = self.get_opportunity(id).await?;
        Ok(Upserted { value, inserted })
    }

    async fn list_opportunities(&self, filter: OpportunityFilter) -> AppResult<Vec<Opportunity>> {
        let filter = filter.normalized();
        let conn = self.conn.lock();

        let mut sql = "SELECT * FROM opportunities WHERE 1=1".to_string();
        if filter.naics_prefix.is_some() {
            sql.push_str(" AND naics_code LIKE ?1");
        }
        if let Some(status) = filter.status {
            sql.push_str(&format!(" AND status = '{}'", format!("{:?}", status).to_lowercase()));
        }
        sql.push_str(" ORDER BY posted_date DESC, id LIMIT ?2 OFFSET ?3");

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| AppError::StorageError(e.into()))?;

        let like_pattern = filter
            .naics_prefix
            .as_ref()
            .map(|p| format!("{}%", p))
            .unwrap_or_default();
        let limit = filter.page_size as i64;
        let offset = (filter.page as i64) * (filter.page_size as i64);

        let rows = stmt
            .query_map(params![like_pattern, limit, offset], row_to_opportunity)
            .map_err(|e| AppError::StorageError(e.into()))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::StorageError(e.into()))
    }

    async fn upsert_score(&self, score: RelevanceScore) -> AppResult<Upserted<RelevanceScore>> {
        let conn = self.conn.lock();

        let existing_id: Option<String> = conn
            .query_row(
                "SELECT id FROM relevance_scores WHERE organization_id = ?1 AND opportunity_id = ?2",
                params![score.organization_id.to_string(), score.opportunity_id.to_string()],
                |row| row.get(0),
            )
            .ok();
        let inserted = existing_id.is_none();
        let id = existing_id
            .map(|s| Uuid::parse_str(&s).unwrap_or(score.id))
            .unwrap_or(score.id);

        conn.execute(
            "INSERT INTO relevance_scores (
                id, organization_id, opportunity_id, overall_score, naics_score,
                semantic_score, geographic_score, size_score, past_performance_score,
                component_weights_json, explanation, calculated_at
            ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)
            ON CONFLICT(organization_id, opportunity_id) DO UPDATE SET
                overall_score=excluded.overall_score, naics_score=excluded.naics_score,
                semantic_score=excluded.semantic_score, geographic_score=excluded.geographic_score,
                size_score=excluded.size_score, past_performance_score=excluded.past_performance_score,
                component_weights_json=excluded.component_weights_json,
                explanation=excluded.explanation, calculated_at=excluded.calculated_at",
            params![
                id.to_string(),
                score.organization_id.to_string(),
                score.opportunity_id.to_string(),
                score.overall_score,
                score.naics_score,
                score.semantic_score,
                score.geographic_score,
                score.size_score,
                score.past_performance_score,
                serde_json::to_string(&score.component_weights).unwrap(),
                score.explanation,
                dt_to_sql(score.calculated_at),
            ],
        )
        .map_err(|e| AppError::StorageError(e.into()))?;

        let mut value = score;
        value.id = id;
        Ok(Upserted { value, inserted })
    }

    async fn upsert_assessment(&self, assessment: RiskAssessment) -> AppResult<Upserted<RiskAssessment>> {
        let conn = self.conn.lock();

        let existing_id: Option<String> = conn
            .query_row(
                "SELECT id FROM risk_assessments WHERE organization_id = ?1 AND opportunity_id = ?2",
                params![
                    assessment.organization_id.to_string(),
                    assessment.opportunity_id.to_string()
                ],
                |row| row.get(0),
            )
            .ok();
        let inserted = existing_id.is_none();
        let id = existing_id
            .map(|s| Uuid::parse_str(&s).unwrap_or(assessment.id))
            .unwrap_or(assessment.id);

        conn.execute(
            "INSERT INTO risk_assessments (
                id, organization_id, opportunity_id, overall_risk_score, overall_risk_level,
                eligibility_risk_json, technical_risk_json, pricing_risk_json,
                resource_risk_json, compliance_risk_json, timeline_risk_json,
                risk_factors_json, mitigation_suggestions_json, assessed_at
            ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14)
            ON CONFLICT(organization_id, opportunity_id) DO UPDATE SET
                overall_risk_score=excluded.overall_risk_score,
                overall_risk_level=excluded.overall_risk_level,
                eligibility_risk_json=excluded.eligibility_risk_json,
                technical_risk_json=excluded.technical_risk_json,
                pricing_risk_json=excluded.pricing_risk_json,
                resource_risk_json=excluded.resource_risk_json,
                compliance_risk_json=excluded.compliance_risk_json,
                timeline_risk_json=excluded.timeline_risk_json,
                risk_factors_json=excluded.risk_factors_json,
                mitigation_suggestions_json=excluded.mitigation_suggestions_json,
                assessed_at=excluded.assessed_at",
            params![
                id.to_string(),
                assessment.organization_id.to_string(),
                assessment.opportunity_id.to_string(),
                assessment.overall_risk_score,
                format!("{:?}", assessment.overall_risk_level).to_lowercase(),
                serde_json::to_string(&assessment.eligibility_risk).unwrap(),
                serde_json::to_string(&assessment.technical_risk).unwrap(),
                serde_json::to_string(&assessment.pricing_risk).unwrap(),
                serde_json::to_string(&assessment.resource_risk).unwrap(),
                serde_json::to_string(&assessment.compliance_risk).unwrap(),
                serde_json::to_string(&assessment.timeline_risk).unwrap(),
                serde_json::to_string(&assessment.risk_factors).unwrap(),
                serde_json::to_string(&assessment.mitigation_suggestions).unwrap(),
                dt_to_sql(assessment.assessed_at),
            ],
        )
        .map_err(|e| AppError::StorageError(e.into()))?;

        let mut value = assessment;
        value.id = id;
        Ok(Upserted { value, inserted })
    }

    async fn create_ingestion_log(&self, log: IngestionLog) -> AppResult<IngestionLog> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO ingestion_logs (
                id, source_system, started_at, completed_at, status,
                records_fetched, records_inserted, records_updated, records_failed,
                error_message
            ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)",
            params![
                log.id.to_string(),
                log.source_system,
                dt_to_sql(log.started_at),
                opt_dt_to_sql(log.completed_at),
                format!("{:?}", log.status).to_lowercase(),
                log.records_fetched,
                log.records_inserted,
                log.records_updated,
                log.records_failed,
                log.error_message,
            ],
        )
        .map_err(|e| AppError::StorageError(e.into()))?;
        Ok(log)
    }

    async fn update_ingestion_log(&self, log: IngestionLog) -> AppResult<IngestionLog> {
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE ingestion_logs SET
                completed_at = ?2, status = ?3, records_fetched = ?4,
                records_inserted = ?5, records_updated = ?6, records_failed = ?7,
                error_message = ?8
             WHERE id = ?1",
            params![
                log.id.to_string(),
                opt_dt_to_sql(log.completed_at),
                format!("{:?}", log.status).to_lowercase(),
                log.records_fetched,
                log.records_inserted,
                log.records_updated,
                log.records_failed,
                log.error_message,
            ],
        )
        .map_err(|e| AppError::StorageError(e.into()))?;
        Ok(log)
    }

    async fn get_ingestion_log(&self, id: Uuid) -> AppResult<IngestionLog> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached("SELECT * FROM ingestion_logs WHERE id = ?1")
            .map_err(|e| AppError::StorageError(e.into()))?;
        stmt.query_row(params![id.to_string()], row_to_ingestion_log)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Self::not_found("ingestion log", id),
                other => AppError::StorageError(other.into()),
            })
    }

    async fn list_ingestion_logs(&self, source: Option<&str>, limit: u32) -> AppResult<Vec<IngestionLog>> {
        let conn = self.conn.lock();
        let sql = if source.is_some() {
            "SELECT * FROM ingestion_logs WHERE source_system = ?1 ORDER BY started_at DESC LIMIT ?2"
        } else {
            "SELECT * FROM ingestion_logs ORDER BY started_at DESC LIMIT ?2"
        };
        let mut stmt = conn.prepare(sql).map_err(|e| AppError::StorageError(e.into()))?;

        let rows = if let Some(source) = source {
            stmt.query_map(params![source, limit], row_to_ingestion_log)
        } else {
            stmt.query_map(params![limit], row_to_ingestion_log)
        }
        .map_err(|e| AppError::StorageError(e.into()))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::StorageError(e.into()))
    }
}
