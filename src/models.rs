use crate::rules::set_aside::SetAside;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Organization/company profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub legal_name: Option<String>,
    pub uei: Option<String>,
    pub duns_number: Option<String>,
    pub cage_code: Option<String>,
    pub ein: Option<String>,

    pub naics_codes: Vec<String>,
    pub psc_codes: Vec<String>,
    pub set_aside_types: Vec<SetAside>,

    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: String,

    pub website: Option<String>,
    pub employee_count: Option<i64>,
    pub annual_revenue: Option<Decimal>,
    pub founded_year: Option<i32>,

    pub capabilities_narrative: Option<String>,
    pub past_performance_summary: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    pub fn new(name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            legal_name: None,
            uei: None,
            duns_number: None,
            cage_code: None,
            ein: None,
            naics_codes: Vec::new(),
            psc_codes: Vec::new(),
            set_aside_types: Vec::new(),
            city: None,
            state: None,
            zip_code: None,
            country: "USA".to_string(),
            website: None,
            employee_count: None,
            annual_revenue: None,
            founded_year: None,
            capabilities_narrative: None,
            past_performance_summary: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityStatus {
    Forecast,
    Presolicitation,
    Active,
    Closed,
    Awarded,
    Cancelled,
    Archived,
}

impl std::str::FromStr for OpportunityStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "forecast" => Ok(Self::Forecast),
            "presolicitation" => Ok(Self::Presolicitation),
            "active" => Ok(Self::Active),
            "closed" => Ok(Self::Closed),
            "awarded" => Ok(Self::Awarded),
            "cancelled" => Ok(Self::Cancelled),
            "archived" => Ok(Self::Archived),
            _ => Err(()),
        }
    }
}

/// A procurement opportunity normalized from an external feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: Uuid,
    pub source_id: String,
    pub source_system: String,

    pub title: String,
    pub description: Option<String>,
    pub notice_type: Option<String>,
    pub solicitation_number: Option<String>,

    pub naics_code: Option<String>,
    pub naics_description: Option<String>,
    pub psc_code: Option<String>,
    pub psc_description: Option<String>,
    pub set_aside_type: Option<SetAside>,

    pub posted_date: Option<DateTime<Utc>>,
    pub response_deadline: Option<DateTime<Utc>>,
    pub archive_date: Option<DateTime<Utc>>,

    pub contract_type: Option<String>,
    pub estimated_value_min: Option<Decimal>,
    pub estimated_value_max: Option<Decimal>,

    pub place_of_performance_city: Option<String>,
    pub place_of_performance_state: Option<String>,
    pub place_of_performance_zip: Option<String>,
    pub place_of_performance_country: Option<String>,

    pub contracting_office_name: Option<String>,
    pub point_of_contact_name: Option<String>,
    pub point_of_contact_email: Option<String>,
    pub point_of_contact_phone: Option<String>,

    pub status: OpportunityStatus,
    pub security_clearance_required: Option<String>,

    pub raw_data: Option<serde_json::Value>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub ingested_at: DateTime<Utc>,
}

/// Unique per `(organization_id, opportunity_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelevanceScore {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub opportunity_id: Uuid,

    pub overall_score: f64,
    pub naics_score: f64,
    pub semantic_score: f64,
    pub geographic_score: f64,
    pub size_score: f64,
    pub past_performance_score: f64,

    pub component_weights: RelevanceWeights,
    pub explanation: String,
    pub calculated_at: DateTime<Utc>,
}

/// Default weights from spec §4.4; must sum to 1.0. Injectable via config.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RelevanceWeights {
    pub naics: f64,
    pub semantic: f64,
    pub geographic: f64,
    pub size: f64,
    pub past_performance: f64,
}

impl Default for RelevanceWeights {
    fn default() -> Self {
        Self {
            naics: 0.25,
            semantic: 0.30,
            geographic: 0.15,
            size: 0.15,
            past_performance: 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score <= 0.25 {
            RiskLevel::Low
        } else if score <= 0.50 {
            RiskLevel::Medium
        } else if score <= 0.75 {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskCategory {
    pub score: f64,
    pub level: RiskLevel,
    pub factors: Vec<String>,
}

/// Unique per `(organization_id, opportunity_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub opportunity_id: Uuid,

    pub overall_risk_score: f64,
    pub overall_risk_level: RiskLevel,

    pub eligibility_risk: RiskCategory,
    pub technical_risk: RiskCategory,
    pub pricing_risk: RiskCategory,
    pub resource_risk: RiskCategory,
    pub compliance_risk: RiskCategory,
    pub timeline_risk: RiskCategory,

    pub risk_factors: Vec<String>,
    pub mitigation_suggestions: Vec<String>,

    pub assessed_at: DateTime<Utc>,
}

/// Unique per `(organization_id, opportunity_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinProbability {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub opportunity_id: Uuid,

    pub win_probability: f64,
    pub match_score: f64,
    pub factors: std::collections::HashMap<String, f64>,
    pub analysis: std::collections::HashMap<String, String>,
    pub recommendation: String,
    pub confidence: f64,

    pub calculated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Compliant,
    NonCompliant,
    Prohibited,
    Unknown,
    RequiresReview,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section889Result {
    pub supplier_name: String,
    pub status: ComplianceStatus,
    pub prohibited_entities_matched: Vec<String>,
    pub risk_indicators: Vec<String>,
    pub recommendation: String,
    pub checked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaaResult {
    pub country_code: String,
    pub country_name: String,
    pub status: ComplianceStatus,
    pub is_designated_country: bool,
    pub is_prohibited: bool,
    pub notes: String,
    pub checked_at: DateTime<Utc>,
}

/// Not persisted by default — a supply-chain verification result handed
/// straight back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierVerification {
    pub supplier_id: String,
    pub supplier_name: String,
    pub verified: bool,
    pub section_889_result: Section889Result,
    pub taa_result: Option<TaaResult>,
    pub overall_risk_score: f64,
    pub risk_level: String,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
    pub verified_at: DateTime<Utc>,
}

/// Not persisted — a pricing recommendation handed straight back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRecommendation {
    pub opportunity_id: String,
    pub recommended_price_min: Decimal,
    pub recommended_price_max: Decimal,
    pub competitive_position: String,
    pub confidence: f64,
    pub factors: serde_json::Value,
    pub labor_rates: Vec<crate::rules::labor::LaborRateBenchmark>,
    pub benchmarks: Vec<crate::rules::naics::ContractValueBenchmark>,
    pub notes: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// Per-category line in a should-cost estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaborCostLine {
    pub fte_count: u32,
    pub hourly_rate: Decimal,
    pub total_cost: Decimal,
}

/// Not persisted — a should-cost estimate handed straight back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShouldCostEstimate {
    pub labor_breakdown: std::collections::HashMap<String, LaborCostLine>,
    pub direct_labor: Decimal,
    pub overhead_cost: Decimal,
    pub overhead_rate: Decimal,
    pub subtotal: Decimal,
    pub profit_margin: Decimal,
    pub profit: Decimal,
    pub total_price: Decimal,
    pub duration_months: u32,
    pub price_per_month: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestionStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

impl std::str::FromStr for IngestionStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "queued" => Ok(Self::Queued),
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionLog {
    pub id: Uuid,
    pub source_system: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub status: IngestionStatus,
    pub records_fetched: u32,
    pub records_inserted: u32,
    pub records_updated: u32,
    pub records_failed: u32,
    pub error_message: Option<String>,
}

/// Application configuration, environment-driven per `Config::from_env`.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub port: u16,
    pub feed_base_url: String,
    pub feed_api_key: Option<String>,
    pub cors_origins: Vec<String>,
    pub cache_ttl_secs: u64,
    pub rate_limit_per_minute: u32,
    pub jwt_secret: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| "./procureiq.db".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);

        let feed_base_url = std::env::var("SAM_GOV_BASE_URL")
            .unwrap_or_else(|_| "https://api.sam.gov/opportunities/v2".to_string());

        let feed_api_key = std::env::var("SAM_GOV_API_KEY").ok();

        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let cache_ttl_secs = std::env::var("CACHE_TTL_SECS")
            .unwrap_or_else(|_| "300".to_string())
            .parse()
            .unwrap_or(300);

        let rate_limit_per_minute = std::env::var("RATE_LIMIT_PER_MINUTE")
            .unwrap_or_else(|_| "100".to_string())
            .parse()
            .unwrap_or(100);

        let jwt_secret = std::env::var("JWT_SECRET")
            .unwrap_or_else(|_| "dev-secret-change-in-production".to_string());

        Ok(Self {
            database_path,
            port,
            feed_base_url,
            feed_api_key,
            cors_origins,
            cache_ttl_secs,
            rate_limit_per_minute,
            jwt_secret,
        })
    }
}
