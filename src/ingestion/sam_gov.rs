//! SAM.gov opportunities feed: fetcher + parser for the shape documented
//! at https://open.gsa.gov/api/sam-api/. Without an API key the fetcher
//! falls back to a small, stable sample list so offline tests and local
//! development never need live credentials.

use super::{parse_feed_date, FetchParams, IngestionFetcher, RawRecord};
use crate::error::AppError;
use crate::models::{Opportunity, OpportunityStatus};
use crate::rules::set_aside::SetAside;
use async_trait::async_trait;
use chrono::Utc;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

lazy_static! {
    static ref NOTICE_TYPES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("o", "Solicitation");
        m.insert("p", "Presolicitation");
        m.insert("k", "Combined Synopsis/Solicitation");
        m.insert("r", "Sources Sought");
        m.insert("g", "Sale of Surplus Property");
        m.insert("s", "Special Notice");
        m.insert("i", "Intent to Bundle Requirements");
        m.insert("a", "Award Notice");
        m.insert("u", "Justification and Approval");
        m
    };
}

pub struct SamGovFetcher {
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

impl SamGovFetcher {
    pub fn new(api_key: Option<String>, base_url: String, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        Self { api_key, base_url, client }
    }

    fn notice_type_label(code: &str) -> String {
        NOTICE_TYPES.get(code).map(|s| s.to_string()).unwrap_or_else(|| code.to_string())
    }

    fn sample_records() -> Vec<RawRecord> {
        let now = Utc::now();
        let posted = now.format("%Y-%m-%d").to_string();

        let samples = [
            (
                "SAMPLE-001",
                "Cloud Migration Services for Federal Agency",
                "Professional services for migrating legacy systems to cloud infrastructure. Includes assessment, planning, migration, and ongoing support.",
                "k",
                "SOL-2025-001",
                "541512",
                "Computer Systems Design Services",
                "Small Business Set-Aside",
                30,
                "Washington",
                "DC",
                "Department of Example",
                "Jane Smith",
                "jane.smith@example.gov",
                "202-555-0100",
            ),
            (
                "SAMPLE-002",
                "Cybersecurity Assessment and Monitoring",
                "Comprehensive cybersecurity services including vulnerability assessments, penetration testing, and continuous monitoring.",
                "o",
                "RFP-2025-002",
                "541519",
                "Other Computer Related Services",
                "8(a) Set-Aside",
                45,
                "Arlington",
                "VA",
                "Defense Information Systems Agency",
                "John Doe",
                "john.doe@example.gov",
                "703-555-0200",
            ),
            (
                "SAMPLE-003",
                "Environmental Remediation Services",
                "Environmental consulting and remediation services for contaminated site cleanup.",
                "p",
                "PRE-2025-003",
                "562910",
                "Remediation Services",
                "Women-Owned Small Business Set-Aside",
                60,
                "Denver",
                "CO",
                "Environmental Protection Agency",
                "Mary Johnson",
                "mary.johnson@example.gov",
                "303-555-0300",
            ),
        ];

        samples
            .into_iter()
            .map(|(notice_id, title, description, kind, sol_no, naics, naics_desc, set_aside, due_in_days, city, state, office, poc_name, poc_email, poc_phone)| {
                let deadline = (now + chrono::Duration::days(due_in_days)).format("%Y-%m-%d").to_string();
                RawRecord(serde_json::json!({
                    "noticeId": notice_id,
                    "title": title,
                    "description": description,
                    "type": kind,
                    "solicitationNumber": sol_no,
                    "naicsCode": naics,
                    "naicsDescription": naics_desc,
                    "typeOfSetAsideDescription": set_aside,
                    "postedDate": posted,
                    "responseDeadLine": deadline,
                    "placeOfPerformance": {
                        "city": { "name": city },
                        "state": { "code": state },
                    },
                    "office": { "name": office },
                    "pointOfContact": [
                        { "fullName": poc_name, "email": poc_email, "phone": poc_phone }
                    ],
                }))
            })
            .collect()
    }
}

#[async_trait]
impl IngestionFetcher for SamGovFetcher {
    fn source_system(&self) -> &'static str {
        "sam.gov"
    }

    async fn fetch(&self, params: &FetchParams) -> Result<Vec<RawRecord>, AppError> {
        let Some(api_key) = &self.api_key else {
            tracing::warn!("no SAM.gov API key configured, returning sample data");
            return Ok(Self::sample_records());
        };

        let now = Utc::now();
        let posted_from = params
            .posted_from
            .clone()
            .unwrap_or_else(|| (now - chrono::Duration::days(30)).format("%m/%d/%Y").to_string());
        let posted_to = params
            .posted_to
            .clone()
            .unwrap_or_else(|| now.format("%m/%d/%Y").to_string());

        let mut query: Vec<(&str, String)> = vec![
            ("api_key", api_key.clone()),
            ("postedFrom", posted_from),
            ("postedTo", posted_to),
            ("limit", params.limit.min(1000).max(1).to_string()),
            ("offset", "0".to_string()),
        ];
        if !params.naics_codes.is_empty() {
            query.push(("ncode", params.naics_codes.join(",")));
        }
        if !params.notice_types.is_empty() {
            query.push(("ptype", params.notice_types.join(",")));
        }
        if !params.set_aside_codes.is_empty() {
            query.push(("typeOfSetAside", params.set_aside_codes.join(",")));
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| AppError::FeedUnavailable(e.to_string()))?;

        let response = response
            .error_for_status()
            .map_err(|e| AppError::FeedUnavailable(e.to_string()))?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::FeedUnavailable(e.to_string()))?;

        let records = body
            .get("opportunitiesData")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();

        Ok(records.into_iter().map(RawRecord).collect())
    }

    fn parse(&self, raw: &RawRecord) -> Result<Opportunity, AppError> {
        let data = &raw.0;

        let notice_id = data
            .get("noticeId")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AppError::ParseError("missing noticeId".to_string()))?;

        let title = data.get("title").and_then(|v| v.as_str()).unwrap_or("").to_string();

        let notice_type_code = data.get("type").and_then(|v| v.as_str()).unwrap_or("");
        let notice_type = Self::notice_type_label(notice_type_code);

        let pop = data.get("placeOfPerformance").cloned().unwrap_or(serde_json::json!({}));
        let pop_city = pop
            .get("city")
            .and_then(|c| c.get("name"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());
        let pop_state = pop
            .get("state")
            .and_then(|c| c.get("code"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());
        let pop_country = pop
            .get("country")
            .and_then(|c| c.get("code"))
            .and_then(|v| v.as_str())
            .unwrap_or("USA")
            .to_string();

        let primary_poc = data
            .get("pointOfContact")
            .and_then(|v| v.as_array())
            .and_then(|arr| arr.first())
            .cloned()
            .unwrap_or(serde_json::json!({}));

        let office_name = data
            .get("office")
            .and_then(|o| o.get("name"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        let set_aside_type = data
            .get("typeOfSetAsideDescription")
            .and_then(|v| v.as_str())
            .and_then(sam_gov_set_aside_from_description);

        let now = Utc::now();

        Ok(Opportunity {
            id: Uuid::new_v4(),
            source_id: notice_id.to_string(),
            source_system: "sam.gov".to_string(),
            title,
            description: data.get("description").and_then(|v| v.as_str()).map(|s| s.to_string()),
            notice_type: Some(notice_type),
            solicitation_number: data
                .get("solicitationNumber")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            naics_code: data.get("naicsCode").and_then(|v| v.as_str()).map(|s| s.to_string()),
            naics_description: data
                .get("naicsDescription")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            psc_code: data
                .get("classificationCode")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            psc_description: None,
            set_aside_type,
            posted_date: data.get("postedDate").and_then(|v| v.as_str()).and_then(parse_feed_date),
            response_deadline: data
                .get("responseDeadLine")
                .and_then(|v| v.as_str())
                .and_then(parse_feed_date),
            archive_date: data.get("archiveDate").and_then(|v| v.as_str()).and_then(parse_feed_date),
            contract_type: data.get("contractType").and_then(|v| v.as_str()).map(|s| s.to_string()),
            estimated_value_min: None,
            estimated_value_max: None,
            place_of_performance_city: pop_city,
            place_of_performance_state: pop_state,
            place_of_performance_zip: pop.get("zip").and_then(|v| v.as_str()).map(|s| s.to_string()),
            place_of_performance_country: Some(pop_country),
            contracting_office_name: office_name,
            point_of_contact_name: primary_poc
                .get("fullName")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            point_of_contact_email: primary_poc
                .get("email")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            point_of_contact_phone: primary_poc
                .get("phone")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            status: OpportunityStatus::Active,
            security_clearance_required: None,
            raw_data: Some(data.clone()),
            created_at: now,
            updated_at: now,
            ingested_at: now,
        })
    }
}

/// SAM.gov's `typeOfSetAsideDescription` is free text; map the common
/// phrasings onto the canonical set-aside lattice and drop the rest
/// (an opportunity with no recognized set-aside text is open to all).
fn sam_gov_set_aside_from_description(description: &str) -> Option<SetAside> {
    let lower = description.to_lowercase();
    if lower.contains("8(a)") || lower.contains("8a") {
        Some(SetAside::EightA)
    } else if lower.contains("edwosb") || lower.contains("economically disadvantaged women") {
        Some(SetAside::Edwosb)
    } else if lower.contains("women-owned") || lower.contains("wosb") {
        Some(SetAside::Wosb)
    } else if lower.contains("service-disabled") || lower.contains("sdvosb") {
        Some(SetAside::Sdvosb)
    } else if lower.contains("veteran-owned") || lower.contains("vosb") {
        Some(SetAside::Vosb)
    } else if lower.contains("hubzone") {
        Some(SetAside::Hubzone)
    } else if lower.contains("small disadvantaged") || lower.contains("sdb") {
        Some(SetAside::Sdb)
    } else if lower.contains("small business") || lower.contains("total small business") {
        Some(SetAside::Sb)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> SamGovFetcher {
        SamGovFetcher::new(None, "https://api.sam.gov/opportunities/v2/search".to_string(), 30)
    }

    #[tokio::test]
    async fn missing_api_key_returns_three_stable_sample_records() {
        let records = fetcher().fetch(&FetchParams::default()).await.unwrap();
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn parses_sample_record_into_canonical_opportunity() {
        let records = SamGovFetcher::sample_records();
        let parsed = fetcher().parse(&records[0]).unwrap();
        assert_eq!(parsed.source_id, "SAMPLE-001");
        assert_eq!(parsed.source_system, "sam.gov");
        assert_eq!(parsed.naics_code.as_deref(), Some("541512"));
        assert_eq!(parsed.set_aside_type, Some(SetAside::Sb));
        assert_eq!(parsed.place_of_performance_state.as_deref(), Some("DC"));
        assert!(parsed.response_deadline.is_some());
        assert!(parsed.raw_data.is_some());
    }

    #[test]
    fn notice_type_code_expands_to_label() {
        let records = SamGovFetcher::sample_records();
        let parsed = fetcher().parse(&records[1]).unwrap();
        assert_eq!(parsed.notice_type.as_deref(), Some("Solicitation"));
    }

    #[test]
    fn record_missing_notice_id_fails_to_parse_without_aborting_caller() {
        let raw = RawRecord(serde_json::json!({ "title": "no id here" }));
        assert!(fetcher().parse(&raw).is_err());
    }

    #[test]
    fn eight_a_description_maps_to_eight_a_set_aside() {
        assert_eq!(sam_gov_set_aside_from_description("8(a) Set-Aside"), Some(SetAside::EightA));
    }

    #[test]
    fn unrecognized_set_aside_text_is_open_to_all() {
        assert_eq!(sam_gov_set_aside_from_description("Unrestricted"), None);
    }
}
