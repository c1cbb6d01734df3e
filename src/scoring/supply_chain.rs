//! Supply Chain Compliance Service (C7): Section 889 prohibited-entity
//! screening, TAA country-of-origin verification, and a composite supplier
//! risk score with recommendations. Pure over the rule tables in
//! `crate::rules::{section_889, taa}` — no I/O, no SAM.gov exclusion-list
//! lookups (out of scope, see SPEC_FULL.md non-goals).

use crate::models::{ComplianceStatus, Section889Result, SupplierVerification, TaaResult};
use crate::rules::{section_889, taa};
use chrono::Utc;
use std::collections::HashMap;

/// A single component of a supplied product, as reported by the supplier.
#[derive(Debug, Clone, Default)]
pub struct Component {
    pub name: Option<String>,
    pub manufacturer: Option<String>,
}

pub fn check_section_889(supplier_name: &str, components: &[Component]) -> Section889Result {
    let supplier_lower = supplier_name.to_lowercase();
    let supplier_lower = supplier_lower.trim();
    let mut matched_entities = Vec::new();
    let mut risk_indicators = Vec::new();

    for (key, entity_name) in section_889::PROHIBITED_ENTITIES.iter() {
        if supplier_lower.contains(*key) || key.contains(supplier_lower) {
            matched_entities.push(entity_name.to_string());
        }
    }

    for (brand, maps_to) in section_889::PROHIBITED_BRANDS.iter() {
        if supplier_lower.contains(*brand) {
            if *maps_to == section_889::REQUIRES_REVIEW {
                risk_indicators.push(format!("Brand '{}' requires additional review", brand));
            } else {
                let entity = section_889::PROHIBITED_ENTITIES
                    .get(*maps_to)
                    .copied()
                    .unwrap_or(*maps_to);
                matched_entities.push(format!("{} (via brand: {})", entity, brand));
            }
        }
    }

    for component in components {
        let comp_name = component.name.as_deref().unwrap_or("").to_lowercase();
        let comp_manufacturer = component.manufacturer.as_deref().unwrap_or("").to_lowercase();
        for (key, entity_name) in section_889::PROHIBITED_ENTITIES.iter() {
            if comp_name.contains(*key) || comp_manufacturer.contains(*key) {
                matched_entities.push(format!(
                    "{} (component: {})",
                    entity_name,
                    component.name.as_deref().unwrap_or("Unknown")
                ));
            }
        }
    }

    if supplier_lower.contains("telecom") || supplier_lower.contains("network") {
        risk_indicators
            .push("Telecommunications/network equipment - verify Section 889 compliance".to_string());
    }
    if supplier_lower.contains("camera")
        || supplier_lower.contains("surveillance")
        || supplier_lower.contains("security")
    {
        risk_indicators.push(
            "Video surveillance equipment - verify against Hikvision/Dahua prohibitions"
                .to_string(),
        );
    }

    let (status, recommendation) = if !matched_entities.is_empty() {
        (
            ComplianceStatus::Prohibited,
            "DO NOT PROCEED - Supplier matches Section 889 prohibited entities".to_string(),
        )
    } else if !risk_indicators.is_empty() {
        (
            ComplianceStatus::RequiresReview,
            "Additional verification required before procurement".to_string(),
        )
    } else {
        (
            ComplianceStatus::Compliant,
            "No Section 889 prohibitions identified".to_string(),
        )
    };

    Section889Result {
        supplier_name: supplier_name.to_string(),
        status,
        prohibited_entities_matched: matched_entities,
        risk_indicators,
        recommendation,
        checked_at: Utc::now(),
    }
}

pub fn check_taa_compliance(country_code: &str) -> TaaResult {
    let country_code = country_code.to_uppercase();
    let country_code = country_code.trim();

    let Some((country_name, is_designated)) = taa::lookup(country_code) else {
        return TaaResult {
            country_code: country_code.to_string(),
            country_name: "Unknown".to_string(),
            status: ComplianceStatus::Unknown,
            is_designated_country: false,
            is_prohibited: false,
            notes: format!(
                "Country code '{}' not found in database. Manual verification required.",
                country_code
            ),
            checked_at: Utc::now(),
        };
    };

    let is_prohibited = taa::is_sanctioned(country_code);

    let (status, notes) = if is_prohibited {
        (
            ComplianceStatus::Prohibited,
            format!("{} is subject to US sanctions. Procurement prohibited.", country_name),
        )
    } else if is_designated {
        (
            ComplianceStatus::Compliant,
            format!("{} is a TAA designated country.", country_name),
        )
    } else {
        (
            ComplianceStatus::NonCompliant,
            format!(
                "{} is NOT a TAA designated country. Products may not be procured for federal \
                 contracts unless substantially transformed in a designated country.",
                country_name
            ),
        )
    };

    TaaResult {
        country_code: country_code.to_string(),
        country_name: country_name.to_string(),
        status,
        is_designated_country: is_designated,
        is_prohibited,
        notes,
        checked_at: Utc::now(),
    }
}

pub fn batch_check_countries(country_codes: &[String]) -> HashMap<String, TaaResult> {
    country_codes
        .iter()
        .map(|code| (code.clone(), check_taa_compliance(code)))
        .collect()
}

pub fn verify_supplier(
    supplier_name: &str,
    supplier_id: Option<String>,
    country_of_origin: Option<&str>,
    components: &[Component],
) -> SupplierVerification {
    let supplier_id = supplier_id.unwrap_or_else(|| synthetic_supplier_id(supplier_name));

    let section_889_result = check_section_889(supplier_name, components);
    let taa_result = country_of_origin.map(check_taa_compliance);

    let (risk_score, risk_level, risk_factors) = calculate_risk(&section_889_result, taa_result.as_ref());
    let recommendations = generate_recommendations(&section_889_result, taa_result.as_ref(), &risk_level);

    SupplierVerification {
        supplier_id,
        supplier_name: supplier_name.to_string(),
        verified: true,
        section_889_result,
        taa_result,
        overall_risk_score: risk_score,
        risk_level,
        risk_factors,
        recommendations,
        verified_at: Utc::now(),
    }
}

fn synthetic_supplier_id(supplier_name: &str) -> String {
    let mut hash: u32 = 0;
    for byte in supplier_name.bytes() {
        hash = hash.wrapping_mul(31).wrapping_add(byte as u32);
    }
    format!("SUP-{:05}", hash % 100_000)
}

fn calculate_risk(
    section_889: &Section889Result,
    taa_result: Option<&TaaResult>,
) -> (f64, String, Vec<String>) {
    let mut score = 0.0;
    let mut factors = Vec::new();

    match section_889.status {
        ComplianceStatus::Prohibited => {
            score = 1.0;
            factors.push("Section 889 PROHIBITED entity match".to_string());
        }
        ComplianceStatus::RequiresReview => {
            score += 0.4;
            factors.extend(section_889.risk_indicators.iter().cloned());
        }
        _ => {}
    }

    match taa_result {
        Some(taa) => match taa.status {
            ComplianceStatus::Prohibited => {
                score = score.max(1.0);
                factors.push(format!("Sanctioned country: {}", taa.country_name));
            }
            ComplianceStatus::NonCompliant => {
                score += 0.5;
                factors.push(format!("Non-TAA country: {}", taa.country_name));
            }
            ComplianceStatus::Unknown => {
                score += 0.3;
                factors.push("Country of origin verification required".to_string());
            }
            _ => {}
        },
        None => {
            score += 0.2;
            factors.push("Country of origin not provided".to_string());
        }
    }

    let score = score.min(1.0);
    let level = if score >= 0.8 {
        "critical"
    } else if score >= 0.5 {
        "high"
    } else if score >= 0.25 {
        "medium"
    } else {
        "low"
    };

    (round4(score), level.to_string(), factors)
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

fn generate_recommendations(
    section_889: &Section889Result,
    taa_result: Option<&TaaResult>,
    risk_level: &str,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    match section_889.status {
        ComplianceStatus::Prohibited => {
            recommendations.push("DO NOT PROCEED with this supplier - Section 889 violation".to_string());
            recommendations.push("Identify alternative suppliers from compliant sources".to_string());
        }
        ComplianceStatus::RequiresReview => {
            recommendations.push("Request supplier's Section 889 compliance certification".to_string());
            recommendations
                .push("Obtain detailed product/component listing with manufacturers".to_string());
        }
        _ => {}
    }

    match taa_result {
        Some(taa) => match taa.status {
            ComplianceStatus::Prohibited => {
                recommendations.push("DO NOT PROCEED - Sanctioned country of origin".to_string());
            }
            ComplianceStatus::NonCompliant => {
                recommendations.push("Request Certificate of Origin documentation".to_string());
                recommendations.push(
                    "Verify if product is substantially transformed in designated country".to_string(),
                );
                recommendations
                    .push("Consider alternative suppliers from TAA-compliant countries".to_string());
            }
            ComplianceStatus::Unknown => {
                recommendations.push("Verify country of origin with supplier".to_string());
            }
            _ => {}
        },
        None => {
            recommendations.push("Request country of origin information from supplier".to_string());
        }
    }

    if risk_level == "high" {
        recommendations.push("Consult with contracting officer before proceeding".to_string());
        recommendations.push("Document all compliance verification steps".to_string());
    }

    if recommendations.is_empty() {
        recommendations.push("Supplier passes initial compliance screening".to_string());
        recommendations.push("Maintain documentation for audit purposes".to_string());
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prohibited_entity_name_is_flagged() {
        let result = check_section_889("Hikvision USA Inc.", &[]);
        assert_eq!(result.status, ComplianceStatus::Prohibited);
        assert!(!result.prohibited_entities_matched.is_empty());
    }

    #[test]
    fn brand_requiring_review_is_flagged_without_being_prohibited() {
        let result = check_section_889("Uniview Technologies", &[]);
        assert_eq!(result.status, ComplianceStatus::RequiresReview);
    }

    #[test]
    fn clean_supplier_name_is_compliant() {
        let result = check_section_889("Acme Federal Solutions", &[]);
        assert_eq!(result.status, ComplianceStatus::Compliant);
    }

    #[test]
    fn component_manufacturer_match_is_flagged() {
        let components = vec![Component {
            name: Some("IP Camera Module".to_string()),
            manufacturer: Some("Dahua Technology".to_string()),
        }];
        let result = check_section_889("Generic Integrator LLC", &components);
        assert_eq!(result.status, ComplianceStatus::Prohibited);
    }

    #[test]
    fn designated_country_is_compliant() {
        let result = check_taa_compliance("de");
        assert_eq!(result.status, ComplianceStatus::Compliant);
        assert!(result.is_designated_country);
    }

    #[test]
    fn sanctioned_country_is_prohibited() {
        let result = check_taa_compliance("RU");
        assert_eq!(result.status, ComplianceStatus::Prohibited);
        assert!(result.is_prohibited);
    }

    #[test]
    fn non_designated_country_is_non_compliant() {
        let result = check_taa_compliance("CN");
        assert_eq!(result.status, ComplianceStatus::NonCompliant);
    }

    #[test]
    fn unknown_country_code_is_unknown() {
        let result = check_taa_compliance("ZZ");
        assert_eq!(result.status, ComplianceStatus::Unknown);
    }

    #[test]
    fn verify_supplier_composes_section_889_and_taa_risk() {
        let result = verify_supplier("Huawei Technologies", None, Some("CN"), &[]);
        assert_eq!(result.overall_risk_score, 1.0);
        assert_eq!(result.risk_level, "critical");
        assert!(result.recommendations.iter().any(|r| r.contains("DO NOT PROCEED")));
    }

    #[test]
    fn missing_country_of_origin_adds_baseline_risk() {
        let result = verify_supplier("Acme Federal Solutions", None, None, &[]);
        assert!(result.overall_risk_score > 0.0);
        assert!(result
            .risk_factors
            .iter()
            .any(|f| f.contains("Country of origin not provided")));
    }

    #[test]
    fn batch_check_covers_every_requested_code() {
        let codes = vec!["DE".to_string(), "CN".to_string(), "RU".to_string()];
        let results = batch_check_countries(&codes);
        assert_eq!(results.len(), 3);
    }
}
