//! Relevance Scorer (C4): weighted composite of five sub-scores with a
//! generated explanation. Pure function over `(Organization, Opportunity,
//! RelevanceWeights)` — no I/O, no rule-table mutation.

use crate::models::{Organization, Opportunity, RelevanceScore, RelevanceWeights};
use crate::rules::{geography, naics, set_aside};
use crate::text::{jaccard, tokenize_relevance};
use chrono::Utc;
use uuid::Uuid;

pub fn score(
    organization: &Organization,
    opportunity: &Opportunity,
    weights: RelevanceWeights,
) -> RelevanceScore {
    let naics_score = naics_sub_score(organization, opportunity);
    let semantic_score = semantic_sub_score(organization, opportunity);
    let geographic_score = geographic_sub_score(organization, opportunity);
    let size_score = size_sub_score(organization, opportunity);
    let past_performance_score = past_performance_sub_score(organization, opportunity);

    let overall = naics_score * weights.naics
        + semantic_score * weights.semantic
        + geographic_score * weights.geographic
        + size_score * weights.size
        + past_performance_score * weights.past_performance;

    let explanation = generate_explanation(
        naics_score,
        semantic_score,
        geographic_score,
        size_score,
        overall,
    );

    RelevanceScore {
        id: Uuid::new_v4(),
        organization_id: organization.id,
        opportunity_id: opportunity.id,
        overall_score: round4(overall),
        naics_score: round4(naics_score),
        semantic_score: round4(semantic_score),
        geographic_score: round4(geographic_score),
        size_score: round4(size_score),
        past_performance_score: round4(past_performance_score),
        component_weights: weights,
        explanation,
        calculated_at: Utc::now(),
    }
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

fn naics_sub_score(organization: &Organization, opportunity: &Opportunity) -> f64 {
    match &opportunity.naics_code {
        Some(code) => naics::naics_match_score(&organization.naics_codes, code),
        None => 0.5,
    }
}

fn semantic_sub_score(organization: &Organization, opportunity: &Opportunity) -> f64 {
    let org_text = format!(
        "{} {}",
        organization.capabilities_narrative.as_deref().unwrap_or(""),
        organization.past_performance_summary.as_deref().unwrap_or(""),
    );
    let opp_text = format!(
        "{} {}",
        opportunity.title,
        opportunity.description.as_deref().unwrap_or(""),
    );

    if org_text.trim().is_empty() || opp_text.trim().is_empty() {
        return 0.5;
    }

    let org_keywords = tokenize_relevance(&org_text);
    let opp_keywords = tokenize_relevance(&opp_text);
    if org_keywords.is_empty() || opp_keywords.is_empty() {
        return 0.5;
    }

    (jaccard(&org_keywords, &opp_keywords) * 5.0).min(1.0)
}

fn geographic_sub_score(organization: &Organization, opportunity: &Opportunity) -> f64 {
    let (org_state, opp_state) = match (
        organization.state.as_deref(),
        opportunity.place_of_performance_state.as_deref(),
    ) {
        (Some(o), Some(p)) if !o.is_empty() && !p.is_empty() => (o, p),
        _ => return 0.6,
    };

    let org_state = org_state.to_uppercase();
    let opp_state = opp_state.to_uppercase();

    if org_state == opp_state {
        return 1.0;
    }
    if geography::is_adjacent(&org_state, &opp_state) {
        return 0.8;
    }
    if geography::is_dc_metro(&org_state) || geography::is_dc_metro(&opp_state) {
        return 0.7;
    }
    0.4
}

fn size_sub_score(organization: &Organization, opportunity: &Opportunity) -> f64 {
    let mut score = 1.0;

    // Clamps whenever a set-aside is required and the org's certifications don't
    // satisfy it, including an org with no certifications at all. Spec §4.4 reads
    // "not eligible -> clamp" unconditionally; see DESIGN.md Open Question 6 for
    // where this departs from the source it's grounded on.
    if let Some(required) = opportunity.set_aside_type {
        if !set_aside::is_eligible(Some(required), &organization.set_aside_types) {
            score = 0.2;
        }
    }

    if let (Some(value_max), Some(revenue)) =
        (opportunity.estimated_value_max, organization.annual_revenue)
    {
        if !revenue.is_zero() {
            let ratio = (value_max / revenue).to_string().parse::<f64>().unwrap_or(0.0);
            let cap = if ratio < 0.1 {
                0.95
            } else if ratio < 0.5 {
                1.0
            } else if ratio < 1.0 {
                0.8
            } else if ratio < 2.0 {
                0.5
            } else {
                0.2
            };
            score = score.min(cap);
        }
    }

    score
}

/// (label, keywords-to-find-in-narrative). The label is matched as a
/// substring check against the opportunity's own contract_type field,
/// mirroring the source's reversed-seeming but intentionally preserved
/// containment direction — see DESIGN.md Open Question 4.
const CONTRACT_TYPE_KEYWORDS: &[(&str, &[&str])] = &[
    ("firm-fixed", &["fixed", "ffp"]),
    ("time-and-materials", &["time", "materials", "t&m"]),
    ("cost-plus", &["cost", "plus", "cpff", "cpaf"]),
    ("idiq", &["idiq", "indefinite", "delivery"]),
];

fn past_performance_sub_score(organization: &Organization, opportunity: &Opportunity) -> f64 {
    let Some(summary) = organization.past_performance_summary.as_deref() else {
        return 0.5;
    };
    let summary = summary.to_lowercase();

    let mut total_checks = 0u32;
    let mut hits = 0u32;

    if opportunity.naics_code.is_some() {
        total_checks += 1;
        let naics_desc = opportunity.naics_description.as_deref().unwrap_or("").to_lowercase();
        if naics_desc.split_whitespace().take(3).any(|w| summary.contains(w)) {
            hits += 1;
        }
    }

    if let Some(office) = &opportunity.contracting_office_name {
        total_checks += 1;
        let office = office.to_lowercase();
        if office.split_whitespace().take(2).any(|w| summary.contains(w)) {
            hits += 1;
        }
    }

    if let Some(contract_type) = &opportunity.contract_type {
        total_checks += 1;
        let ct = contract_type.to_lowercase();
        for (label, keywords) in CONTRACT_TYPE_KEYWORDS {
            if label.contains(ct.as_str()) {
                if keywords.iter().any(|kw| summary.contains(kw)) {
                    hits += 1;
                }
                break;
            }
        }
    }

    if total_checks == 0 {
        return 0.6;
    }

    0.4 + 0.6 * (hits as f64 / total_checks as f64)
}

fn generate_explanation(
    naics_score: f64,
    semantic_score: f64,
    geographic_score: f64,
    size_score: f64,
    overall: f64,
) -> String {
    let mut parts = Vec::new();

    parts.push(
        if overall >= 0.8 {
            "Strong alignment detected."
        } else if overall >= 0.6 {
            "Moderate alignment with some gaps."
        } else if overall >= 0.4 {
            "Limited alignment - review carefully."
        } else {
            "Weak alignment - likely not a good fit."
        }
        .to_string(),
    );

    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();

    if naics_score >= 0.75 {
        strengths.push(format!("NAICS match ({:.0}%)", naics_score * 100.0));
    } else if naics_score < 0.5 {
        weaknesses.push(format!("NAICS mismatch ({:.0}%)", naics_score * 100.0));
    }

    if semantic_score >= 0.7 {
        strengths.push(format!("capabilities align well ({:.0}%)", semantic_score * 100.0));
    } else if semantic_score < 0.4 {
        weaknesses.push(format!("capabilities gap ({:.0}%)", semantic_score * 100.0));
    }

    if geographic_score >= 0.8 {
        strengths.push("good geographic fit".to_string());
    } else if geographic_score < 0.5 {
        weaknesses.push("geographic distance".to_string());
    }

    if size_score >= 0.9 {
        strengths.push("appropriate size/eligibility".to_string());
    } else if size_score < 0.5 {
        weaknesses.push("size/eligibility concerns".to_string());
    }

    if !strengths.is_empty() {
        parts.push(format!("Strengths: {}.", strengths.join(", ")));
    }
    if !weaknesses.is_empty() {
        parts.push(format!("Concerns: {}.", weaknesses.join(", ")));
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base_org() -> Organization {
        let mut org = Organization::new("Acme Federal Solutions".to_string());
        org.naics_codes = vec!["541512".to_string()];
        org.set_aside_types = vec![set_aside::SetAside::Sb];
        org.state = Some("VA".to_string());
        org.annual_revenue = Some(dec!(5000000));
        org.capabilities_narrative = Some("cloud migration services".to_string());
        org
    }

    fn base_opp() -> Opportunity {
        use crate::models::{OpportunityStatus};
        Opportunity {
            id: Uuid::new_v4(),
            source_id: "SAMPLE-001".to_string(),
            source_system: "sam.gov".to_string(),
            title: "cloud migration services for federal agency".to_string(),
            description: Some("cloud migration services for federal agency".to_string()),
            notice_type: None,
            solicitation_number: None,
            naics_code: Some("541512".to_string()),
            naics_description: None,
            psc_code: None,
            psc_description: None,
            set_aside_type: Some(set_aside::SetAside::Sb),
            posted_date: None,
            response_deadline: None,
            archive_date: None,
            contract_type: None,
            estimated_value_min: None,
            estimated_value_max: Some(dec!(1000000)),
            place_of_performance_city: None,
            place_of_performance_state: Some("VA".to_string()),
            place_of_performance_zip: None,
            place_of_performance_country: None,
            contracting_office_name: None,
            point_of_contact_name: None,
            point_of_contact_email: None,
            point_of_contact_phone: None,
            status: OpportunityStatus::Active,
            security_clearance_required: None,
            raw_data: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            ingested_at: Utc::now(),
        }
    }

    #[test]
    fn s1_exact_naics_eligible_set_aside_same_state() {
        let org = base_org();
        let opp = base_opp();
        let result = score(&org, &opp, RelevanceWeights::default());

        assert_eq!(result.naics_score, 1.0);
        assert_eq!(result.geographic_score, 1.0);
        assert_eq!(result.size_score, 1.0);
        assert!(result.semantic_score >= 0.5);
        assert!(result.overall_score >= 0.80, "overall was {}", result.overall_score);
    }

    #[test]
    fn s2_ineligible_set_aside_clamps_size_score() {
        let org = base_org();
        let mut opp = base_opp();
        opp.set_aside_type = Some(set_aside::SetAside::EightA);

        let result = score(&org, &opp, RelevanceWeights::default());
        assert_eq!(result.size_score, 0.2);
    }

    #[test]
    fn missing_naics_is_neutral() {
        let mut org = base_org();
        org.naics_codes.clear();
        let mut opp = base_opp();
        opp.naics_code = None;

        let result = score(&org, &opp, RelevanceWeights::default());
        assert_eq!(result.naics_score, 0.5);
    }

    #[test]
    fn weights_sum_to_one() {
        let w = RelevanceWeights::default();
        let total = w.naics + w.semantic + w.geographic + w.size + w.past_performance;
        assert!((total - 1.0).abs() < 1e-9);
    }
}
