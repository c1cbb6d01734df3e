//! Win Probability Model (C6): seven weighted factors rolled into a win
//! probability, plus a pursuit recommendation and a confidence estimate
//! driven by input completeness. Pure function over `(Organization,
//! Opportunity)` — no I/O, no model training.

use crate::models::{Organization, Opportunity, WinProbability};
use crate::rules::{naics, set_aside};
use crate::text::extract_capability_keywords;
use chrono::Utc;
use std::collections::HashMap;
use uuid::Uuid;

const WEIGHT_CAPABILITY: f64 = 0.20;
const WEIGHT_SETASIDE: f64 = 0.20;
const WEIGHT_PAST_PERFORMANCE: f64 = 0.20;
const WEIGHT_AGENCY: f64 = 0.15;
const WEIGHT_GEOGRAPHIC: f64 = 0.10;
const WEIGHT_COMPETITION: f64 = 0.10;
const WEIGHT_PRICING: f64 = 0.05;

pub fn calculate(organization: &Organization, opportunity: &Opportunity) -> WinProbability {
    let (capability_match, capability_analysis) = score_capability_match(organization, opportunity);
    let (setaside_eligibility, setaside_analysis) = score_setaside_eligibility(organization, opportunity);
    let (past_performance, past_performance_analysis) = score_past_performance(organization, opportunity);
    let (agency_relationship, agency_analysis) = score_agency_relationship(organization, opportunity);
    let (geographic_fit, geographic_analysis) = score_geographic_fit(organization, opportunity);
    let (competition_level, competition_analysis) = score_competition_level(opportunity);
    let (pricing_position, pricing_analysis) = score_pricing_position(organization, opportunity);

    let mut factors = HashMap::new();
    factors.insert("capability_match".to_string(), capability_match);
    factors.insert("setaside_eligibility".to_string(), setaside_eligibility);
    factors.insert("past_performance".to_string(), past_performance);
    factors.insert("agency_relationship".to_string(), agency_relationship);
    factors.insert("geographic_fit".to_string(), geographic_fit);
    factors.insert("competition_level".to_string(), competition_level);
    factors.insert("pricing_position".to_string(), pricing_position);

    let win_probability = capability_match * WEIGHT_CAPABILITY
        + setaside_eligibility * WEIGHT_SETASIDE
        + past_performance * WEIGHT_PAST_PERFORMANCE
        + agency_relationship * WEIGHT_AGENCY
        + geographic_fit * WEIGHT_GEOGRAPHIC
        + competition_level * WEIGHT_COMPETITION
        + pricing_position * WEIGHT_PRICING;

    let match_score = (capability_match + setaside_eligibility) / 2.0;

    let mut analysis = HashMap::new();
    analysis.insert("capability_match".to_string(), capability_analysis);
    analysis.insert("setaside_eligibility".to_string(), setaside_analysis);
    analysis.insert("past_performance".to_string(), past_performance_analysis);
    analysis.insert("agency_relationship".to_string(), agency_analysis);
    analysis.insert("geographic_fit".to_string(), geographic_analysis);
    analysis.insert("competition_level".to_string(), competition_analysis);
    analysis.insert("pricing_position".to_string(), pricing_analysis);

    let recommendation = generate_recommendation(win_probability);
    let confidence = calculate_confidence(organization, opportunity, &factors);

    WinProbability {
        id: Uuid::new_v4(),
        organization_id: organization.id,
        opportunity_id: opportunity.id,
        win_probability: round4(win_probability),
        match_score: round4(match_score),
        factors,
        analysis,
        recommendation,
        confidence: round4(confidence),
        calculated_at: Utc::now(),
    }
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

fn score_capability_match(organization: &Organization, opportunity: &Opportunity) -> (f64, String) {
    let mut score = 0.0f64;
    let mut reasons = Vec::new();

    if let Some(opp_naics) = &opportunity.naics_code {
        if !organization.naics_codes.is_empty() {
            let naics_score = naics::naics_match_score(&organization.naics_codes, opp_naics);
            if naics_score >= 1.0 {
                score = score.max(1.0);
                reasons.push(format!("Exact NAICS {} match", opp_naics));
            } else if naics_score >= 0.9 {
                score = score.max(0.9);
                reasons.push("Strong NAICS match (5-digit)".to_string());
            } else if naics_score >= 0.75 {
                score = score.max(0.75);
                reasons.push("Good NAICS match (4-digit)".to_string());
            } else if naics_score >= 0.5 {
                score = score.max(0.5);
                reasons.push("Partial NAICS match (3-digit)".to_string());
            } else if naics_score >= 0.25 {
                score = score.max(0.25);
                reasons.push("Related industry sector".to_string());
            }
        }
    }

    if let Some(opp_psc) = &opportunity.psc_code {
        if organization.psc_codes.iter().any(|p| p == opp_psc) {
            score = (score + 0.15).min(1.0);
            reasons.push(format!("PSC {} match", opp_psc));
        }
    }

    if let (Some(narrative), Some(description)) =
        (&organization.capabilities_narrative, &opportunity.description)
    {
        let keywords = extract_capability_keywords(narrative);
        let desc_lower = description.to_lowercase();
        let matches = keywords.iter().filter(|kw| desc_lower.contains(kw.as_str())).count();
        if matches > 3 {
            score = (score + 0.1).min(1.0);
            reasons.push(format!("Strong keyword alignment ({} matches)", matches));
        }
    }

    let analysis = if reasons.is_empty() {
        "Limited capability data for analysis".to_string()
    } else {
        reasons.join("; ")
    };
    (round4(score), analysis)
}

fn setaside_label_skews_small(required: set_aside::SetAside) -> bool {
    use set_aside::SetAside::*;
    matches!(required, Sb | Wosb | Edwosb | Vosb | Sdvosb)
}

fn score_setaside_eligibility(organization: &Organization, opportunity: &Opportunity) -> (f64, String) {
    let Some(required) = opportunity.set_aside_type else {
        return (0.6, "Full and open competition - no set-aside restrictions".to_string());
    };

    if organization.set_aside_types.is_empty() {
        if setaside_label_skews_small(required) {
            return (
                0.3,
                format!("Set-aside type '{}' - eligibility unknown", required.as_str()),
            );
        }
        return (0.5, "No set-aside certifications on file".to_string());
    }

    if set_aside::is_eligible(Some(required), &organization.set_aside_types) {
        (1.0, format!("Eligible for {} set-aside", required.as_str()))
    } else {
        (0.1, format!("Not eligible for {} set-aside", required.as_str()))
    }
}

const CONTRACT_TYPE_EXPERIENCE_KEYWORDS: &[(&str, &[&str])] = &[
    ("ffp", &["fixed", "firm"]),
    ("t&m", &["time", "materials"]),
    ("cpff", &["cost", "plus"]),
    ("idiq", &["idiq", "task order"]),
];

fn score_past_performance(organization: &Organization, opportunity: &Opportunity) -> (f64, String) {
    let Some(summary) = organization.past_performance_summary.as_deref() else {
        return (0.4, "No past performance summary on file".to_string());
    };
    let pp_summary = summary.to_lowercase();
    let mut score = 0.4;
    let mut reasons = Vec::new();

    if opportunity.naics_code.is_some() {
        let naics_desc = opportunity.naics_description.as_deref().unwrap_or("").to_lowercase();
        if naics_desc
            .split_whitespace()
            .take(3)
            .filter(|w| w.len() > 3)
            .any(|w| pp_summary.contains(w))
        {
            score += 0.2;
            reasons.push("Relevant industry experience".to_string());
        }
    }

    if let Some(office) = &opportunity.contracting_office_name {
        let office_lower = office.to_lowercase();
        if office_lower
            .split_whitespace()
            .take(2)
            .filter(|w| w.len() > 3)
            .any(|w| pp_summary.contains(w))
        {
            score += 0.2;
            reasons.push("Agency experience".to_string());
        }
    }

    if let Some(contract_type) = &opportunity.contract_type {
        let ct = contract_type.to_lowercase();
        for (ct_type, keywords) in CONTRACT_TYPE_EXPERIENCE_KEYWORDS {
            if ct.contains(ct_type) && keywords.iter().any(|kw| pp_summary.contains(kw)) {
                score += 0.15;
                reasons.push(format!("{} contract experience", ct_type.to_uppercase()));
                break;
            }
        }
    }

    let analysis = if reasons.is_empty() {
        "General past performance on file".to_string()
    } else {
        reasons.join("; ")
    };
    (round4(score.min(1.0)), analysis)
}

const AGENCY_KEYWORDS: &[(&str, &[&str])] = &[
    ("dod", &["defense", "army", "navy", "air force", "marine", "pentagon"]),
    ("va", &["veterans", "va ", "vha", "vba"]),
    ("dhs", &["homeland", "fema", "tsa", "ice", "cbp"]),
    ("hhs", &["health", "human services", "cdc", "fda", "nih"]),
    ("gsa", &["gsa", "federal acquisition", "public building"]),
    ("doj", &["justice", "fbi", "dea", "atf", "marshal"]),
    ("treasury", &["treasury", "irs", "mint"]),
];

fn score_agency_relationship(organization: &Organization, opportunity: &Opportunity) -> (f64, String) {
    let Some(office) = &opportunity.contracting_office_name else {
        return (0.5, "Contracting office not specified".to_string());
    };
    let Some(pp) = organization.past_performance_summary.as_deref() else {
        return (0.3, "No agency relationship history available".to_string());
    };

    let office_lower = office.to_lowercase();
    let pp_lower = pp.to_lowercase();

    let mut score = 0.3;
    let mut reasons = Vec::new();

    for (agency, keywords) in AGENCY_KEYWORDS {
        if keywords.iter().any(|kw| office_lower.contains(kw)) {
            if keywords.iter().any(|kw| pp_lower.contains(kw)) {
                score = 0.8;
                reasons.push(format!("Prior {} experience", agency.to_uppercase()));
                break;
            }
        }
    }

    if reasons.is_empty() && pp_lower.len() > 100 {
        score = 0.5;
        reasons.push("General federal contracting experience".to_string());
    }

    let analysis = if reasons.is_empty() {
        "No direct agency relationship identified".to_string()
    } else {
        reasons.join("; ")
    };
    (round4(score), analysis)
}

const WIN_PROB_ADJACENT_STATES: &[(&str, &[&str])] = &[
    ("VA", &["DC", "MD", "WV", "NC", "TN", "KY"]),
    ("MD", &["DC", "VA", "WV", "PA", "DE"]),
    ("DC", &["VA", "MD"]),
    ("CA", &["OR", "NV", "AZ"]),
    ("TX", &["NM", "OK", "AR", "LA"]),
    ("FL", &["GA", "AL"]),
    ("NY", &["NJ", "CT", "PA", "VT", "MA"]),
    ("IL", &["WI", "IN", "MO", "IA", "KY"]),
];

fn score_geographic_fit(organization: &Organization, opportunity: &Opportunity) -> (f64, String) {
    let org_state = organization.state.as_deref().unwrap_or("").to_uppercase();
    let opp_state = opportunity
        .place_of_performance_state
        .as_deref()
        .unwrap_or("")
        .to_uppercase();

    if org_state.is_empty() || opp_state.is_empty() {
        return (0.6, "Geographic location not specified".to_string());
    }

    if org_state == opp_state {
        return (1.0, format!("Located in {}", opp_state));
    }

    const DC_METRO: [&str; 3] = ["DC", "VA", "MD"];
    if DC_METRO.contains(&org_state.as_str()) && DC_METRO.contains(&opp_state.as_str()) {
        return (0.9, "DC metro area presence".to_string());
    }

    if let Some((_, neighbors)) = WIN_PROB_ADJACENT_STATES.iter().find(|(s, _)| *s == org_state) {
        if neighbors.contains(&opp_state.as_str()) {
            return (0.75, format!("Adjacent to {}", opp_state));
        }
    }

    if let Some(description) = &opportunity.description {
        let desc_lower = description.to_lowercase();
        if desc_lower.contains("remote") || desc_lower.contains("telework") {
            return (0.8, "Remote/telework eligible".to_string());
        }
    }

    (0.4, format!("Located in {}, opportunity in {}", org_state, opp_state))
}

fn score_competition_level(opportunity: &Opportunity) -> (f64, String) {
    let Some(notice_type) = &opportunity.notice_type else {
        return (0.5, "Competition level unknown".to_string());
    };
    let notice = notice_type.to_lowercase();

    if notice.contains("sole source") || notice.contains("j&a") {
        return (0.2, "Sole source - pre-selected vendor likely".to_string());
    }
    if notice.contains("sources sought") || notice.contains("rfi") {
        return (0.7, "Market research phase - early opportunity".to_string());
    }
    if notice.contains("presolicitation") {
        return (0.6, "Presolicitation - good time for positioning".to_string());
    }
    if notice.contains("combined") || notice.contains("solicitation") {
        return (0.5, "Active solicitation - competitive".to_string());
    }
    if notice.contains("award") {
        return (0.1, "Award notice - opportunity closed".to_string());
    }

    (0.5, "Standard competition expected".to_string())
}

fn score_pricing_position(organization: &Organization, opportunity: &Opportunity) -> (f64, String) {
    let (Some(value_max), Some(revenue)) = (opportunity.estimated_value_max, organization.annual_revenue)
    else {
        return (0.6, "Contract value or revenue data unavailable".to_string());
    };
    if revenue.is_zero() {
        return (0.6, "Contract value or revenue data unavailable".to_string());
    }

    let ratio = (value_max / revenue).to_string().parse::<f64>().unwrap_or(0.0);

    if ratio < 0.1 {
        (0.9, format!("Contract size ({:.1}% of revenue) - very manageable", ratio * 100.0))
    } else if ratio < 0.3 {
        (1.0, format!("Ideal contract size ({:.1}% of revenue)", ratio * 100.0))
    } else if ratio < 0.5 {
        (0.85, format!("Good fit ({:.1}% of revenue)", ratio * 100.0))
    } else if ratio < 1.0 {
        (0.6, format!("Stretch opportunity ({:.1}% of revenue)", ratio * 100.0))
    } else if ratio < 2.0 {
        (0.4, format!("Significant commitment ({:.1}% of revenue)", ratio * 100.0))
    } else {
        (0.2, format!("Contract may exceed capacity ({:.1}% of revenue)", ratio * 100.0))
    }
}

fn generate_recommendation(win_prob: f64) -> String {
    if win_prob >= 0.70 {
        "STRONG PURSUE - High probability opportunity aligned with capabilities".to_string()
    } else if win_prob >= 0.55 {
        "PURSUE - Good fit, develop strong differentiators".to_string()
    } else if win_prob >= 0.40 {
        "EVALUATE - Consider teaming or targeted pursuit".to_string()
    } else if win_prob >= 0.25 {
        "SELECTIVE - Only pursue if strategically important".to_string()
    } else {
        "MONITOR ONLY - Low probability, preserve bid resources".to_string()
    }
}

fn calculate_confidence(
    organization: &Organization,
    opportunity: &Opportunity,
    factors: &HashMap<String, f64>,
) -> f64 {
    let mut confidence = 0.5;

    if !organization.naics_codes.is_empty() {
        confidence += 0.1;
    }
    if organization.past_performance_summary.is_some() {
        confidence += 0.1;
    }
    if !organization.set_aside_types.is_empty() {
        confidence += 0.05;
    }
    if organization.annual_revenue.is_some() {
        confidence += 0.05;
    }

    if opportunity.naics_code.is_some() {
        confidence += 0.05;
    }
    if opportunity.description.as_deref().map(|d| d.len() > 100).unwrap_or(false) {
        confidence += 0.05;
    }
    if opportunity.estimated_value_max.is_some() {
        confidence += 0.05;
    }

    let extreme_factors = factors.values().filter(|&&v| v > 0.8 || v < 0.2).count();
    confidence += extreme_factors as f64 * 0.02;

    confidence.min(0.95)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OpportunityStatus;
    use rust_decimal_macros::dec;

    fn base_org() -> Organization {
        let mut org = Organization::new("Acme Federal Solutions".to_string());
        org.naics_codes = vec!["541512".to_string()];
        org.set_aside_types = vec![set_aside::SetAside::Sb];
        org.state = Some("VA".to_string());
        org.annual_revenue = Some(dec!(5000000));
        org.past_performance_summary = Some(
            "Delivered cloud migration and custom software development for Department of the Navy over five years.".to_string(),
        );
        org
    }

    fn base_opp() -> Opportunity {
        Opportunity {
            id: Uuid::new_v4(),
            source_id: "SAMPLE-001".to_string(),
            source_system: "sam.gov".to_string(),
            title: "cloud migration services".to_string(),
            description: Some("cloud migration services for federal agency".to_string()),
            notice_type: Some("Solicitation".to_string()),
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
            contracting_office_name: Some("Department of the Navy".to_string()),
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
    fn strong_alignment_yields_high_win_probability() {
        let result = calculate(&base_org(), &base_opp());
        assert!(result.win_probability >= 0.55, "was {}", result.win_probability);
        assert_eq!(*result.factors.get("capability_match").unwrap(), 1.0);
        assert_eq!(*result.factors.get("setaside_eligibility").unwrap(), 1.0);
    }

    #[test]
    fn ineligible_setaside_tanks_that_factor() {
        let org = base_org();
        let mut opp = base_opp();
        opp.set_aside_type = Some(set_aside::SetAside::EightA);
        let result = calculate(&org, &opp);
        assert_eq!(*result.factors.get("setaside_eligibility").unwrap(), 0.1);
    }

    #[test]
    fn no_setaside_restriction_gives_neutral_factor() {
        let org = base_org();
        let mut opp = base_opp();
        opp.set_aside_type = None;
        let result = calculate(&org, &opp);
        assert_eq!(*result.factors.get("setaside_eligibility").unwrap(), 0.6);
    }

    #[test]
    fn sole_source_notice_lowers_competition_factor() {
        let org = base_org();
        let mut opp = base_opp();
        opp.notice_type = Some("Sole Source Justification".to_string());
        let result = calculate(&org, &opp);
        assert_eq!(*result.factors.get("competition_level").unwrap(), 0.2);
    }

    #[test]
    fn confidence_is_capped_at_95_percent() {
        let result = calculate(&base_org(), &base_opp());
        assert!(result.confidence <= 0.95);
    }

    #[test]
    fn recommendation_matches_strong_pursue_band() {
        let result = calculate(&base_org(), &base_opp());
        if result.win_probability >= 0.70 {
            assert!(result.recommendation.starts_with("STRONG PURSUE"));
        }
    }
}
