//! Risk Assessor (C5): six independently-scored risk categories rolled up
//! into a weighted composite, plus a deduplicated mitigation list. Pure
//! function over `(Organization, Opportunity)` — no I/O.

use crate::models::{Organization, Opportunity, RiskAssessment, RiskCategory, RiskLevel};
use crate::rules::set_aside;
use chrono::Utc;
use uuid::Uuid;

const WEIGHT_ELIGIBILITY: f64 = 0.25;
const WEIGHT_TECHNICAL: f64 = 0.20;
const WEIGHT_PRICING: f64 = 0.15;
const WEIGHT_RESOURCE: f64 = 0.15;
const WEIGHT_COMPLIANCE: f64 = 0.15;
const WEIGHT_TIMELINE: f64 = 0.10;

pub fn assess(organization: &Organization, opportunity: &Opportunity) -> RiskAssessment {
    let eligibility_risk = assess_eligibility(organization, opportunity);
    let technical_risk = assess_technical(organization, opportunity);
    let pricing_risk = assess_pricing(organization, opportunity);
    let resource_risk = assess_resource(organization, opportunity);
    let compliance_risk = assess_compliance(organization, opportunity);
    let timeline_risk = assess_timeline(opportunity);

    let overall_score = eligibility_risk.score * WEIGHT_ELIGIBILITY
        + technical_risk.score * WEIGHT_TECHNICAL
        + pricing_risk.score * WEIGHT_PRICING
        + resource_risk.score * WEIGHT_RESOURCE
        + compliance_risk.score * WEIGHT_COMPLIANCE
        + timeline_risk.score * WEIGHT_TIMELINE;

    let mut risk_factors = Vec::new();
    for cat in [
        &eligibility_risk,
        &technical_risk,
        &pricing_risk,
        &resource_risk,
        &compliance_risk,
        &timeline_risk,
    ] {
        risk_factors.extend(cat.factors.iter().cloned());
    }

    let mitigation_suggestions = generate_mitigations(
        &eligibility_risk,
        &technical_risk,
        &pricing_risk,
        &resource_risk,
        &compliance_risk,
        &timeline_risk,
    );

    RiskAssessment {
        id: Uuid::new_v4(),
        organization_id: organization.id,
        opportunity_id: opportunity.id,
        overall_risk_score: round4(overall_score),
        overall_risk_level: RiskLevel::from_score(overall_score),
        eligibility_risk,
        technical_risk,
        pricing_risk,
        resource_risk,
        compliance_risk,
        timeline_risk,
        risk_factors,
        mitigation_suggestions,
        assessed_at: Utc::now(),
    }
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

fn category(score: f64, factors: Vec<String>) -> RiskCategory {
    let score = score.min(1.0);
    RiskCategory {
        score,
        level: RiskLevel::from_score(score),
        factors,
    }
}

fn assess_eligibility(organization: &Organization, opportunity: &Opportunity) -> RiskCategory {
    let mut factors = Vec::new();
    let mut score = 0.0;

    if let Some(required) = opportunity.set_aside_type {
        if !set_aside::is_eligible(Some(required), &organization.set_aside_types) {
            factors.push(format!("Not eligible for {} set-aside", required.as_str()));
            score += 0.8;
        }
    }

    if let Some(clearance) = &opportunity.security_clearance_required {
        let lower = clearance.to_lowercase();
        if lower.contains("secret") || lower.contains("top secret") || lower.contains("ts/sci") {
            factors.push(format!("Requires {} clearance", clearance));
            score += 0.4;
        }
    }

    if organization.uei.is_none() {
        factors.push("No UEI on file - SAM.gov registration may be needed".to_string());
        score += 0.3;
    }

    category(score, factors)
}

fn assess_technical(organization: &Organization, opportunity: &Opportunity) -> RiskCategory {
    let mut factors = Vec::new();
    let mut score = 0.0;

    if let Some(opp_naics) = &opportunity.naics_code {
        if !organization.naics_codes.is_empty() {
            let four = prefix(opp_naics, 4);
            let two = prefix(opp_naics, 2);
            let matching_two = organization.naics_codes.iter().any(|n| n.starts_with(&two));
            if !matching_two {
                factors.push(format!("NAICS {} outside core competencies", opp_naics));
                score += 0.5;
            } else if !organization.naics_codes.iter().any(|n| n.starts_with(&four)) {
                factors.push(format!("NAICS {} is adjacent to core codes", opp_naics));
                score += 0.2;
            }
        }
    }

    if let Some(opp_psc) = &opportunity.psc_code {
        if !organization.psc_codes.is_empty() {
            let two = prefix(opp_psc, 2);
            let matching_psc = organization.psc_codes.iter().any(|p| p.starts_with(&two));
            if !matching_psc {
                factors.push(format!("PSC {} may require new capabilities", opp_psc));
                score += 0.3;
            }
        }
    }

    if organization
        .capabilities_narrative
        .as_deref()
        .unwrap_or("")
        .trim()
        .is_empty()
    {
        factors.push("No capabilities narrative on file for evaluation".to_string());
        score += 0.2;
    }

    category(score, factors)
}

fn assess_pricing(organization: &Organization, opportunity: &Opportunity) -> RiskCategory {
    let mut factors = Vec::new();
    let mut score = 0.0;

    if let (Some(value_max), Some(revenue)) =
        (opportunity.estimated_value_max, organization.annual_revenue)
    {
        if !revenue.is_zero() {
            let ratio = (value_max / revenue).to_string().parse::<f64>().unwrap_or(0.0);
            if ratio > 2.0 {
                factors.push(format!(
                    "Contract value ({:.1}x revenue) may exceed capacity",
                    ratio
                ));
                score += 0.6;
            } else if ratio > 1.0 {
                factors.push(format!(
                    "Contract value is {:.1}x annual revenue - significant commitment",
                    ratio
                ));
                score += 0.3;
            }
        }
    }

    if let Some(contract_type) = &opportunity.contract_type {
        let ct = contract_type.to_lowercase();
        if ct.contains("cost") || ct.contains("cpff") || ct.contains("cpaf") {
            factors.push("Cost-reimbursement contract requires robust accounting systems".to_string());
            score += 0.2;
        }
    }

    if let Some(notice_type) = &opportunity.notice_type {
        let nt = notice_type.to_lowercase();
        if nt.contains("sole source") || nt.contains("j&a") {
            // Lower competition risk but limited opportunity.
        } else if nt.contains("sources sought") {
            factors.push("Early stage - competition level unknown".to_string());
            score += 0.1;
        }
    }

    category(score, factors)
}

fn assess_resource(organization: &Organization, opportunity: &Opportunity) -> RiskCategory {
    let mut factors = Vec::new();
    let mut score = 0.0;

    if let Some(emp_count) = organization.employee_count {
        if let Some(value_max) = opportunity.estimated_value_max {
            let implied_staff = value_max.to_string().parse::<f64>().unwrap_or(0.0) / 150_000.0;
            let emp_count = emp_count as f64;
            if implied_staff > emp_count * 0.5 {
                factors.push(format!(
                    "May require ~{:.0} staff ({} current employees)",
                    implied_staff, emp_count as i64
                ));
                score += 0.4;
            } else if implied_staff > emp_count * 0.3 {
                factors.push("Significant staffing effort required".to_string());
                score += 0.2;
            }
        }
    }

    if let Some(opp_state) = &opportunity.place_of_performance_state {
        let opp_state = opp_state.to_uppercase();
        let org_state = organization.state.as_deref().unwrap_or("").to_uppercase();
        if !opp_state.is_empty() && !org_state.is_empty() && opp_state != org_state {
            factors.push(format!("Performance in {} (org based in {})", opp_state, org_state));
            score += 0.2;
        }
    }

    category(score, factors)
}

const REGULATED_SECTORS: &[(&str, &str)] = &[
    ("541", "Professional services - may require specific certifications"),
    ("336", "Defense manufacturing - ITAR/EAR may apply"),
    ("562", "Environmental - EPA compliance required"),
    ("622", "Healthcare - HIPAA compliance required"),
];

fn assess_compliance(_organization: &Organization, opportunity: &Opportunity) -> RiskCategory {
    let mut factors = Vec::new();
    let mut score = 0.0;

    if let Some(office) = &opportunity.contracting_office_name {
        let office = office.to_lowercase();
        if ["defense", "army", "navy", "air force", "dod"]
            .iter()
            .any(|term| office.contains(term))
        {
            factors.push("DoD contract - DFARS compliance required".to_string());
            score += 0.2;
        }
    }

    if let Some(naics) = &opportunity.naics_code {
        let naics3 = prefix(naics, 3);
        for (sector, note) in REGULATED_SECTORS {
            if naics3.starts_with(sector) {
                factors.push(note.to_string());
                score += 0.15;
                break;
            }
        }
    }

    if opportunity.security_clearance_required.is_some() {
        factors.push("Facility clearance and security protocols required".to_string());
        score += 0.2;
    }

    category(score, factors)
}

fn assess_timeline(opportunity: &Opportunity) -> RiskCategory {
    let mut factors = Vec::new();
    let mut score = 0.0;

    match opportunity.response_deadline {
        Some(deadline) => {
            let days_remaining = (deadline - Utc::now()).num_days();
            if days_remaining < 0 {
                factors.push("Response deadline has passed".to_string());
                score = 1.0;
            } else if days_remaining < 7 {
                factors.push(format!("Only {} days until deadline - urgent", days_remaining));
                score += 0.7;
            } else if days_remaining < 14 {
                factors.push(format!("{} days until deadline - tight timeline", days_remaining));
                score += 0.4;
            } else if days_remaining < 30 {
                factors.push(format!("{} days until deadline - manageable", days_remaining));
                score += 0.2;
            }
        }
        None => {
            factors.push("No response deadline specified".to_string());
            score += 0.1;
        }
    }

    category(score, factors)
}

fn prefix(code: &str, len: usize) -> String {
    code.chars().take(len).collect()
}

fn generate_mitigations(
    eligibility: &RiskCategory,
    technical: &RiskCategory,
    pricing: &RiskCategory,
    resource: &RiskCategory,
    compliance: &RiskCategory,
    timeline: &RiskCategory,
) -> Vec<String> {
    let mut mitigations = Vec::new();

    if eligibility.score >= 0.5 {
        for factor in &eligibility.factors {
            let f = factor.to_lowercase();
            if f.contains("set-aside") {
                mitigations.push("Consider teaming with an eligible prime contractor".to_string());
            }
            if f.contains("clearance") {
                mitigations
                    .push("Initiate facility clearance process if not already in progress".to_string());
            }
            if f.contains("uei") {
                mitigations.push("Complete SAM.gov registration immediately".to_string());
            }
        }
    }

    if technical.score >= 0.4 {
        for factor in &technical.factors {
            let f = factor.to_lowercase();
            if f.contains("naics") {
                mitigations
                    .push("Document relevant past performance in adjacent NAICS codes".to_string());
            }
            if f.contains("capabilities") {
                mitigations.push("Update capability statement before submission".to_string());
            }
        }
    }

    if pricing.score >= 0.4 {
        for factor in &pricing.factors {
            let f = factor.to_lowercase();
            if f.contains("capacity") || f.contains("revenue") {
                mitigations.push("Consider teaming or subcontracting to share risk".to_string());
            }
            if f.contains("accounting") {
                mitigations.push("Verify DCAA-compliant accounting system is in place".to_string());
            }
        }
    }

    if resource.score >= 0.4 {
        for factor in &resource.factors {
            let f = factor.to_lowercase();
            if f.contains("staff") {
                mitigations.push("Identify key personnel and confirm availability".to_string());
                mitigations.push("Develop recruitment pipeline for required positions".to_string());
            }
            if f.contains("performance in") {
                mitigations.push("Consider local subcontractor or satellite office".to_string());
            }
        }
    }

    if compliance.score >= 0.3 {
        for factor in &compliance.factors {
            let f = factor.to_lowercase();
            if f.contains("dfars") {
                mitigations.push("Review DFARS flowdown requirements with contracts team".to_string());
            }
            if f.contains("hipaa") || f.contains("itar") {
                mitigations.push("Engage compliance officer for regulatory review".to_string());
            }
        }
    }

    if timeline.score >= 0.5 {
        for factor in &timeline.factors {
            let f = factor.to_lowercase();
            if f.contains("urgent") || f.contains("tight") {
                mitigations.push("Assign dedicated proposal team immediately".to_string());
                mitigations.push("Request extension if allowable under solicitation".to_string());
            }
        }
    }

    let mut seen = std::collections::HashSet::new();
    mitigations.retain(|m| seen.insert(m.clone()));
    mitigations.truncate(10);
    mitigations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OpportunityStatus;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn base_org() -> Organization {
        let mut org = Organization::new("Acme Federal Solutions".to_string());
        org.uei = Some("ABC123DEF456".to_string());
        org.naics_codes = vec!["541512".to_string()];
        org.set_aside_types = vec![set_aside::SetAside::Sb];
        org.state = Some("VA".to_string());
        org.employee_count = Some(50);
        org.annual_revenue = Some(dec!(5000000));
        org.capabilities_narrative = Some("cloud migration services".to_string());
        org
    }

    fn base_opp() -> Opportunity {
        Opportunity {
            id: Uuid::new_v4(),
            source_id: "SAMPLE-001".to_string(),
            source_system: "sam.gov".to_string(),
            title: "cloud migration services".to_string(),
            description: None,
            notice_type: None,
            solicitation_number: None,
            naics_code: Some("541512".to_string()),
            naics_description: None,
            psc_code: None,
            psc_description: None,
            set_aside_type: Some(set_aside::SetAside::Sb),
            posted_date: None,
            response_deadline: Some(Utc::now() + Duration::days(45)),
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
    fn well_aligned_opportunity_is_low_risk() {
        let result = assess(&base_org(), &base_opp());
        assert_eq!(result.eligibility_risk.score, 0.0);
        assert_eq!(result.technical_risk.score, 0.0);
        assert_eq!(result.overall_risk_level, RiskLevel::Low);
    }

    #[test]
    fn ineligible_set_aside_drives_eligibility_risk_critical() {
        let mut opp = base_opp();
        opp.set_aside_type = Some(set_aside::SetAside::EightA);
        let result = assess(&base_org(), &opp);
        assert_eq!(result.eligibility_risk.score, 0.8);
        assert_eq!(result.eligibility_risk.level, RiskLevel::Critical);
    }

    #[test]
    fn missing_uei_adds_eligibility_risk() {
        let mut org = base_org();
        org.uei = None;
        let result = assess(&org, &base_opp());
        assert!(result.eligibility_risk.factors.iter().any(|f| f.contains("UEI")));
        assert_eq!(result.eligibility_risk.score, 0.3);
    }

    #[test]
    fn naics_outside_core_competency_is_flagged() {
        let org = base_org();
        let mut opp = base_opp();
        opp.naics_code = Some("336411".to_string());
        let result = assess(&org, &opp);
        assert_eq!(result.technical_risk.score, 0.5);
    }

    #[test]
    fn oversized_contract_relative_to_revenue_is_flagged() {
        let org = base_org();
        let mut opp = base_opp();
        opp.estimated_value_max = Some(dec!(15000000));
        let result = assess(&org, &opp);
        assert_eq!(result.pricing_risk.score, 0.6);
    }

    #[test]
    fn passed_deadline_is_terminal_timeline_risk() {
        let org = base_org();
        let mut opp = base_opp();
        opp.response_deadline = Some(Utc::now() - Duration::days(1));
        let result = assess(&org, &opp);
        assert_eq!(result.timeline_risk.score, 1.0);
        assert_eq!(result.timeline_risk.level, RiskLevel::Critical);
    }

    #[test]
    fn missing_deadline_adds_small_timeline_risk() {
        let org = base_org();
        let mut opp = base_opp();
        opp.response_deadline = None;
        let result = assess(&org, &opp);
        assert_eq!(result.timeline_risk.score, 0.1);
    }

    #[test]
    fn mitigations_are_deduplicated_and_capped() {
        let mut org = base_org();
        org.uei = None;
        org.capabilities_narrative = None;
        let mut opp = base_opp();
        opp.set_aside_type = Some(set_aside::SetAside::EightA);
        opp.naics_code = Some("336411".to_string());
        opp.psc_code = Some("D399".to_string());
        opp.estimated_value_max = Some(dec!(20000000));
        opp.contract_type = Some("cost-plus-fixed-fee".to_string());
        opp.contracting_office_name = Some("Department of the Navy".to_string());
        opp.security_clearance_required = Some("Secret".to_string());
        opp.response_deadline = Some(Utc::now() + Duration::days(3));
        let result = assess(&org, &opp);
        assert!(result.mitigation_suggestions.len() <= 10);
        let unique: std::collections::HashSet<_> = result.mitigation_suggestions.iter().collect();
        assert_eq!(unique.len(), result.mitigation_suggestions.len());
    }
}
