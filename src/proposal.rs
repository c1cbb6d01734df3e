//! Proposal generator (supplement): the deterministic template fallback
//! the core boundary specifies. No LLM call lives here — only the
//! boilerplate outline a caller can send to an external text-generation
//! step, or return as-is when none is configured.

use crate::models::{Organization, Opportunity, RelevanceScore, RiskAssessment};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalSection {
    pub section_id: String,
    pub title: String,
    pub content: String,
    pub word_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalOutline {
    pub opportunity_id: String,
    pub organization_id: String,
    pub sections: Vec<ProposalSection>,
    pub total_word_count: usize,
    pub generated_at: DateTime<Utc>,
}

/// Build the four-section boilerplate outline (cover letter, technical
/// approach, past performance, pricing summary) from the already-computed
/// relevance score and risk assessment. Deterministic: same inputs always
/// produce the same text.
pub fn generate(
    organization: &Organization,
    opportunity: &Opportunity,
    relevance: &RelevanceScore,
    risk: &RiskAssessment,
) -> ProposalOutline {
    let sections = vec![
        cover_letter(organization, opportunity, relevance),
        technical_approach(organization, opportunity),
        past_performance(organization),
        pricing_summary(opportunity, risk),
    ];

    let total_word_count = sections.iter().map(|s| s.word_count).sum();

    ProposalOutline {
        opportunity_id: opportunity.id.to_string(),
        organization_id: organization.id.to_string(),
        sections,
        total_word_count,
        generated_at: Utc::now(),
    }
}

fn section(section_id: &str, title: &str, content: String) -> ProposalSection {
    let word_count = content.split_whitespace().count();
    ProposalSection {
        section_id: section_id.to_string(),
        title: title.to_string(),
        content,
        word_count,
    }
}

fn cover_letter(
    organization: &Organization,
    opportunity: &Opportunity,
    relevance: &RelevanceScore,
) -> ProposalSection {
    let org_name = organization.name.as_str();
    let opp_title = opportunity.title.as_str();

    let content = format!(
        "{org_name} is pleased to submit this proposal in response to {opp_title}.\n\n\
         Our organization brings relevant experience in the areas required by this \
         solicitation, with a documented relevance score of {score:.2} against the \
         stated requirements.\n\n\
         We look forward to the opportunity to demonstrate our capabilities and \
         contribute to the agency's mission.\n\n\
         [Template cover letter. Full narrative requires an external drafting step.]",
        score = relevance.overall_score,
    );

    section("cover_letter", "Cover Letter", content)
}

fn technical_approach(organization: &Organization, opportunity: &Opportunity) -> ProposalSection {
    let org_name = organization.name.as_str();
    let opp_title = opportunity.title.as_str();

    let content = format!(
        "# Technical Approach\n\n\
         ## Understanding of Requirements\n\
         {org_name} understands the requirements outlined in {opp_title}. Our \
         approach is designed to meet the stated objectives.\n\n\
         ## Methodology\n\
         1. Requirements analysis and planning\n\
         2. Solution design\n\
         3. Implementation and integration\n\
         4. Testing and quality assurance\n\
         5. Deployment and transition\n\n\
         [Template approach. Full narrative requires an external drafting step.]"
    );

    section("technical_approach", "Technical Approach", content)
}

fn past_performance(organization: &Organization) -> ProposalSection {
    let org_name = organization.name.as_str();
    let summary = organization
        .past_performance_summary
        .as_deref()
        .unwrap_or("Contact us for detailed past performance references.");

    let content = format!(
        "# Past Performance\n\n\
         {org_name} has delivered similar contracts demonstrating relevant capability.\n\n\
         {summary}\n\n\
         [Template narrative. Full content requires an external drafting step.]"
    );

    section("past_performance", "Past Performance", content)
}

fn pricing_summary(opportunity: &Opportunity, risk: &RiskAssessment) -> ProposalSection {
    let value = opportunity
        .estimated_value_max
        .map(|v| v.to_string())
        .unwrap_or_else(|| "not disclosed".to_string());

    let content = format!(
        "# Pricing Summary\n\n\
         Estimated contract value: {value}.\n\
         Pricing risk level: {:?}.\n\n\
         A detailed should-cost estimate is available via the pricing intelligence \
         endpoint.\n\n\
         [Template summary. Final pricing requires cost/price analysis.]",
        risk.pricing_risk.level,
    );

    section("pricing_summary", "Pricing Summary", content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RiskCategory, RiskLevel};
    use uuid::Uuid;

    fn sample_org() -> Organization {
        let mut org = Organization::new("Acme Federal Services".to_string());
        org.past_performance_summary = Some("Delivered three similar IT modernization contracts.".to_string());
        org
    }

    fn sample_opportunity() -> Opportunity {
        Opportunity {
            id: Uuid::new_v4(),
            source_id: "SAMPLE-001".to_string(),
            source_system: "sam_gov".to_string(),
            title: "Cloud Migration Services".to_string(),
            description: None,
            notice_type: None,
            solicitation_number: None,
            naics_code: Some("541512".to_string()),
            naics_description: None,
            psc_code: None,
            psc_description: None,
            set_aside_type: None,
            posted_date: None,
            response_deadline: None,
            archive_date: None,
            contract_type: None,
            estimated_value_min: None,
            estimated_value_max: None,
            place_of_performance_city: None,
            place_of_performance_state: None,
            place_of_performance_zip: None,
            place_of_performance_country: None,
            contracting_office_name: None,
            point_of_contact_name: None,
            point_of_contact_email: None,
            point_of_contact_phone: None,
            status: crate::models::OpportunityStatus::Active,
            security_clearance_required: None,
            raw_data: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            ingested_at: Utc::now(),
        }
    }

    fn neutral_risk_category() -> RiskCategory {
        RiskCategory {
            score: 0.2,
            level: RiskLevel::Low,
            factors: Vec::new(),
        }
    }

    fn sample_relevance(org: &Organization, opp: &Opportunity) -> RelevanceScore {
        crate::scoring::relevance::score(org, opp, Default::default())
    }

    fn sample_risk(org: &Organization, opp: &Opportunity) -> RiskAssessment {
        let mut risk = crate::scoring::risk::assess(org, opp);
        risk.pricing_risk = neutral_risk_category();
        risk
    }

    #[test]
    fn outline_has_four_sections() {
        let org = sample_org();
        let opp = sample_opportunity();
        let relevance = sample_relevance(&org, &opp);
        let risk = sample_risk(&org, &opp);

        let outline = generate(&org, &opp, &relevance, &risk);

        assert_eq!(outline.sections.len(), 4);
        assert_eq!(outline.sections[0].section_id, "cover_letter");
        assert_eq!(outline.sections[3].section_id, "pricing_summary");
        assert!(outline.total_word_count > 0);
    }

    #[test]
    fn deterministic_for_same_inputs() {
        let org = sample_org();
        let opp = sample_opportunity();
        let relevance = sample_relevance(&org, &opp);
        let risk = sample_risk(&org, &opp);

        let first = generate(&org, &opp, &relevance, &risk);
        let second = generate(&org, &opp, &relevance, &risk);

        let first_texts: Vec<_> = first.sections.iter().map(|s| s.content.clone()).collect();
        let second_texts: Vec<_> = second.sections.iter().map(|s| s.content.clone()).collect();
        assert_eq!(first_texts, second_texts);
    }

    #[test]
    fn cover_letter_mentions_organization_and_opportunity() {
        let org = sample_org();
        let opp = sample_opportunity();
        let relevance = sample_relevance(&org, &opp);
        let cover = cover_letter(&org, &opp, &relevance);

        assert!(cover.content.contains("Acme Federal Services"));
        assert!(cover.content.contains("Cloud Migration Services"));
    }
}
