//! Pricing Intelligence Service (C8): labor-rate and NAICS contract-value
//! benchmarking, a recommended price band anchored on the government
//! estimate (falling back to the benchmark median), and a should-cost
//! model driven by a labor mix. Pure over the rule tables in
//! `crate::rules::{labor, naics}` — no I/O.

use crate::models::{LaborCostLine, Opportunity, PricingRecommendation, ShouldCostEstimate};
use crate::rules::{labor, naics};
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

pub fn recommend(
    opportunity: &Opportunity,
    labor_mix: Option<&HashMap<String, u32>>,
) -> PricingRecommendation {
    let naics_code = opportunity.naics_code.as_deref().unwrap_or("");
    let benchmark = naics::lookup_benchmark(naics_code);
    let relevant_labor_rates = relevant_labor_rates(opportunity);

    let (recommended_min, recommended_max) =
        calculate_recommended_price(benchmark, opportunity.estimated_value_max);

    let competitive_position =
        determine_competitive_position(recommended_min, recommended_max, opportunity.estimated_value_max);

    let factors = serde_json::json!({
        "naics_code": naics_code,
        "has_government_estimate": opportunity.estimated_value_max.is_some(),
        "benchmark_available": benchmark.is_some(),
        "labor_mix_provided": labor_mix.is_some(),
    });

    let notes = generate_pricing_notes(benchmark, opportunity.estimated_value_max, &competitive_position, opportunity);

    PricingRecommendation {
        opportunity_id: opportunity.id.to_string(),
        recommended_price_min: recommended_min,
        recommended_price_max: recommended_max,
        competitive_position,
        confidence: calculate_confidence(benchmark, labor_mix),
        factors,
        labor_rates: relevant_labor_rates,
        benchmarks: benchmark.into_iter().cloned().collect(),
        notes,
        generated_at: Utc::now(),
    }
}

fn relevant_labor_rates(opportunity: &Opportunity) -> Vec<labor::LaborRateBenchmark> {
    let naics_code = opportunity.naics_code.as_deref().unwrap_or("");
    let description = opportunity.description.as_deref().unwrap_or("");
    labor::relevant_categories(naics_code, description)
        .into_iter()
        .filter_map(|key| labor::LABOR_RATE_BENCHMARKS.get(key).cloned())
        .collect()
}

fn calculate_recommended_price(
    benchmark: Option<&naics::ContractValueBenchmark>,
    estimated_max: Option<Decimal>,
) -> (Decimal, Decimal) {
    if let Some(estimated_max) = estimated_max {
        return (estimated_max * dec!(0.85), estimated_max * dec!(1.00));
    }
    if let Some(benchmark) = benchmark {
        return (benchmark.median_value * dec!(0.8), benchmark.median_value * dec!(1.2));
    }
    (dec!(250000), dec!(2500000))
}

fn determine_competitive_position(rec_min: Decimal, rec_max: Decimal, gov_estimate: Option<Decimal>) -> String {
    let Some(gov_estimate) = gov_estimate else {
        return "competitive".to_string();
    };
    if gov_estimate.is_zero() {
        return "competitive".to_string();
    }

    let mid_price = (rec_min + rec_max) / dec!(2);
    let ratio = mid_price / gov_estimate;

    if ratio < dec!(0.85) {
        "aggressive".to_string()
    } else if ratio < dec!(0.95) {
        "competitive".to_string()
    } else {
        "premium".to_string()
    }
}

fn calculate_confidence(
    benchmark: Option<&naics::ContractValueBenchmark>,
    labor_mix: Option<&HashMap<String, u32>>,
) -> f64 {
    let mut confidence = 0.5;

    if let Some(benchmark) = benchmark {
        confidence += 0.2;
        if benchmark.sample_size > 1000 {
            confidence += 0.1;
        }
    }

    if labor_mix.is_some() {
        confidence += 0.15;
    }

    confidence.min(0.95)
}

fn generate_pricing_notes(
    benchmark: Option<&naics::ContractValueBenchmark>,
    gov_estimate: Option<Decimal>,
    position: &str,
    opportunity: &Opportunity,
) -> Vec<String> {
    let mut notes = Vec::new();

    match gov_estimate {
        Some(estimate) => notes.push(format!("Government estimate: ${:.2}", estimate)),
        None => notes.push("No government estimate available - use benchmark data".to_string()),
    }

    if let Some(benchmark) = benchmark {
        notes.push(format!(
            "NAICS {} median award: ${:.2} (n={})",
            benchmark.naics_code, benchmark.median_value, benchmark.sample_size
        ));
    }

    if let Some(set_aside) = opportunity.set_aside_type {
        notes.push(format!(
            "Set-aside: {} - price competitiveness may vary",
            set_aside.as_str()
        ));
    }

    let contract_type = opportunity.contract_type.as_deref().unwrap_or("").to_lowercase();
    if contract_type.contains("ffp") || contract_type.contains("firm fixed") {
        notes.push("Firm Fixed Price - ensure all costs are captured in pricing".to_string());
    } else if contract_type.contains("t&m") || contract_type.contains("time and material") {
        notes.push("T&M contract - focus on competitive labor rates".to_string());
    }

    notes.push(format!("Competitive position: {}", position.to_uppercase()));

    notes
}

const HOURS_PER_MONTH: u32 = 173;

pub fn calculate_should_cost(
    labor_mix: &HashMap<String, u32>,
    duration_months: u32,
    overhead_rate: Decimal,
    profit_margin: Decimal,
) -> ShouldCostEstimate {
    let total_hours = Decimal::from(HOURS_PER_MONTH * duration_months);

    let mut labor_breakdown = HashMap::new();
    let mut total_direct_labor = dec!(0);

    for (category, &fte_count) in labor_mix {
        if let Some(benchmark) = labor::LABOR_RATE_BENCHMARKS.get(category.as_str()) {
            let category_cost = benchmark.median_rate * total_hours * Decimal::from(fte_count);
            labor_breakdown.insert(
                category.clone(),
                LaborCostLine {
                    fte_count,
                    hourly_rate: benchmark.median_rate,
                    total_cost: category_cost,
                },
            );
            total_direct_labor += category_cost;
        }
    }

    let overhead_cost = total_direct_labor * (overhead_rate - dec!(1));
    let subtotal = total_direct_labor + overhead_cost;
    let profit = subtotal * profit_margin;
    let total_price = subtotal + profit;
    let price_per_month = if duration_months == 0 {
        dec!(0)
    } else {
        total_price / Decimal::from(duration_months)
    };

    ShouldCostEstimate {
        labor_breakdown,
        direct_labor: total_direct_labor,
        overhead_cost,
        overhead_rate,
        subtotal,
        profit_margin,
        profit,
        total_price,
        duration_months,
        price_per_month,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OpportunityStatus;
    use crate::rules::set_aside::SetAside;
    use uuid::Uuid;

    fn base_opp() -> Opportunity {
        Opportunity {
            id: Uuid::new_v4(),
            source_id: "SAMPLE-001".to_string(),
            source_system: "sam.gov".to_string(),
            title: "cloud migration services".to_string(),
            description: Some("cloud migration and devops services".to_string()),
            notice_type: None,
            solicitation_number: None,
            naics_code: Some("541512".to_string()),
            naics_description: None,
            psc_code: None,
            psc_description: None,
            set_aside_type: Some(SetAside::Sb),
            posted_date: None,
            response_deadline: None,
            archive_date: None,
            contract_type: Some("Firm Fixed Price".to_string()),
            estimated_value_min: None,
            estimated_value_max: Some(dec!(4000000)),
            place_of_performance_city: None,
            place_of_performance_state: None,
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
    fn government_estimate_anchors_the_price_band() {
        let rec = recommend(&base_opp(), None);
        assert_eq!(rec.recommended_price_min, dec!(4000000) * dec!(0.85));
        assert_eq!(rec.recommended_price_max, dec!(4000000) * dec!(1.00));
    }

    #[test]
    fn missing_estimate_falls_back_to_benchmark_median() {
        let mut opp = base_opp();
        opp.estimated_value_max = None;
        let rec = recommend(&opp, None);
        let benchmark = naics::lookup_benchmark("541512").unwrap();
        assert_eq!(rec.recommended_price_min, benchmark.median_value * dec!(0.8));
        assert_eq!(rec.recommended_price_max, benchmark.median_value * dec!(1.2));
    }

    #[test]
    fn it_naics_code_pulls_cloud_architect_into_labor_rates() {
        let rec = recommend(&base_opp(), None);
        assert!(rec
            .labor_rates
            .iter()
            .any(|r| r.labor_category == "Cloud Solutions Architect"));
    }

    #[test]
    fn confidence_increases_with_benchmark_and_labor_mix() {
        let mut mix = HashMap::new();
        mix.insert("engineer".to_string(), 3u32);
        let rec = recommend(&base_opp(), Some(&mix));
        assert!(rec.confidence > 0.5);
        assert!(rec.confidence <= 0.95);
    }

    #[test]
    fn should_cost_applies_overhead_and_profit_on_direct_labor() {
        let mut mix = HashMap::new();
        mix.insert("engineer".to_string(), 2u32);
        let estimate = calculate_should_cost(&mix, 12, dec!(1.5), dec!(0.10));
        assert!(estimate.direct_labor > dec!(0));
        assert_eq!(estimate.overhead_cost, estimate.direct_labor * dec!(0.5));
        assert_eq!(estimate.subtotal, estimate.direct_labor + estimate.overhead_cost);
        assert_eq!(estimate.total_price, estimate.subtotal + estimate.profit);
    }

    #[test]
    fn should_cost_ignores_unknown_labor_categories() {
        let mut mix = HashMap::new();
        mix.insert("unobtanium_wizard".to_string(), 5u32);
        let estimate = calculate_should_cost(&mix, 6, dec!(1.5), dec!(0.10));
        assert_eq!(estimate.direct_labor, dec!(0));
        assert!(estimate.labor_breakdown.is_empty());
    }
}
