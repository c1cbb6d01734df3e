//! GSA labor-category rate benchmarks used by the should-cost model.

use lazy_static::lazy_static;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaborRateBenchmark {
    pub labor_category: &'static str,
    pub min_rate: Decimal,
    pub max_rate: Decimal,
    pub median_rate: Decimal,
    pub average_rate: Decimal,
    pub sample_size: u32,
    pub data_source: &'static str,
}

lazy_static! {
    pub static ref LABOR_RATE_BENCHMARKS: HashMap<&'static str, LaborRateBenchmark> = {
        let mut m = HashMap::new();
        m.insert("program_manager", LaborRateBenchmark {
            labor_category: "Program Manager",
            min_rate: dec!(125.00), max_rate: dec!(225.00), median_rate: dec!(175.00),
            average_rate: dec!(172.50), sample_size: 500, data_source: "GSA IT Schedule 70",
        });
        m.insert("project_manager", LaborRateBenchmark {
            labor_category: "Project Manager",
            min_rate: dec!(95.00), max_rate: dec!(175.00), median_rate: dec!(135.00),
            average_rate: dec!(132.00), sample_size: 800, data_source: "GSA IT Schedule 70",
        });
        m.insert("senior_engineer", LaborRateBenchmark {
            labor_category: "Senior Software Engineer",
            min_rate: dec!(110.00), max_rate: dec!(195.00), median_rate: dec!(155.00),
            average_rate: dec!(152.00), sample_size: 1200, data_source: "GSA IT Schedule 70",
        });
        m.insert("engineer", LaborRateBenchmark {
            labor_category: "Software Engineer",
            min_rate: dec!(75.00), max_rate: dec!(145.00), median_rate: dec!(110.00),
            average_rate: dec!(108.00), sample_size: 1500, data_source: "GSA IT Schedule 70",
        });
        m.insert("junior_engineer", LaborRateBenchmark {
            labor_category: "Junior Software Engineer",
            min_rate: dec!(55.00), max_rate: dec!(95.00), median_rate: dec!(72.00),
            average_rate: dec!(73.50), sample_size: 900, data_source: "GSA IT Schedule 70",
        });
        m.insert("senior_analyst", LaborRateBenchmark {
            labor_category: "Senior Systems Analyst",
            min_rate: dec!(95.00), max_rate: dec!(165.00), median_rate: dec!(125.00),
            average_rate: dec!(127.00), sample_size: 700, data_source: "GSA IT Schedule 70",
        });
        m.insert("analyst", LaborRateBenchmark {
            labor_category: "Systems Analyst",
            min_rate: dec!(65.00), max_rate: dec!(125.00), median_rate: dec!(92.00),
            average_rate: dec!(94.00), sample_size: 1100, data_source: "GSA IT Schedule 70",
        });
        m.insert("security_engineer", LaborRateBenchmark {
            labor_category: "Cybersecurity Engineer",
            min_rate: dec!(115.00), max_rate: dec!(210.00), median_rate: dec!(160.00),
            average_rate: dec!(158.00), sample_size: 450, data_source: "GSA IT Schedule 70",
        });
        m.insert("data_scientist", LaborRateBenchmark {
            labor_category: "Data Scientist",
            min_rate: dec!(105.00), max_rate: dec!(195.00), median_rate: dec!(150.00),
            average_rate: dec!(148.00), sample_size: 350, data_source: "GSA IT Schedule 70",
        });
        m.insert("cloud_architect", LaborRateBenchmark {
            labor_category: "Cloud Solutions Architect",
            min_rate: dec!(130.00), max_rate: dec!(235.00), median_rate: dec!(180.00),
            average_rate: dec!(178.00), sample_size: 280, data_source: "GSA IT Schedule 70",
        });
        m.insert("consultant_senior", LaborRateBenchmark {
            labor_category: "Senior Consultant",
            min_rate: dec!(115.00), max_rate: dec!(225.00), median_rate: dec!(165.00),
            average_rate: dec!(162.00), sample_size: 600, data_source: "GSA PSS Schedule",
        });
        m.insert("consultant", LaborRateBenchmark {
            labor_category: "Consultant",
            min_rate: dec!(75.00), max_rate: dec!(155.00), median_rate: dec!(110.00),
            average_rate: dec!(112.00), sample_size: 850, data_source: "GSA PSS Schedule",
        });
        m.insert("subject_matter_expert", LaborRateBenchmark {
            labor_category: "Subject Matter Expert",
            min_rate: dec!(140.00), max_rate: dec!(285.00), median_rate: dec!(200.00),
            average_rate: dec!(195.00), sample_size: 400, data_source: "GSA PSS Schedule",
        });
        m.insert("admin_assistant", LaborRateBenchmark {
            labor_category: "Administrative Assistant",
            min_rate: dec!(35.00), max_rate: dec!(65.00), median_rate: dec!(48.00),
            average_rate: dec!(49.00), sample_size: 1000, data_source: "GSA Schedule",
        });
        m.insert("executive_assistant", LaborRateBenchmark {
            labor_category: "Executive Assistant",
            min_rate: dec!(50.00), max_rate: dec!(95.00), median_rate: dec!(70.00),
            average_rate: dec!(71.00), sample_size: 500, data_source: "GSA Schedule",
        });
        m
    };
}

/// Labor categories relevant to a given NAICS/description combination,
/// mirroring the IT-vs-professional-services-vs-default buckets used by
/// the should-cost model.
pub fn relevant_categories(naics_code: &str, description: &str) -> Vec<&'static str> {
    let description = description.to_lowercase();
    let mut relevant = Vec::new();

    if naics_code.starts_with("5415") {
        relevant.extend(["program_manager", "project_manager", "senior_engineer", "engineer", "analyst"]);
        if description.contains("security") || description.contains("cyber") {
            relevant.push("security_engineer");
        }
        if description.contains("data") || description.contains("analytics") {
            relevant.push("data_scientist");
        }
        if description.contains("cloud") || description.contains("aws") || description.contains("azure") {
            relevant.push("cloud_architect");
        }
    } else if naics_code.starts_with("5416") || naics_code.starts_with("5412") {
        relevant.extend(["consultant_senior", "consultant", "subject_matter_expert", "project_manager"]);
    }

    if relevant.is_empty() {
        relevant.extend(["project_manager", "consultant", "analyst"]);
    }

    relevant
}
