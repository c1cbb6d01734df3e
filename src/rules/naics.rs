//! NAICS contract-value benchmarks and the hierarchical NAICS matcher.

use lazy_static::lazy_static;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractValueBenchmark {
    pub naics_code: &'static str,
    pub psc_code: &'static str,
    pub min_value: Decimal,
    pub max_value: Decimal,
    pub median_value: Decimal,
    /// See DESIGN.md Open Question 3: the source data spells this field
    /// `average_rate` on the 541519 row, but it is the same contract-value
    /// average as every other row's `average_value`.
    pub average_value: Decimal,
    pub sample_size: u32,
    pub period: &'static str,
}

lazy_static! {
    pub static ref NAICS_BENCHMARKS: HashMap<&'static str, ContractValueBenchmark> = {
        let mut m = HashMap::new();
        m.insert("541511", ContractValueBenchmark {
            naics_code: "541511", psc_code: "D302",
            min_value: dec!(100000), max_value: dec!(50000000),
            median_value: dec!(2500000), average_value: dec!(5200000),
            sample_size: 2500, period: "FY2024",
        });
        m.insert("541512", ContractValueBenchmark {
            naics_code: "541512", psc_code: "D306",
            min_value: dec!(150000), max_value: dec!(75000000),
            median_value: dec!(3500000), average_value: dec!(7800000),
            sample_size: 1800, period: "FY2024",
        });
        m.insert("541519", ContractValueBenchmark {
            naics_code: "541519", psc_code: "D399",
            min_value: dec!(75000), max_value: dec!(25000000),
            median_value: dec!(1800000), average_value: dec!(3200000),
            sample_size: 1200, period: "FY2024",
        });
        m.insert("541330", ContractValueBenchmark {
            naics_code: "541330", psc_code: "C211",
            min_value: dec!(200000), max_value: dec!(100000000),
            median_value: dec!(5000000), average_value: dec!(12500000),
            sample_size: 900, period: "FY2024",
        });
        m.insert("561210", ContractValueBenchmark {
            naics_code: "561210", psc_code: "R699",
            min_value: dec!(50000), max_value: dec!(15000000),
            median_value: dec!(850000), average_value: dec!(1800000),
            sample_size: 1500, period: "FY2024",
        });
        m
    };
}

/// Exact match first, then fall back to a shared 4-digit prefix.
pub fn lookup_benchmark(naics_code: &str) -> Option<&'static ContractValueBenchmark> {
    if let Some(b) = NAICS_BENCHMARKS.get(naics_code) {
        return Some(b);
    }
    if naics_code.len() < 4 {
        return None;
    }
    let prefix = &naics_code[..4];
    NAICS_BENCHMARKS.values().find(|b| b.naics_code.starts_with(prefix))
}

/// Score the best match between an opportunity's NAICS code and a
/// collection of candidate organization codes, via longest common prefix.
/// Neutral (0.5) if either side is missing; early-exits on a perfect
/// (L>=6) match since nothing can score higher.
pub fn naics_match_score(org_codes: &[String], opp_code: &str) -> f64 {
    if opp_code.is_empty() || org_codes.is_empty() {
        return 0.5;
    }
    let mut best = 0.0f64;
    for code in org_codes {
        if code.is_empty() {
            continue;
        }
        let shared = shared_prefix_len(code, opp_code);
        let score = match shared {
            l if l >= 6 => 1.0,
            5 => 0.9,
            4 => 0.75,
            3 => 0.5,
            2 => 0.25,
            _ => 0.0,
        };
        if score >= 1.0 {
            return 1.0;
        }
        if score > best {
            best = score;
        }
    }
    best
}

fn shared_prefix_len(a: &str, b: &str) -> usize {
    a.bytes().zip(b.bytes()).take_while(|(x, y)| x == y).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_scores_one() {
        assert_eq!(naics_match_score(&["541511".to_string()], "541511"), 1.0);
    }

    #[test]
    fn four_digit_prefix_scores_three_quarters() {
        assert_eq!(naics_match_score(&["541512".to_string()], "541519"), 0.75);
    }

    #[test]
    fn no_shared_sector_scores_zero() {
        assert_eq!(naics_match_score(&["237310".to_string()], "541511"), 0.0);
    }

    #[test]
    fn missing_code_is_neutral() {
        assert_eq!(naics_match_score(&[], "541511"), 0.5);
        assert_eq!(naics_match_score(&["541511".to_string()], ""), 0.5);
    }

    #[test]
    fn benchmark_lookup_falls_back_to_prefix() {
        let b = lookup_benchmark("541513").unwrap();
        assert_eq!(b.naics_code, "541511");
    }

    #[test]
    fn every_benchmark_average_value_is_positive() {
        for b in NAICS_BENCHMARKS.values() {
            assert!(b.average_value > dec!(0), "{} has non-positive average_value", b.naics_code);
        }
    }
}
