//! State adjacency table used by geographic fit scoring.
//!
//! Union of the adjacency pairs found across the source services (see
//! DESIGN.md Open Question 2); stored undirected, checked both ways.

use lazy_static::lazy_static;
use std::collections::HashSet;

/// The DC/VA/MD federal-hub triangle: treated as mutually adjacent and
/// also individually flagged as "DC-metro" for win-probability scoring.
pub const DC_METRO: [&str; 3] = ["DC", "VA", "MD"];

lazy_static! {
    static ref ADJACENT_PAIRS: HashSet<(&'static str, &'static str)> = {
        let pairs: &[(&str, &str)] = &[
            ("VA", "MD"), ("VA", "DC"), ("MD", "DC"),
            ("VA", "WV"), ("VA", "NC"), ("VA", "TN"), ("VA", "KY"),
            ("MD", "PA"), ("MD", "DE"),
            ("CA", "OR"), ("CA", "NV"), ("CA", "AZ"),
            ("TX", "NM"), ("TX", "OK"), ("TX", "AR"), ("TX", "LA"),
            ("FL", "GA"), ("FL", "AL"),
            ("NY", "NJ"), ("NY", "CT"), ("NY", "PA"), ("NY", "VT"), ("NY", "MA"),
            ("IL", "WI"), ("IL", "IN"), ("IL", "MO"), ("IL", "IA"), ("IL", "KY"),
        ];
        let mut set = HashSet::new();
        for &(a, b) in pairs {
            set.insert((a, b));
            set.insert((b, a));
        }
        set
    };
}

pub fn is_adjacent(a: &str, b: &str) -> bool {
    let a = a.to_uppercase();
    let b = b.to_uppercase();
    ADJACENT_PAIRS.contains(&(a.as_str(), b.as_str()))
}

pub fn is_dc_metro(state: &str) -> bool {
    DC_METRO.contains(&state.to_uppercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacency_is_symmetric() {
        assert!(is_adjacent("VA", "MD"));
        assert!(is_adjacent("MD", "VA"));
    }

    #[test]
    fn dc_metro_triangle() {
        assert!(is_dc_metro("dc"));
        assert!(is_dc_metro("VA"));
        assert!(!is_dc_metro("NY"));
    }

    #[test]
    fn unrelated_states_are_not_adjacent() {
        assert!(!is_adjacent("WA", "ME"));
    }
}
