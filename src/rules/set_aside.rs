//! Set-aside eligibility lattice.
//!
//! Maps an opportunity's required set-aside to the certifications an
//! organization may hold to satisfy it. See DESIGN.md Open Question 1 for
//! why this is the single canonical table rather than one per scorer.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SetAside {
    Sb,
    Sdb,
    #[serde(rename = "8A")]
    EightA,
    Wosb,
    Edwosb,
    Vosb,
    Sdvosb,
    Hubzone,
}

impl SetAside {
    pub fn as_str(&self) -> &'static str {
        match self {
            SetAside::Sb => "SB",
            SetAside::Sdb => "SDB",
            SetAside::EightA => "8A",
            SetAside::Wosb => "WOSB",
            SetAside::Edwosb => "EDWOSB",
            SetAside::Vosb => "VOSB",
            SetAside::Sdvosb => "SDVOSB",
            SetAside::Hubzone => "HUBZone",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "SB" => Some(SetAside::Sb),
            "SDB" => Some(SetAside::Sdb),
            "8A" | "8(A)" => Some(SetAside::EightA),
            "WOSB" => Some(SetAside::Wosb),
            "EDWOSB" => Some(SetAside::Edwosb),
            "VOSB" => Some(SetAside::Vosb),
            "SDVOSB" => Some(SetAside::Sdvosb),
            "HUBZONE" => Some(SetAside::Hubzone),
            _ => None,
        }
    }
}

lazy_static! {
    /// required set-aside -> certifications that satisfy it
    pub static ref SET_ASIDE_ELIGIBLE: HashMap<SetAside, Vec<SetAside>> = {
        use SetAside::*;
        let mut m = HashMap::new();
        m.insert(Sb, vec![Sb, Sdb, EightA, Wosb, Edwosb, Vosb, Sdvosb, Hubzone]);
        m.insert(Wosb, vec![Wosb, Edwosb]);
        m.insert(Edwosb, vec![Edwosb]);
        m.insert(Vosb, vec![Vosb, Sdvosb]);
        m.insert(Sdvosb, vec![Sdvosb]);
        m.insert(EightA, vec![EightA]);
        m.insert(Hubzone, vec![Hubzone]);
        m.insert(Sdb, vec![Sdb, EightA]);
        m
    };
}

/// An organization holding any of `org_certs` is eligible for `required`
/// when `required` is `None` (no set-aside restriction, open to all).
pub fn is_eligible(required: Option<SetAside>, org_certs: &[SetAside]) -> bool {
    let Some(required) = required else {
        return true;
    };
    match SET_ASIDE_ELIGIBLE.get(&required) {
        Some(satisfying) => org_certs.iter().any(|c| satisfying.contains(c)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SetAside::*;

    #[test]
    fn open_requirement_is_always_eligible() {
        assert!(is_eligible(None, &[]));
    }

    #[test]
    fn sb_accepts_any_certified_small_business_flavor() {
        for cert in [Sb, Sdb, EightA, Wosb, Edwosb, Vosb, Sdvosb, Hubzone] {
            assert!(is_eligible(Some(Sb), &[cert]), "{:?} should satisfy SB", cert);
        }
    }

    #[test]
    fn sb_certification_does_not_satisfy_narrower_requirements() {
        assert!(!is_eligible(Some(EightA), &[Sb]));
        assert!(!is_eligible(Some(Sdvosb), &[Vosb]));
    }

    #[test]
    fn vosb_satisfies_vosb_requirement_but_not_vice_versa() {
        assert!(is_eligible(Some(Vosb), &[Sdvosb]));
        assert!(!is_eligible(Some(Sdvosb), &[Vosb]));
    }
}
