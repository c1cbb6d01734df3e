//! Trade Agreements Act country-of-origin table.
//!
//! TAA requires goods acquired under covered federal contracts to be
//! manufactured, or substantially transformed, in the US or a country
//! designated under the WTO Government Procurement Agreement, a Free
//! Trade Agreement, or the Caribbean Basin Initiative.

use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};

/// (country name, is_designated)
pub type CountryInfo = (&'static str, bool);

lazy_static! {
    pub static ref TAA_DESIGNATED_COUNTRIES: HashMap<&'static str, CountryInfo> = {
        let mut m = HashMap::new();
        // WTO GPA countries
        for (code, name) in [
            ("AM", "Armenia"), ("AT", "Austria"), ("AU", "Australia"),
            ("BE", "Belgium"), ("BG", "Bulgaria"), ("CA", "Canada"),
            ("HR", "Croatia"), ("CY", "Cyprus"), ("CZ", "Czech Republic"),
            ("DK", "Denmark"), ("EE", "Estonia"), ("FI", "Finland"),
            ("FR", "France"), ("DE", "Germany"), ("GR", "Greece"),
            ("HK", "Hong Kong"), ("HU", "Hungary"), ("IS", "Iceland"),
            ("IE", "Ireland"), ("IL", "Israel"), ("IT", "Italy"),
            ("JP", "Japan"), ("KR", "Korea, Republic of"), ("LV", "Latvia"),
            ("LI", "Liechtenstein"), ("LT", "Lithuania"), ("LU", "Luxembourg"),
            ("MT", "Malta"), ("MD", "Moldova"), ("ME", "Montenegro"),
            ("NL", "Netherlands"), ("NZ", "New Zealand"), ("MK", "North Macedonia"),
            ("NO", "Norway"), ("PL", "Poland"), ("PT", "Portugal"),
            ("RO", "Romania"), ("SG", "Singapore"), ("SK", "Slovakia"),
            ("SI", "Slovenia"), ("ES", "Spain"), ("SE", "Sweden"),
            ("CH", "Switzerland"), ("TW", "Taiwan"), ("UA", "Ukraine"),
            ("GB", "United Kingdom"), ("US", "United States"),
        ] {
            m.insert(code, (name, true));
        }
        // Caribbean Basin countries
        for (code, name) in [
            ("AG", "Antigua and Barbuda"), ("AW", "Aruba"), ("BS", "Bahamas"),
            ("BB", "Barbados"), ("BZ", "Belize"), ("VG", "British Virgin Islands"),
            ("CW", "Curacao"), ("DM", "Dominica"), ("GD", "Grenada"),
            ("GY", "Guyana"), ("HT", "Haiti"), ("JM", "Jamaica"),
            ("MS", "Montserrat"), ("KN", "St. Kitts and Nevis"), ("LC", "St. Lucia"),
            ("VC", "St. Vincent and the Grenadines"), ("TT", "Trinidad and Tobago"),
        ] {
            m.insert(code, (name, true));
        }
        // FTA countries
        for (code, name) in [
            ("BH", "Bahrain"), ("CL", "Chile"), ("CO", "Colombia"),
            ("CR", "Costa Rica"), ("DO", "Dominican Republic"), ("SV", "El Salvador"),
            ("GT", "Guatemala"), ("HN", "Honduras"), ("JO", "Jordan"),
            ("MX", "Mexico"), ("MA", "Morocco"), ("NI", "Nicaragua"),
            ("OM", "Oman"), ("PA", "Panama"), ("PE", "Peru"),
        ] {
            m.insert(code, (name, true));
        }
        m
    };

    pub static ref NON_TAA_COUNTRIES: HashMap<&'static str, CountryInfo> = {
        let mut m = HashMap::new();
        for (code, name) in [
            ("CN", "China"), ("RU", "Russia"), ("IN", "India"),
            ("MY", "Malaysia"), ("TH", "Thailand"), ("VN", "Vietnam"),
            ("ID", "Indonesia"), ("BD", "Bangladesh"), ("PK", "Pakistan"),
            ("PH", "Philippines"), ("BR", "Brazil"), ("AR", "Argentina"),
            ("ZA", "South Africa"), ("EG", "Egypt"), ("SA", "Saudi Arabia"),
            ("AE", "United Arab Emirates"), ("IR", "Iran"), ("KP", "North Korea"),
            ("BY", "Belarus"), ("CU", "Cuba"), ("SY", "Syria"), ("VE", "Venezuela"),
        ] {
            m.insert(code, (name, false));
        }
        m
    };

    /// Countries prohibited outright regardless of TAA designation.
    pub static ref SANCTIONED_COUNTRIES: HashSet<&'static str> =
        ["KP", "IR", "CU", "SY", "BY", "RU"].into_iter().collect();
}

/// Look up a country by ISO-3166 alpha-2 code in either table.
pub fn lookup(country_code: &str) -> Option<CountryInfo> {
    let code = country_code.to_uppercase();
    TAA_DESIGNATED_COUNTRIES
        .get(code.as_str())
        .or_else(|| NON_TAA_COUNTRIES.get(code.as_str()))
        .copied()
}

pub fn is_sanctioned(country_code: &str) -> bool {
    SANCTIONED_COUNTRIES.contains(country_code.to_uppercase().as_str())
}
