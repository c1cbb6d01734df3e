//! Section 889 prohibited-entity table.
//!
//! Section 889 of the NDAA FY2019 bars federal agencies from procuring
//! covered telecommunications/video-surveillance equipment (Part A) or
//! contracting with entities that use it (Part B). This module holds the
//! static entity/brand tables; `crate::scoring::supply_chain` applies them.

use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    /// lowercase match key -> canonical entity name.
    pub static ref PROHIBITED_ENTITIES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("huawei", "Huawei Technologies Co., Ltd.");
        m.insert("zte", "ZTE Corporation");
        m.insert("hytera", "Hytera Communications Corporation");
        m.insert("hikvision", "Hangzhou Hikvision Digital Technology Co., Ltd.");
        m.insert("dahua", "Dahua Technology Co., Ltd.");
        m.insert("huawei marine", "Huawei Marine Networks");
        m.insert("huawei cloud", "Huawei Cloud Computing");
        m.insert("hiwatch", "HiWatch (Hikvision subsidiary)");
        m.insert("ezviz", "EZVIZ (Hikvision subsidiary)");
        m.insert("lorex", "Lorex Technology (Dahua subsidiary)");
        m.insert("kaspersky", "Kaspersky Lab (if network-connected)");
        m
    };

    /// brand name -> either a key into PROHIBITED_ENTITIES, or the literal
    /// sentinel "requires_review" for brands that are suspect but not
    /// explicitly banned.
    pub static ref PROHIBITED_BRANDS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("honor", "huawei");
        m.insert("hikwatch", "hikvision");
        m.insert("dahua technology", "dahua");
        m.insert("uniview", "requires_review");
        m
    };
}

pub const REQUIRES_REVIEW: &str = "requires_review";
