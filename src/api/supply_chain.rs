//! Supply-chain compliance endpoints: Section 889 screening, TAA
//! country-of-origin checks, and the composite supplier verification.

use crate::error::AppResult;
use crate::models::{Section889Result, SupplierVerification, TaaResult};
use crate::scoring::supply_chain::{self, Component};
use axum::Json;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub struct ComponentInput {
    pub name: Option<String>,
    pub manufacturer: Option<String>,
}

impl From<ComponentInput> for Component {
    fn from(input: ComponentInput) -> Self {
        Component {
            name: input.name,
            manufacturer: input.manufacturer,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Section889CheckRequest {
    pub supplier_name: String,
    #[serde(default)]
    pub components: Vec<ComponentInput>,
}

pub async fn check_section_889(
    Json(req): Json<Section889CheckRequest>,
) -> AppResult<Json<Section889Result>> {
    let components: Vec<Component> = req.components.into_iter().map(Into::into).collect();
    let result = supply_chain::check_section_889(&req.supplier_name, &components);
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct TaaCheckRequest {
    pub country_code: String,
}

pub async fn check_taa(Json(req): Json<TaaCheckRequest>) -> AppResult<Json<TaaResult>> {
    let result = supply_chain::check_taa_compliance(&req.country_code);
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct TaaBatchCheckRequest {
    pub country_codes: Vec<String>,
}

pub async fn batch_check_taa(
    Json(req): Json<TaaBatchCheckRequest>,
) -> AppResult<Json<HashMap<String, TaaResult>>> {
    let result = supply_chain::batch_check_countries(&req.country_codes);
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct VerifySupplierRequest {
    pub supplier_name: String,
    pub supplier_id: Option<String>,
    pub country_of_origin: Option<String>,
    #[serde(default)]
    pub components: Vec<ComponentInput>,
}

pub async fn verify_supplier(
    Json(req): Json<VerifySupplierRequest>,
) -> AppResult<Json<SupplierVerification>> {
    let components: Vec<Component> = req.components.into_iter().map(Into::into).collect();
    let result = supply_chain::verify_supplier(
        &req.supplier_name,
        req.supplier_id,
        req.country_of_origin.as_deref(),
        &components,
    );
    Ok(Json(result))
}
