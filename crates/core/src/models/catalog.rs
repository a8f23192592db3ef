use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleSize {
    pub id: String,
    pub name: String,
}

/// Additive surcharge a service applies for one vehicle size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SizeVariation {
    pub price: Decimal,
    pub duration_minutes: u32,
}

/// Named upgrade tier of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formula {
    pub id: String,
    pub name: String,
    pub additional_price: Decimal,
    pub additional_duration_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOn {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCatalogItem {
    pub id: String,
    pub name: String,
    pub base_price: Decimal,
    pub base_duration_minutes: u32,
    /// Keyed by vehicle size id. Sizes missing here add nothing.
    #[serde(default)]
    pub vehicle_size_variations: BTreeMap<String, SizeVariation>,
    #[serde(default)]
    pub formulas: Vec<Formula>,
    #[serde(default)]
    pub add_ons: Vec<AddOn>,
}

impl ServiceCatalogItem {
    pub fn formula(&self, formula_id: &str) -> Option<&Formula> {
        self.formulas.iter().find(|formula| formula.id == formula_id)
    }

    pub fn add_on(&self, add_on_id: &str) -> Option<&AddOn> {
        self.add_ons.iter().find(|add_on| add_on.id == add_on_id)
    }

    pub fn size_variation(&self, vehicle_size_id: &str) -> Option<&SizeVariation> {
        self.vehicle_size_variations.get(vehicle_size_id)
    }
}

/// One selected service in the booking cart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartLine {
    pub service_id: String,
    #[serde(default)]
    pub vehicle_size_id: Option<String>,
    #[serde(default)]
    pub formula_id: Option<String>,
    #[serde(default)]
    pub add_on_ids: BTreeSet<String>,
}

impl CartLine {
    pub fn new(service_id: impl Into<String>) -> Self {
        Self {
            service_id: service_id.into(),
            ..Self::default()
        }
    }

    pub fn with_vehicle_size(mut self, vehicle_size_id: impl Into<String>) -> Self {
        self.vehicle_size_id = Some(vehicle_size_id.into());
        self
    }

    pub fn with_formula(mut self, formula_id: impl Into<String>) -> Self {
        self.formula_id = Some(formula_id.into());
        self
    }

    pub fn with_add_on(mut self, add_on_id: impl Into<String>) -> Self {
        self.add_on_ids.insert(add_on_id.into());
        self
    }
}
