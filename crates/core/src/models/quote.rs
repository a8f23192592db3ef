use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::catalog::CartLine;

/// Price and duration contributions of one resolved cart line.
///
/// Each contribution is kept separately so the booking UI can show where the
/// total comes from, and so the persisted snapshot can be audited later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteLine {
    pub service_id: String,
    pub service_name: String,
    pub vehicle_size_id: Option<String>,
    pub formula_id: Option<String>,
    pub formula_name: Option<String>,
    pub add_on_ids: Vec<String>,

    pub base_price: Decimal,
    pub size_price: Decimal,
    pub formula_price: Decimal,
    pub add_ons_price: Decimal,

    pub base_duration_minutes: u32,
    pub size_duration_minutes: u32,
    pub formula_duration_minutes: u32,
    pub add_ons_duration_minutes: u32,
}

impl QuoteLine {
    /// `None` if the contributions exceed what a `Decimal` can hold.
    pub fn total_price(&self) -> Option<Decimal> {
        self.base_price
            .checked_add(self.size_price)?
            .checked_add(self.formula_price)?
            .checked_add(self.add_ons_price)
    }

    /// `None` if the contributions do not fit in `u32` minutes.
    pub fn total_duration_minutes(&self) -> Option<u32> {
        self.base_duration_minutes
            .checked_add(self.size_duration_minutes)?
            .checked_add(self.formula_duration_minutes)?
            .checked_add(self.add_ons_duration_minutes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookingQuote {
    pub total_price: Decimal,
    pub total_duration_minutes: u32,
    pub breakdown: Vec<QuoteLine>,
}

impl BookingQuote {
    /// Quote for an empty selection.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.breakdown.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub lines: Vec<CartLine>,
}
