use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{NOT_FOUND_NAME, RecordId};

/// Usage labels the server attaches to stocks.
pub mod usage {
    pub const MONEY: &str = "Money";
    pub const SALES: &str = "Sales";
    pub const PRODUCTION: &str = "Production";
    pub const CONSUMPTION: &str = "Consumption";
}

/// Who owns a stock: an industry or a social class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerType {
    Industry,
    Class,
    Unknown,
}

impl OwnerType {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Industry" | "industry" => Self::Industry,
            "Class" | "class" => Self::Class,
            _ => Self::Unknown,
        }
    }
}

/// Which magnitude of a stock a page should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayOption {
    #[default]
    Quantity,
    Value,
    Price,
}

/// A stock in the unified table, owned by either an industry or a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Stock {
    pub id: RecordId,
    pub simulation_id: RecordId,
    pub time_stamp: i64,
    pub username: String,
    pub owner_id: RecordId,
    pub commodity_id: RecordId,
    pub name: String,
    /// `Industry` or `Class`; see [`Stock::owner_kind`].
    pub owner_type: String,
    pub usage_type: String,
    pub size: f64,
    pub value: f64,
    pub price: f64,
    pub requirement: f64,
    pub demand: f64,
}

impl Stock {
    pub fn owner_kind(&self) -> OwnerType {
        OwnerType::from_label(&self.owner_type)
    }

    /// Stub of the URL that displays this stock's owner.
    pub fn owner_link_stub(&self) -> &'static str {
        match self.owner_kind() {
            OwnerType::Industry => "/industry",
            OwnerType::Class => "/class",
            OwnerType::Unknown => "unknown owner type",
        }
    }

    pub fn display_amount(&self, option: DisplayOption) -> f64 {
        match option {
            DisplayOption::Quantity => self.size,
            DisplayOption::Value => self.value,
            DisplayOption::Price => self.price,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.id == 0 && self.name == NOT_FOUND_NAME
    }
}

/// A stock owned by an industry, from the split `stocks/industry` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct IndustryStock {
    pub id: RecordId,
    pub simulation_id: RecordId,
    pub industry_id: RecordId,
    pub commodity_id: RecordId,
    pub username: String,
    pub name: String,
    pub usage_type: String,
    pub size: f64,
    pub value: f64,
    pub price: f64,
    pub requirement: f64,
    pub demand: f64,
}

/// A stock owned by a class, from the split `stocks/class` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClassStock {
    pub id: RecordId,
    pub simulation_id: RecordId,
    pub class_id: RecordId,
    pub commodity_id: RecordId,
    pub username: String,
    pub name: String,
    pub usage_type: String,
    pub size: f64,
    pub value: f64,
    pub price: f64,
}

/// Returned when a stock lookup fails. Magnitudes are negative so that a
/// misresolved stock is visibly wrong on screen.
pub static NOT_FOUND_STOCK: Lazy<Stock> = Lazy::new(|| Stock {
    name: NOT_FOUND_NAME.to_string(),
    owner_type: "PROGRAMME ERROR".to_string(),
    usage_type: "PROGRAMME ERROR".to_string(),
    size: -1.0,
    value: -1.0,
    price: -1.0,
    requirement: -1.0,
    demand: -1.0,
    ..Stock::default()
});
