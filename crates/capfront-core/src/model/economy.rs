use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{NOT_FOUND_NAME, RecordId};

/// For example means of production, labour power, consumption goods, money.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Commodity {
    pub id: RecordId,
    pub name: String,
    pub simulation_id: RecordId,
    pub time_stamp: i64,
    pub username: String,
    pub origin: String,
    pub usage: String,
    pub size: f64,
    pub total_value: f64,
    pub total_price: f64,
    pub unit_value: f64,
    pub unit_price: f64,
    pub turnover_time: f64,
    pub demand: f64,
    pub supply: f64,
    pub allocation_ratio: f64,
    pub display_order: f64,
    pub image_name: String,
    pub tooltip: String,
    pub monetarily_effective_demand: f64,
    pub investment_proportion: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Industry {
    pub id: RecordId,
    pub name: String,
    pub simulation_id: RecordId,
    pub time_stamp: i64,
    pub username: String,
    pub output: String,
    pub output_scale: f64,
    pub output_growth_rate: f64,
    pub initial_capital: f64,
    pub work_in_progress: f64,
    pub current_capital: f64,
    pub profit: f64,
    pub profit_rate: f64,
}

/// A social class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Class {
    pub id: RecordId,
    pub name: String,
    pub simulation_id: RecordId,
    pub time_stamp: i64,
    pub username: String,
    pub population: f64,
    pub participation_ratio: f64,
    pub consumption_ratio: f64,
    pub revenue: f64,
    pub assets: f64,
}

const UNDEFINED: &str = "UNDEFINED";

pub static NOT_FOUND_COMMODITY: Lazy<Commodity> = Lazy::new(|| Commodity {
    name: NOT_FOUND_NAME.to_string(),
    origin: UNDEFINED.to_string(),
    usage: UNDEFINED.to_string(),
    image_name: UNDEFINED.to_string(),
    tooltip: UNDEFINED.to_string(),
    ..Commodity::default()
});

pub static NOT_FOUND_INDUSTRY: Lazy<Industry> = Lazy::new(|| Industry {
    name: NOT_FOUND_NAME.to_string(),
    output: UNDEFINED.to_string(),
    ..Industry::default()
});

pub static NOT_FOUND_CLASS: Lazy<Class> = Lazy::new(|| Class {
    name: NOT_FOUND_NAME.to_string(),
    ..Class::default()
});
