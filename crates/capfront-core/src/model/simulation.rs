use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{NOT_FOUND_NAME, RecordId};
use crate::circuit::SimulationState;

/// An individual simulation owned by one user, or a template shared by all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Simulation {
    pub id: RecordId,
    pub name: String,
    pub time_stamp: i64,
    pub username: String,
    /// Advisory circuit label, see [`crate::circuit`].
    pub state: String,
    pub periods_per_year: f64,
    pub population_growth_rate: f64,
    pub investment_ratio: f64,
    #[serde(rename = "labour_supply_response")]
    pub labour_supply_demand: String,
    pub price_response_type: String,
    pub melt_response_type: String,
    pub currency_symbol: String,
    pub quantity_symbol: String,
    pub melt: f64,
    #[serde(rename = "user_id")]
    pub user: RecordId,
}

impl Simulation {
    /// The parsed circuit stage of this simulation.
    pub fn stage(&self) -> SimulationState {
        SimulationState::from_label(&self.state)
    }

    pub fn set_stage(&mut self, stage: SimulationState) {
        self.state = stage.as_str().to_string();
    }

    /// Relative link that clones this template for the current user.
    pub fn clone_link(&self) -> String {
        format!("/user/create/{}", self.id)
    }
}

/// Returned when a simulation id does not resolve.
pub static NOT_FOUND_SIMULATION: Lazy<Simulation> = Lazy::new(|| Simulation {
    name: NOT_FOUND_NAME.to_string(),
    state: SimulationState::Unknown.as_str().to_string(),
    ..Simulation::default()
});
