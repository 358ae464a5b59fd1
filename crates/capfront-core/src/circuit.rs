//! The coarse action circuit a simulation moves through.
//!
//! `DEMAND → SUPPLY → TRADE → PRODUCE → CONSUME → INVEST → DEMAND`
//!
//! The label kept locally is advisory: it mirrors the server's own state field
//! and is advanced optimistically after an action. Nothing may use it to make
//! access-control decisions; the server is authoritative and the label is
//! overwritten whenever simulations are re-fetched.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which phase of the circuit a simulation is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SimulationState {
    Demand,
    Supply,
    Trade,
    Produce,
    Consume,
    Invest,
    /// Fallback for unrecognized verbs and unparseable server labels.
    Unknown,
}

impl SimulationState {
    /// All circuit stages in order, excluding `Unknown`.
    pub const CIRCUIT: [SimulationState; 6] = [
        SimulationState::Demand,
        SimulationState::Supply,
        SimulationState::Trade,
        SimulationState::Produce,
        SimulationState::Consume,
        SimulationState::Invest,
    ];

    /// The stage that follows this one. `Unknown` stays `Unknown`.
    pub fn next(self) -> Self {
        match self {
            Self::Demand => Self::Supply,
            Self::Supply => Self::Trade,
            Self::Trade => Self::Produce,
            Self::Produce => Self::Consume,
            Self::Consume => Self::Invest,
            Self::Invest => Self::Demand,
            Self::Unknown => Self::Unknown,
        }
    }

    pub fn is_circuit_stage(self) -> bool {
        self != Self::Unknown
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Demand => "DEMAND",
            Self::Supply => "SUPPLY",
            Self::Trade => "TRADE",
            Self::Produce => "PRODUCE",
            Self::Consume => "CONSUME",
            Self::Invest => "INVEST",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Parses a server label leniently; anything unrecognized is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for SimulationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimulationState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEMAND" => Ok(Self::Demand),
            "SUPPLY" => Ok(Self::Supply),
            "TRADE" => Ok(Self::Trade),
            "PRODUCE" => Ok(Self::Produce),
            "CONSUME" => Ok(Self::Consume),
            "INVEST" => Ok(Self::Invest),
            "UNKNOWN" => Ok(Self::Unknown),
            other => Err(format!("unknown simulation state '{}'", other)),
        }
    }
}

/// A user-initiated circuit command sent to `action/{verb}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionVerb {
    Demand,
    Supply,
    Trade,
    Produce,
    Consume,
    Invest,
}

impl ActionVerb {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Demand => "demand",
            Self::Supply => "supply",
            Self::Trade => "trade",
            Self::Produce => "produce",
            Self::Consume => "consume",
            Self::Invest => "invest",
        }
    }

    /// The circuit stage this verb executes.
    pub fn stage(self) -> SimulationState {
        match self {
            Self::Demand => SimulationState::Demand,
            Self::Supply => SimulationState::Supply,
            Self::Trade => SimulationState::Trade,
            Self::Produce => SimulationState::Produce,
            Self::Consume => SimulationState::Consume,
            Self::Invest => SimulationState::Invest,
        }
    }

    /// Confirmation shown to the user once the action and refresh succeeded.
    pub fn confirmation(self) -> &'static str {
        match self {
            Self::Demand => "Demand complete",
            Self::Supply => "Supply complete",
            Self::Trade => "Trade complete",
            Self::Produce => "Production complete",
            Self::Consume => "Consumption complete",
            Self::Invest => "Investment complete",
        }
    }
}

impl FromStr for ActionVerb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "demand" => Ok(Self::Demand),
            "supply" => Ok(Self::Supply),
            "trade" => Ok(Self::Trade),
            "produce" => Ok(Self::Produce),
            "consume" => Ok(Self::Consume),
            "invest" => Ok(Self::Invest),
            other => Err(format!("unrecognized action verb '{}'", other)),
        }
    }
}

impl fmt::Display for ActionVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
