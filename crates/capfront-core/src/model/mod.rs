//! Records mirrored from the remote simulation server.
//!
//! Every record is keyed by a server-assigned integer id. Relationships are
//! foreign-key ids resolved by linear scan through a [`crate::snapshot::Snapshot`];
//! a key that does not resolve yields a sentinel record, never a panic.
//!
//! Decoding is tolerant of missing fields (`#[serde(default)]`) so that a
//! server adding or dropping a column does not turn into a decode failure.
//! [`decode_lenient`] extends that to columns the server sends as `null`.

mod economy;
mod simulation;
mod stock;
mod trace;
mod user;

use serde::de::DeserializeOwned;
use serde_json::Value;

pub use economy::{
    Class, Commodity, Industry, NOT_FOUND_CLASS, NOT_FOUND_COMMODITY, NOT_FOUND_INDUSTRY,
};
pub use simulation::{NOT_FOUND_SIMULATION, Simulation};
pub use stock::{
    ClassStock, DisplayOption, IndustryStock, NOT_FOUND_STOCK, OwnerType, Stock, usage,
};
pub use trace::Trace;
pub use user::{CloneResult, LoginRequest, ServerUserStatus, TokenResponse, UserSummary};

/// Server-assigned record identifier.
pub type RecordId = i64;

/// Name carried by every sentinel record.
pub const NOT_FOUND_NAME: &str = "NOT FOUND";

/// Decodes a JSON payload, treating `null` object members as absent.
///
/// Absent members then take their `#[serde(default)]` value, so a `null`
/// column decodes to the zero value instead of failing the whole payload.
pub fn decode_lenient<T: DeserializeOwned>(bytes: &[u8]) -> serde_json::Result<T> {
    let mut value: Value = serde_json::from_slice(bytes)?;
    strip_nulls(&mut value);
    serde_json::from_value(value)
}

fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(members) => {
            members.retain(|_, member| !member.is_null());
            members.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

/// Common access to a record's identity, used by generic lookups.
pub trait Keyed {
    fn id(&self) -> RecordId;
}

macro_rules! impl_keyed {
    ($($ty:ty),* $(,)?) => {
        $(impl Keyed for $ty {
            fn id(&self) -> RecordId {
                self.id
            }
        })*
    };
}

impl_keyed!(
    Simulation,
    Commodity,
    Industry,
    Class,
    Stock,
    IndustryStock,
    ClassStock,
    Trace,
);
