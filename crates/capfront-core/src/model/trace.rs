use serde::{Deserialize, Serialize};

use super::RecordId;

/// A server-generated record of what an action did, shown on the trace page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Trace {
    pub id: RecordId,
    pub simulation_id: RecordId,
    pub time_stamp: i64,
    pub username: String,
    pub level: i64,
    pub message: String,
}
