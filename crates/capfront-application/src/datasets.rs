//! Declarative dataset table.
//!
//! Each row names a remote table, the relative path it is fetched from and the
//! decoder that moves it into its target store. Adding a dataset means adding
//! a row here; the fetcher iterates rows generically.

use capfront_core::config::ClientConfig;
use capfront_core::directory::RegistryData;
use capfront_core::model::decode_lenient;
use capfront_core::snapshot::Snapshot;
use serde::de::DeserializeOwned;

/// Decodes a payload into a snapshot field and returns the record count.
pub type SnapshotDecoder = fn(&[u8], &mut Snapshot) -> serde_json::Result<usize>;

/// Decodes a payload into a registry field and returns the record count.
pub type RegistryDecoder = fn(&[u8], &mut RegistryData) -> serde_json::Result<usize>;

/// Where a decoded dataset lands.
#[derive(Clone, Copy)]
pub enum DatasetTarget {
    /// A field of the requesting user's snapshot.
    Snapshot(SnapshotDecoder),
    /// A field of the process-wide admin registry.
    Registry(RegistryDecoder),
}

/// One row of a dataset table.
#[derive(Clone, Copy)]
pub struct DatasetSpec {
    pub name: &'static str,
    pub path: &'static str,
    pub target: DatasetTarget,
}

impl DatasetSpec {
    pub const fn snapshot(name: &'static str, path: &'static str, decode: SnapshotDecoder) -> Self {
        Self {
            name,
            path,
            target: DatasetTarget::Snapshot(decode),
        }
    }

    pub const fn registry(name: &'static str, path: &'static str, decode: RegistryDecoder) -> Self {
        Self {
            name,
            path,
            target: DatasetTarget::Registry(decode),
        }
    }

    pub fn is_registry(&self) -> bool {
        matches!(self.target, DatasetTarget::Registry(_))
    }
}

impl std::fmt::Debug for DatasetSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetSpec")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("registry", &self.is_registry())
            .finish()
    }
}

/// Decodes the whole payload first and only then swaps it in, so a decode
/// failure leaves the previous contents untouched. `[]` is a valid payload.
fn replace<T: DeserializeOwned>(bytes: &[u8], field: &mut Vec<T>) -> serde_json::Result<usize> {
    let records: Vec<T> = decode_lenient(bytes)?;
    let count = records.len();
    *field = records;
    Ok(count)
}

fn simulations(bytes: &[u8], snapshot: &mut Snapshot) -> serde_json::Result<usize> {
    replace(bytes, &mut snapshot.simulations)
}

fn commodities(bytes: &[u8], snapshot: &mut Snapshot) -> serde_json::Result<usize> {
    replace(bytes, &mut snapshot.commodities)
}

fn industries(bytes: &[u8], snapshot: &mut Snapshot) -> serde_json::Result<usize> {
    replace(bytes, &mut snapshot.industries)
}

fn classes(bytes: &[u8], snapshot: &mut Snapshot) -> serde_json::Result<usize> {
    replace(bytes, &mut snapshot.classes)
}

fn stocks(bytes: &[u8], snapshot: &mut Snapshot) -> serde_json::Result<usize> {
    replace(bytes, &mut snapshot.stocks)
}

fn industry_stocks(bytes: &[u8], snapshot: &mut Snapshot) -> serde_json::Result<usize> {
    replace(bytes, &mut snapshot.industry_stocks)
}

fn class_stocks(bytes: &[u8], snapshot: &mut Snapshot) -> serde_json::Result<usize> {
    replace(bytes, &mut snapshot.class_stocks)
}

fn traces(bytes: &[u8], snapshot: &mut Snapshot) -> serde_json::Result<usize> {
    replace(bytes, &mut snapshot.traces)
}

fn templates(bytes: &[u8], registry: &mut RegistryData) -> serde_json::Result<usize> {
    replace(bytes, &mut registry.templates)
}

fn user_directory(bytes: &[u8], registry: &mut RegistryData) -> serde_json::Result<usize> {
    replace(bytes, &mut registry.users)
}

pub const SIMULATION: DatasetSpec =
    DatasetSpec::snapshot("simulation", "simulations/mine", simulations);
pub const COMMODITY: DatasetSpec = DatasetSpec::snapshot("commodity", "commodities/", commodities);
pub const INDUSTRY: DatasetSpec = DatasetSpec::snapshot("industry", "industries/", industries);
pub const CLASS: DatasetSpec = DatasetSpec::snapshot("class", "classes/", classes);
pub const STOCK: DatasetSpec = DatasetSpec::snapshot("stock", "stocks/", stocks);
pub const INDUSTRY_STOCK: DatasetSpec =
    DatasetSpec::snapshot("industryStock", "stocks/industry", industry_stocks);
pub const CLASS_STOCK: DatasetSpec =
    DatasetSpec::snapshot("classStock", "stocks/class", class_stocks);
pub const TRACE: DatasetSpec = DatasetSpec::snapshot("trace", "trace/", traces);
pub const TEMPLATE: DatasetSpec =
    DatasetSpec::registry("template", "simulations/templates", templates);
pub const USER_DIRECTORY: DatasetSpec =
    DatasetSpec::registry("userDirectory", "users/", user_directory);

/// Per-user refresh with the unified stock table.
pub const USER_DATASETS: &[DatasetSpec] = &[SIMULATION, COMMODITY, INDUSTRY, CLASS, STOCK, TRACE];

/// Per-user refresh for servers that split stocks by owner type.
pub const SPLIT_STOCK_USER_DATASETS: &[DatasetSpec] = &[
    SIMULATION,
    COMMODITY,
    INDUSTRY,
    CLASS,
    INDUSTRY_STOCK,
    CLASS_STOCK,
    TRACE,
];

/// Process-wide tables only the admin identity refreshes.
pub const ADMIN_DATASETS: &[DatasetSpec] = &[TEMPLATE, USER_DIRECTORY];

const ALL_DATASETS: &[DatasetSpec] = &[
    TEMPLATE,
    USER_DIRECTORY,
    SIMULATION,
    COMMODITY,
    INDUSTRY,
    CLASS,
    STOCK,
    INDUSTRY_STOCK,
    CLASS_STOCK,
    TRACE,
];

/// The per-user table matching the configured stock layout.
pub fn user_datasets_for(config: &ClientConfig) -> &'static [DatasetSpec] {
    if config.split_stock_tables {
        SPLIT_STOCK_USER_DATASETS
    } else {
        USER_DATASETS
    }
}

/// Looks up any known dataset by name.
pub fn by_name(name: &str) -> Option<DatasetSpec> {
    ALL_DATASETS
        .iter()
        .find(|dataset| dataset.name == name)
        .copied()
}
