//! Infrastructure adapters: the reqwest transport, configuration loading and
//! tracing setup.

pub mod config_service;
pub mod reqwest_transport;
pub mod telemetry;

pub use config_service::ConfigService;
pub use reqwest_transport::ReqwestTransport;
pub use telemetry::init_tracing;
