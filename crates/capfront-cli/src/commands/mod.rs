pub mod bootstrap;
pub mod status;
pub mod utils;
