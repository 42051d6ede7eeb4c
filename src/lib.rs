pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::http::HttpTransport;
pub use crate::config::{CliConfig, ProvisionConfig};
pub use crate::core::batch::Provisioner;
pub use crate::core::client::BoardsClient;
pub use crate::domain::model::{BatchSummary, RosterRecord, Strategy};
pub use crate::utils::error::{ProvisionError, Result};
