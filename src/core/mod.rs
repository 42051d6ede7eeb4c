pub mod batch;
pub mod client;
pub mod roster;

pub use crate::domain::model::{BatchSummary, RosterRecord, Strategy, TemplateDescriptor};
pub use crate::domain::ports::{ConfigProvider, Transport};
pub use crate::utils::error::Result;
