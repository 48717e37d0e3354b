pub mod commands;
pub mod contracts;
pub mod error;
mod ingest;
pub mod migrations;
pub mod report;
pub mod setup;
pub mod state;

pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{ClientError, ClientResult};
pub use report::{AggregateRecord, NormalizeError, normalize, normalize_at};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
