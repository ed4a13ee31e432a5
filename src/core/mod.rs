pub mod etl;
pub mod merge;
pub mod pipeline;
pub mod walker;

pub use crate::domain::model::{CompletionStatus, Extraction, OutputRow, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage, TableConnector};
pub use crate::utils::error::Result;
