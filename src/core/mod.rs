pub mod aggregate;
pub mod attribution;
pub mod audit;
pub mod dates;
pub mod etl;
pub mod merge;
pub mod queries;
pub mod report;
pub mod sources;

pub use crate::domain::model::{Candidate, TransformResult, ValidatedMention};
pub use crate::domain::ports::{ConfigProvider, Pipeline, SearchGateway, Storage};
pub use crate::utils::error::Result;
