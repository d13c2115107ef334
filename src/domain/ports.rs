use crate::config::settings::{EngineSettings, ScanSettings};
use crate::domain::model::{Candidate, Person, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Human-readable location of `path`, used in logs and the engine's return value.
    fn locate(&self, path: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn concurrent_requests(&self) -> usize;
    fn scan_settings(&self) -> ScanSettings;
    fn engine_settings(&self) -> EngineSettings;
}

/// One query string in, raw hits out. Which engine sits behind it is irrelevant to the core.
#[async_trait]
pub trait SearchGateway: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Candidate>>;
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: SearchGateway + ?Sized> SearchGateway for Box<T> {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Candidate>> {
        (**self).search(query, max_results).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Candidates collected for one person across all of their queries, in discovery order.
#[derive(Debug, Clone)]
pub struct PersonCandidates {
    pub person: Person,
    pub candidates: Vec<Candidate>,
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<PersonCandidates>>;
    async fn transform(&self, data: Vec<PersonCandidates>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
