use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("persistence error: {0}")]
    Store(#[from] ideaforge_store::StoreError),
}
