//! Docchat engine: network collaborators and effect execution.
mod documents;
mod engine;
mod query;
mod types;
mod upload;

pub use documents::{DocumentListClient, ListError};
pub use engine::{EngineConfig, EngineHandle};
pub use query::{QueryClient, QuerySettings, ReqwestQueryClient, FALLBACK_ANSWER};
pub use types::{EngineEvent, QueryError, QueryFailureKind, QueryResponse, SessionId, SourceSnippet};
pub use upload::{ReqwestUploadClient, UploadError, UploadSettings};
