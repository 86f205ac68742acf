//! Docchat core: pure session state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod upload;
mod view_model;

pub use effect::{Effect, NOTICE_TTL, QUERY_DEADLINE};
pub use msg::Msg;
pub use state::{
    AppState, Citation, FailureKind, NoticeId, NoticeSeverity, QueryFailure, QueryOutcome,
    SessionId, StatusNotice, Turn, TurnKind,
};
pub use update::update;
pub use upload::{validate_upload, MAX_UPLOAD_BYTES};
pub use view_model::{AppViewModel, CitationView, DocumentRow, StatusLine, TurnView, EXCERPT_BUDGET};
