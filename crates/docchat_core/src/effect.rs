use std::time::Duration;

/// Wall-clock budget for a query session, measured from submit.
pub const QUERY_DEADLINE: Duration = Duration::from_secs(60);

/// How long a transient status notice stays visible before auto-clearing.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue the network query for a freshly admitted session. `scope` is the
    /// selection snapshot taken at submit time; it never changes mid-flight.
    IssueQuery {
        session_id: crate::SessionId,
        question: String,
        scope: Vec<String>,
    },
    /// Best-effort abort of the in-flight call for `session_id`.
    CancelQuery { session_id: crate::SessionId },
    /// Send a locally validated file to the upload endpoint.
    UploadFile { path: String },
    /// Refetch the available-documents listing.
    RefreshDocuments,
    /// Arrange for `Msg::NoticeExpired` after `NOTICE_TTL`.
    ScheduleNoticeExpiry { notice_id: crate::NoticeId },
}
