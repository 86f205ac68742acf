#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the question composer.
    InputChanged(String),
    /// User submitted the composer contents as a question.
    QuestionSubmitted,
    /// User clicked Stop while a query was pending.
    StopClicked,
    /// The transport settled the query issued for `session_id`.
    QuerySettled {
        session_id: crate::SessionId,
        result: Result<crate::QueryOutcome, crate::QueryFailure>,
    },
    /// The controller-level wait budget for `session_id` ran out.
    QueryDeadlineElapsed { session_id: crate::SessionId },
    /// User toggled a document in or out of the query scope.
    DocumentToggled(String),
    /// A fresh document listing arrived (or failed to).
    DocumentsLoaded(Result<Vec<String>, String>),
    /// User picked a file to upload; the shell supplies its size.
    UploadPicked { path: String, byte_len: u64 },
    /// The upload settled on the wire.
    UploadFinished(Result<String, String>),
    /// A scheduled status-notice expiry fired.
    NoticeExpired { notice_id: crate::NoticeId },
    /// Fallback for placeholder wiring.
    NoOp,
}
