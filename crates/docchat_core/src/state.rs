use std::collections::BTreeSet;

use crate::view_model::{AppViewModel, CitationView, DocumentRow, StatusLine, TurnView};

/// Opaque identity of one submit-to-settle lifecycle. A settlement carrying a
/// stale id must never touch the transcript or the status notice.
pub type SessionId = u64;

/// Identity of one transient status notice, used to ignore stale expiries.
pub type NoticeId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnKind {
    Question,
    Answer,
}

/// One transcript entry: a submitted question or a produced answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub kind: TurnKind,
    pub text: String,
    /// Citations backing an answer; always empty for questions.
    pub sources: Vec<Citation>,
}

/// An evidence snippet with its originating document label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub document_label: String,
    pub excerpt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusNotice {
    pub id: NoticeId,
    pub text: String,
    pub severity: NoticeSeverity,
}

/// Successful settlement payload delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    pub answer: String,
    pub sources: Vec<Citation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The wait budget elapsed before the transport settled.
    Timeout,
    /// The endpoint reported an error, or the call never reached it.
    Server,
    /// The transport acknowledged an abort. Normally filtered out by the
    /// session guard before it gets here.
    Cancelled,
}

/// Failed settlement payload delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFailure {
    pub kind: FailureKind,
    /// Server-provided message, when the payload carried one.
    pub message: Option<String>,
}

impl QueryFailure {
    pub fn timeout() -> Self {
        Self {
            kind: FailureKind::Timeout,
            message: None,
        }
    }

    pub fn server(message: Option<String>) -> Self {
        Self {
            kind: FailureKind::Server,
            message,
        }
    }

    /// Human-readable status line for this failure.
    pub fn user_message(&self) -> String {
        match self.kind {
            FailureKind::Timeout => "Request timed out. Please try again.".to_string(),
            FailureKind::Server => self
                .message
                .clone()
                .unwrap_or_else(|| "Failed to get response".to_string()),
            FailureKind::Cancelled => "Response generation stopped".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    input: String,
    transcript: Vec<Turn>,
    status: Option<StatusNotice>,
    live_session: Option<SessionId>,
    selected: BTreeSet<String>,
    documents: Vec<String>,
    next_session_id: SessionId,
    next_notice_id: NoticeId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let transcript = self
            .transcript
            .iter()
            .map(|turn| TurnView {
                kind: turn.kind,
                text: turn.text.clone(),
                sources: turn.sources.iter().map(CitationView::from_citation).collect(),
            })
            .collect();
        let documents = self
            .documents
            .iter()
            .map(|label| DocumentRow {
                label: label.clone(),
                selected: self.selected.contains(label),
            })
            .collect();
        AppViewModel {
            input: self.input.clone(),
            transcript,
            status: self.status.as_ref().map(|notice| StatusLine {
                text: notice.text.clone(),
                is_error: notice.severity == NoticeSeverity::Error,
            }),
            busy: self.live_session.is_some(),
            documents,
            can_submit: !self.input.trim().is_empty()
                && !self.selected.is_empty()
                && self.live_session.is_none(),
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is needed and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn status(&self) -> Option<&StatusNotice> {
        self.status.as_ref()
    }

    pub fn selection(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_pending(&self) -> bool {
        self.live_session.is_some()
    }

    pub fn is_live(&self, session_id: SessionId) -> bool {
        self.live_session == Some(session_id)
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.dirty = true;
        }
    }

    pub(crate) fn toggle_selection(&mut self, label: String) {
        if !self.selected.remove(&label) {
            self.selected.insert(label);
        }
        self.dirty = true;
    }

    pub(crate) fn set_documents(&mut self, documents: Vec<String>) {
        self.documents = documents;
        self.dirty = true;
    }

    /// Admits a new session and returns its fresh id. Caller must have
    /// checked that no session is live.
    pub(crate) fn begin_session(&mut self) -> SessionId {
        debug_assert!(self.live_session.is_none());
        self.next_session_id += 1;
        let id = self.next_session_id;
        self.live_session = Some(id);
        self.dirty = true;
        id
    }

    /// Clears the live session, returning its id if one existed.
    pub(crate) fn end_session(&mut self) -> Option<SessionId> {
        let id = self.live_session.take();
        if id.is_some() {
            self.dirty = true;
        }
        id
    }

    pub(crate) fn push_question(&mut self, text: String) {
        self.transcript.push(Turn {
            kind: TurnKind::Question,
            text,
            sources: Vec::new(),
        });
        self.dirty = true;
    }

    pub(crate) fn push_answer(&mut self, text: String, sources: Vec<Citation>) {
        self.transcript.push(Turn {
            kind: TurnKind::Answer,
            text,
            sources,
        });
        self.dirty = true;
    }

    /// Rolls back the provisional question turn of the settling session.
    pub(crate) fn pop_question(&mut self) {
        debug_assert!(matches!(
            self.transcript.last().map(|turn| turn.kind),
            Some(TurnKind::Question)
        ));
        self.transcript.pop();
        self.dirty = true;
    }

    pub(crate) fn set_notice(&mut self, text: impl Into<String>, severity: NoticeSeverity) -> NoticeId {
        self.next_notice_id += 1;
        let id = self.next_notice_id;
        self.status = Some(StatusNotice {
            id,
            text: text.into(),
            severity,
        });
        self.dirty = true;
        id
    }

    pub(crate) fn clear_notice(&mut self) {
        if self.status.take().is_some() {
            self.dirty = true;
        }
    }

    /// Clears the notice only if `notice_id` still identifies it; expiries
    /// for superseded notices are ignored.
    pub(crate) fn expire_notice(&mut self, notice_id: NoticeId) {
        if self.status.as_ref().is_some_and(|notice| notice.id == notice_id) {
            self.status = None;
            self.dirty = true;
        }
    }
}
