use crate::upload::validate_upload;
use crate::{AppState, Effect, FailureKind, Msg, NoticeSeverity, QueryFailure};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::QuestionSubmitted => {
            let question = state.input().trim().to_string();
            // Admission: non-empty question, non-empty scope, nothing pending.
            if question.is_empty() || state.selection().is_empty() || state.is_pending() {
                return (state, Vec::new());
            }
            let scope: Vec<String> = state.selection().iter().cloned().collect();
            state.clear_notice();
            state.push_question(question.clone());
            let session_id = state.begin_session();
            vec![Effect::IssueQuery {
                session_id,
                question,
                scope,
            }]
        }
        Msg::StopClicked => {
            let Some(session_id) = state.end_session() else {
                return (state, Vec::new());
            };
            // The question turn disappears immediately; the network abort is
            // best-effort cleanup, not a precondition.
            state.pop_question();
            let notice_id = state.set_notice("Response generation stopped", NoticeSeverity::Info);
            vec![
                Effect::CancelQuery { session_id },
                Effect::ScheduleNoticeExpiry { notice_id },
            ]
        }
        Msg::QuerySettled { session_id, result } => {
            if !state.is_live(session_id) {
                // Stale settlement: the session was cancelled, timed out, or
                // superseded. Discard unconditionally.
                return (state, Vec::new());
            }
            state.end_session();
            match result {
                Ok(outcome) => {
                    state.push_answer(outcome.answer, outcome.sources);
                    state.clear_notice();
                    state.set_input(String::new());
                    Vec::new()
                }
                Err(failure) => settle_failure(&mut state, &failure),
            }
        }
        Msg::QueryDeadlineElapsed { session_id } => {
            if !state.is_live(session_id) {
                return (state, Vec::new());
            }
            state.end_session();
            let mut effects = settle_failure(&mut state, &QueryFailure::timeout());
            // The transport may still be waiting; ask it to give up.
            effects.push(Effect::CancelQuery { session_id });
            effects
        }
        Msg::DocumentToggled(label) => {
            state.toggle_selection(label);
            Vec::new()
        }
        Msg::DocumentsLoaded(Ok(documents)) => {
            state.set_documents(documents);
            Vec::new()
        }
        Msg::DocumentsLoaded(Err(_)) => {
            let notice_id = state.set_notice("Failed to fetch documents", NoticeSeverity::Error);
            vec![Effect::ScheduleNoticeExpiry { notice_id }]
        }
        Msg::UploadPicked { path, byte_len } => match validate_upload(&path, byte_len) {
            Ok(()) => vec![Effect::UploadFile { path }],
            Err(reason) => {
                // Rejected locally; no network round trip happens.
                let notice_id = state.set_notice(reason, NoticeSeverity::Error);
                vec![Effect::ScheduleNoticeExpiry { notice_id }]
            }
        },
        Msg::UploadFinished(Ok(message)) => {
            let notice_id = state.set_notice(message, NoticeSeverity::Info);
            vec![
                Effect::ScheduleNoticeExpiry { notice_id },
                Effect::RefreshDocuments,
            ]
        }
        Msg::UploadFinished(Err(message)) => {
            let notice_id = state.set_notice(format!("Error: {message}"), NoticeSeverity::Error);
            vec![Effect::ScheduleNoticeExpiry { notice_id }]
        }
        Msg::NoticeExpired { notice_id } => {
            state.expire_notice(notice_id);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Rollback shared by failure, timeout, and (defensively) late cancel acks:
/// the provisional question turn is removed and the failure becomes a
/// transient status line instead of a transcript entry.
fn settle_failure(state: &mut AppState, failure: &QueryFailure) -> Vec<Effect> {
    state.pop_question();
    let severity = match failure.kind {
        // A cancellation is user intent, never a server-style error.
        FailureKind::Cancelled => NoticeSeverity::Info,
        _ => NoticeSeverity::Error,
    };
    let notice_id = state.set_notice(failure.user_message(), severity);
    vec![Effect::ScheduleNoticeExpiry { notice_id }]
}
