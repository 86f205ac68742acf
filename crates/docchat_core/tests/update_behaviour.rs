use std::sync::Once;

use docchat_core::{
    update, AppState, Citation, Effect, Msg, NoticeSeverity, QueryFailure, QueryOutcome, TurnKind,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

fn with_selection(labels: &[&str]) -> AppState {
    let mut state = AppState::new();
    for label in labels {
        let (next, _) = update(state, Msg::DocumentToggled(label.to_string()));
        state = next;
    }
    state
}

fn submit_question(state: AppState, text: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::InputChanged(text.to_string()));
    update(state, Msg::QuestionSubmitted)
}

fn issued_session(effects: &[Effect]) -> docchat_core::SessionId {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::IssueQuery { session_id, .. } => Some(*session_id),
            _ => None,
        })
        .expect("issue effect")
}

#[test]
fn submit_appends_question_and_issues_query() {
    init_logging();
    let state = with_selection(&["doc1", "doc2"]);
    let (mut state, effects) = submit_question(state, "  What is X?  ");

    assert_eq!(state.transcript().len(), 1);
    assert_eq!(state.transcript()[0].kind, TurnKind::Question);
    assert_eq!(state.transcript()[0].text, "What is X?");
    assert!(state.is_pending());
    assert_eq!(
        effects,
        vec![Effect::IssueQuery {
            session_id: 1,
            question: "What is X?".to_string(),
            scope: vec!["doc1".to_string(), "doc2".to_string()],
        }]
    );
    assert!(state.consume_dirty());
}

#[test]
fn blank_question_or_empty_scope_is_rejected() {
    init_logging();
    // Whitespace-only question.
    let state = with_selection(&["doc1"]);
    let (state, effects) = submit_question(state, "   \n ");
    assert!(state.transcript().is_empty());
    assert!(!state.is_pending());
    assert!(effects.is_empty());

    // Empty scope.
    let (state, effects) = submit_question(AppState::new(), "What is X?");
    assert!(state.transcript().is_empty());
    assert!(!state.is_pending());
    assert!(effects.is_empty());
}

#[test]
fn stop_removes_exactly_one_turn_and_reports_it() {
    init_logging();
    let state = with_selection(&["doc1"]);
    let (state, effects) = submit_question(state, "What is X?");
    let session_id = issued_session(&effects);
    assert_eq!(state.transcript().len(), 1);

    let (state, effects) = update(state, Msg::StopClicked);
    assert!(state.transcript().is_empty());
    assert!(!state.is_pending());
    let notice = state.status().expect("status notice");
    assert_eq!(notice.text, "Response generation stopped");
    assert_eq!(notice.severity, NoticeSeverity::Info);
    assert!(effects.contains(&Effect::CancelQuery { session_id }));
}

#[test]
fn stop_without_pending_query_is_a_noop() {
    init_logging();
    let state = with_selection(&["doc1"]);
    let before = state.clone();
    let (state, effects) = update(state, Msg::StopClicked);
    assert_eq!(state, before);
    assert!(effects.is_empty());
}

#[test]
fn success_appends_answer_with_sources_and_clears_input() {
    init_logging();
    let state = with_selection(&["doc1"]);
    let (state, effects) = submit_question(state, "What is X?");
    let session_id = issued_session(&effects);

    let sources = vec![Citation {
        document_label: "doc1".to_string(),
        excerpt: "X is a thing.".to_string(),
    }];
    let (state, effects) = update(
        state,
        Msg::QuerySettled {
            session_id,
            result: Ok(QueryOutcome {
                answer: "X is 42.".to_string(),
                sources: sources.clone(),
            }),
        },
    );

    assert_eq!(state.transcript().len(), 2);
    assert_eq!(state.transcript()[0].kind, TurnKind::Question);
    assert_eq!(state.transcript()[1].kind, TurnKind::Answer);
    assert_eq!(state.transcript()[1].text, "X is 42.");
    assert_eq!(state.transcript()[1].sources, sources);
    assert!(state.status().is_none());
    assert!(!state.is_pending());
    assert_eq!(state.input(), "");
    assert!(effects.is_empty());
}

#[test]
fn failure_rolls_back_question_and_surfaces_server_message() {
    init_logging();
    let state = with_selection(&["doc1"]);
    let (state, effects) = submit_question(state, "What is X?");
    let session_id = issued_session(&effects);

    let (state, effects) = update(
        state,
        Msg::QuerySettled {
            session_id,
            result: Err(QueryFailure::server(Some("Query failed: boom".to_string()))),
        },
    );

    assert!(state.transcript().is_empty());
    assert!(!state.is_pending());
    let notice = state.status().expect("status notice");
    assert_eq!(notice.text, "Query failed: boom");
    assert_eq!(notice.severity, NoticeSeverity::Error);
    assert!(matches!(
        effects.as_slice(),
        [Effect::ScheduleNoticeExpiry { .. }]
    ));
}

#[test]
fn failure_without_server_message_uses_generic_fallback() {
    init_logging();
    let state = with_selection(&["doc1"]);
    let (state, effects) = submit_question(state, "What is X?");
    let session_id = issued_session(&effects);

    let (state, _) = update(
        state,
        Msg::QuerySettled {
            session_id,
            result: Err(QueryFailure::server(None)),
        },
    );
    assert_eq!(state.status().unwrap().text, "Failed to get response");
}

#[test]
fn notice_expiry_clears_only_the_matching_notice() {
    init_logging();
    let state = with_selection(&["doc1"]);
    let (state, effects) = submit_question(state, "What is X?");
    let session_id = issued_session(&effects);
    let (state, effects) = update(
        state,
        Msg::QuerySettled {
            session_id,
            result: Err(QueryFailure::server(None)),
        },
    );
    let stale_notice = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::ScheduleNoticeExpiry { notice_id } => Some(*notice_id),
            _ => None,
        })
        .expect("expiry effect");

    // A newer notice supersedes the failure message before its expiry fires.
    let (state, effects) = update(
        state,
        Msg::UploadFinished(Ok("Successfully uploaded notes.txt".to_string())),
    );
    let fresh_notice = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::ScheduleNoticeExpiry { notice_id } => Some(*notice_id),
            _ => None,
        })
        .expect("expiry effect");
    assert_ne!(stale_notice, fresh_notice);

    let (state, _) = update(state, Msg::NoticeExpired { notice_id: stale_notice });
    assert_eq!(
        state.status().unwrap().text,
        "Successfully uploaded notes.txt"
    );

    let (state, _) = update(state, Msg::NoticeExpired { notice_id: fresh_notice });
    assert!(state.status().is_none());
}

#[test]
fn toggling_a_document_twice_restores_membership() {
    init_logging();
    let state = with_selection(&["doc1"]);
    assert!(state.selection().contains("doc1"));

    let (state, _) = update(state, Msg::DocumentToggled("doc1".to_string()));
    assert!(state.selection().is_empty());

    let (state, _) = update(state, Msg::DocumentToggled("doc1".to_string()));
    assert!(state.selection().contains("doc1"));
}

#[test]
fn document_listing_replaces_rows_and_keeps_selection() {
    init_logging();
    let state = with_selection(&["doc1"]);
    let (mut state, effects) = update(
        state,
        Msg::DocumentsLoaded(Ok(vec!["doc1".to_string(), "doc2".to_string()])),
    );
    assert!(effects.is_empty());

    let view = state.view();
    assert_eq!(view.documents.len(), 2);
    assert!(view.documents[0].selected);
    assert!(!view.documents[1].selected);
    assert!(state.consume_dirty());
}
