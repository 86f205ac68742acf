use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use client_logging::{client_info, client_warn};
use docchat_core::{
    Citation, Effect, FailureKind, Msg, QueryFailure, QueryOutcome, NOTICE_TTL, QUERY_DEADLINE,
};
use docchat_engine::{EngineConfig, EngineEvent, EngineHandle, QueryFailureKind};

use crate::app::Inbox;

/// Executes core effects against the engine and feeds engine events back to
/// the main loop as messages.
pub struct EffectRunner {
    engine: EngineHandle,
    inbox_tx: mpsc::Sender<Inbox>,
}

impl EffectRunner {
    pub fn new(inbox_tx: mpsc::Sender<Inbox>) -> Self {
        let engine = EngineHandle::new(EngineConfig {
            query_deadline: QUERY_DEADLINE,
            ..EngineConfig::default()
        });
        let runner = Self { engine, inbox_tx };
        runner.spawn_event_loop();
        runner
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::IssueQuery {
                    session_id,
                    question,
                    scope,
                } => {
                    client_info!(
                        "IssueQuery session={} question_len={} scope_len={}",
                        session_id,
                        question.len(),
                        scope.len()
                    );
                    self.engine.ask(session_id, question, scope);
                }
                Effect::CancelQuery { session_id } => {
                    client_info!("CancelQuery session={}", session_id);
                    self.engine.cancel(session_id);
                }
                Effect::UploadFile { path } => self.engine.upload(path),
                Effect::RefreshDocuments => self.engine.list_documents(),
                Effect::ScheduleNoticeExpiry { notice_id } => {
                    let tx = self.inbox_tx.clone();
                    thread::spawn(move || {
                        thread::sleep(NOTICE_TTL);
                        let _ = tx.send(Inbox::Core(Msg::NoticeExpired { notice_id }));
                    });
                }
            }
        }
    }

    fn spawn_event_loop(&self) {
        let engine = self.engine.clone();
        let tx = self.inbox_tx.clone();
        thread::spawn(move || loop {
            if let Some(event) = engine.try_recv() {
                if tx.send(Inbox::Core(map_event(event))).is_err() {
                    break;
                }
            } else {
                thread::sleep(Duration::from_millis(20));
            }
        });
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::QuerySettled { session_id, result } => Msg::QuerySettled {
            session_id,
            result: result.map(map_outcome).map_err(map_failure),
        },
        EngineEvent::QueryDeadline { session_id } => Msg::QueryDeadlineElapsed { session_id },
        EngineEvent::UploadFinished { result } => {
            Msg::UploadFinished(result.map_err(|err| err.to_string()))
        }
        EngineEvent::DocumentsListed { result } => {
            Msg::DocumentsLoaded(result.map_err(|err| err.to_string()))
        }
    }
}

fn map_outcome(response: docchat_engine::QueryResponse) -> QueryOutcome {
    QueryOutcome {
        answer: response.answer,
        sources: response
            .sources
            .into_iter()
            .map(|snippet| Citation {
                document_label: snippet.document,
                excerpt: snippet.content,
            })
            .collect(),
    }
}

fn map_failure(error: docchat_engine::QueryError) -> QueryFailure {
    match error.kind {
        QueryFailureKind::Timeout => QueryFailure::timeout(),
        // Not logged as an application error: this is user intent.
        QueryFailureKind::Cancelled => QueryFailure {
            kind: FailureKind::Cancelled,
            message: None,
        },
        QueryFailureKind::Network => {
            client_warn!("query transport failure: {}", error.message);
            QueryFailure::server(None)
        }
        QueryFailureKind::Server { message } => {
            client_warn!("query endpoint failure: {}", error.message);
            QueryFailure::server(message)
        }
    }
}
