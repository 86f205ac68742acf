use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use client_logging::{client_info, client_warn};
use tokio_util::sync::CancellationToken;

use crate::documents::DocumentListClient;
use crate::query::{QueryClient, QuerySettings, ReqwestQueryClient};
use crate::upload::{ReqwestUploadClient, UploadSettings};
use crate::{EngineEvent, SessionId};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub query: QuerySettings,
    pub upload: UploadSettings,
    /// Controller-level wait budget per query; fires `QueryDeadline` if the
    /// transport has not settled by then.
    pub query_deadline: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            query: QuerySettings::default(),
            upload: UploadSettings::default(),
            query_deadline: Duration::from_secs(60),
        }
    }
}

enum EngineCommand {
    Ask {
        session_id: SessionId,
        question: String,
        scope: Vec<String>,
    },
    CancelAsk {
        session_id: SessionId,
    },
    Upload {
        path: PathBuf,
    },
    ListDocuments,
}

type LiveSessions = Arc<Mutex<HashMap<SessionId, CancellationToken>>>;

/// Handle to the engine thread. Commands go in, settlement events come out;
/// the caller polls `try_recv` from its own loop.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || run_engine(config, cmd_rx, event_tx));

        Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        }
    }

    pub fn ask(&self, session_id: SessionId, question: impl Into<String>, scope: Vec<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Ask {
            session_id,
            question: question.into(),
            scope,
        });
    }

    pub fn cancel(&self, session_id: SessionId) {
        let _ = self.cmd_tx.send(EngineCommand::CancelAsk { session_id });
    }

    pub fn upload(&self, path: impl Into<PathBuf>) {
        let _ = self.cmd_tx.send(EngineCommand::Upload { path: path.into() });
    }

    pub fn list_documents(&self) {
        let _ = self.cmd_tx.send(EngineCommand::ListDocuments);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx
            .lock()
            .ok()
            .and_then(|rx| rx.try_recv().ok())
    }
}

fn run_engine(
    config: EngineConfig,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let list_client = Arc::new(DocumentListClient::new(config.query.endpoint.clone()));
    let query_client = Arc::new(ReqwestQueryClient::new(config.query));
    let upload_client = Arc::new(ReqwestUploadClient::new(config.upload));
    let live: LiveSessions = Arc::default();

    while let Ok(command) = cmd_rx.recv() {
        match command {
            EngineCommand::Ask {
                session_id,
                question,
                scope,
            } => {
                let cancel = CancellationToken::new();
                live.lock()
                    .expect("live sessions lock")
                    .insert(session_id, cancel.clone());

                let client = query_client.clone();
                let tx = event_tx.clone();
                let sessions = live.clone();
                runtime.spawn(async move {
                    let result = client.ask(&question, &scope, &cancel).await;
                    sessions
                        .lock()
                        .expect("live sessions lock")
                        .remove(&session_id);
                    if let Err(err) = &result {
                        client_info!("query session {} settled: {}", session_id, err.kind);
                    }
                    let _ = tx.send(EngineEvent::QuerySettled { session_id, result });
                });

                let tx = event_tx.clone();
                let sessions = live.clone();
                let deadline = config.query_deadline;
                runtime.spawn(async move {
                    tokio::time::sleep(deadline).await;
                    // Only report if the ask is still outstanding.
                    let outstanding = sessions
                        .lock()
                        .expect("live sessions lock")
                        .contains_key(&session_id);
                    if outstanding {
                        client_warn!("query session {} hit the {:?} deadline", session_id, deadline);
                        let _ = tx.send(EngineEvent::QueryDeadline { session_id });
                    }
                });
            }
            EngineCommand::CancelAsk { session_id } => {
                let token = live
                    .lock()
                    .expect("live sessions lock")
                    .remove(&session_id);
                match token {
                    Some(token) => token.cancel(),
                    None => {
                        client_info!("cancel for session {} arrived after settle", session_id)
                    }
                }
            }
            EngineCommand::Upload { path } => {
                let client = upload_client.clone();
                let tx = event_tx.clone();
                runtime.spawn(async move {
                    let result = client.upload(&path).await;
                    let _ = tx.send(EngineEvent::UploadFinished { result });
                });
            }
            EngineCommand::ListDocuments => {
                let client = list_client.clone();
                let tx = event_tx.clone();
                runtime.spawn(async move {
                    let result = client.list().await;
                    let _ = tx.send(EngineEvent::DocumentsListed { result });
                });
            }
        }
    }
}
