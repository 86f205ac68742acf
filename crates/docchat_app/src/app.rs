use std::io::BufRead;
use std::sync::mpsc;
use std::thread;

use client_logging::client_info;
use docchat_core::{update, AppState, Effect, Msg};

use crate::effects::EffectRunner;
use crate::render;

/// Everything the main loop can receive: core messages plus the two intents
/// the presentation layer handles itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbox {
    Core(Msg),
    RefreshDocuments,
    Quit,
}

pub fn run() -> anyhow::Result<()> {
    let (inbox_tx, inbox_rx) = mpsc::channel::<Inbox>();
    let runner = EffectRunner::new(inbox_tx.clone());
    spawn_stdin_reader(inbox_tx);

    // Populate the document panel before the first prompt.
    runner.run(vec![Effect::RefreshDocuments]);
    render::welcome();

    let mut state = AppState::new();
    while let Ok(inbox) = inbox_rx.recv() {
        match inbox {
            Inbox::Core(msg) => {
                let (next, effects) = update(std::mem::take(&mut state), msg);
                state = next;
                runner.run(effects);
                if state.consume_dirty() {
                    render::render(&state.view());
                }
            }
            Inbox::RefreshDocuments => runner.run(vec![Effect::RefreshDocuments]),
            Inbox::Quit => break,
        }
    }

    client_info!("docchat exiting");
    Ok(())
}

fn spawn_stdin_reader(tx: mpsc::Sender<Inbox>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                let _ = tx.send(Inbox::Quit);
                return;
            };
            for inbox in parse_line(&line) {
                if tx.send(inbox).is_err() {
                    return;
                }
            }
        }
        let _ = tx.send(Inbox::Quit);
    });
}

/// Maps one input line to inbox entries. Plain text becomes a question
/// submission; `/`-prefixed lines are commands.
fn parse_line(line: &str) -> Vec<Inbox> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if let Some(rest) = trimmed.strip_prefix('/') {
        let (command, argument) = rest.split_once(' ').unwrap_or((rest, ""));
        let argument = argument.trim();
        return match command {
            "quit" | "exit" => vec![Inbox::Quit],
            "stop" => vec![Inbox::Core(Msg::StopClicked)],
            "docs" => vec![Inbox::RefreshDocuments],
            "select" if !argument.is_empty() => {
                vec![Inbox::Core(Msg::DocumentToggled(argument.to_string()))]
            }
            "upload" if !argument.is_empty() => upload_intent(argument),
            _ => {
                render::command_help();
                Vec::new()
            }
        };
    }

    vec![
        Inbox::Core(Msg::InputChanged(trimmed.to_string())),
        Inbox::Core(Msg::QuestionSubmitted),
    ]
}

fn upload_intent(path: &str) -> Vec<Inbox> {
    match std::fs::metadata(path) {
        Ok(metadata) => vec![Inbox::Core(Msg::UploadPicked {
            path: path.to_string(),
            byte_len: metadata.len(),
        })],
        Err(err) => {
            render::local_error(&format!("cannot read {path}: {err}"));
            Vec::new()
        }
    }
}
