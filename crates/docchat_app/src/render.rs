//! Plain terminal rendering of the view model. Reads state, never mutates it.

use docchat_core::{AppViewModel, TurnKind};

pub fn welcome() {
    println!("docchat - ask questions about your documents");
    command_help();
}

pub fn command_help() {
    println!("commands: /select <doc>  /docs  /upload <path>  /stop  /quit");
    println!("anything else is submitted as a question against the selected documents");
}

pub fn local_error(message: &str) {
    eprintln!("! {message}");
}

pub fn render(view: &AppViewModel) {
    println!();
    if !view.documents.is_empty() {
        println!("documents:");
        for row in &view.documents {
            let mark = if row.selected { "x" } else { " " };
            println!("  [{mark}] {}", row.label);
        }
    }

    for turn in &view.transcript {
        match turn.kind {
            TurnKind::Question => println!("you> {}", turn.text),
            TurnKind::Answer => {
                println!("bot> {}", turn.text);
                for source in &turn.sources {
                    println!("     [{}] {}", source.document_label, source.excerpt);
                }
            }
        }
    }

    if let Some(status) = &view.status {
        if status.is_error {
            println!("!! {}", status.text);
        } else {
            println!("-- {}", status.text);
        }
    }

    if view.busy {
        println!("(waiting for answer; /stop to cancel)");
    }
}
