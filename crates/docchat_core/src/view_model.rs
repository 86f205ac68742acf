use crate::{Citation, TurnKind};

/// Display budget for a citation excerpt, in bytes of UTF-8.
pub const EXCERPT_BUDGET: usize = 100;

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub input: String,
    pub transcript: Vec<TurnView>,
    pub status: Option<StatusLine>,
    /// True while a query is pending; the shell shows Stop instead of Ask.
    pub busy: bool,
    pub documents: Vec<DocumentRow>,
    pub can_submit: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnView {
    pub kind: TurnKind,
    pub text: String,
    pub sources: Vec<CitationView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRow {
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationView {
    pub document_label: String,
    /// Truncated to [`EXCERPT_BUDGET`] with an ellipsis marker.
    pub excerpt: String,
}

impl CitationView {
    pub(crate) fn from_citation(citation: &Citation) -> Self {
        Self {
            document_label: citation.document_label.clone(),
            excerpt: truncate_excerpt(&citation.excerpt),
        }
    }
}

fn truncate_excerpt(excerpt: &str) -> String {
    if excerpt.len() <= EXCERPT_BUDGET {
        return excerpt.to_string();
    }
    let mut end = EXCERPT_BUDGET;
    while end > 0 && !excerpt.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{ELLIPSIS}", &excerpt[..end])
}
