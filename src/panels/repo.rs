use chrono::{DateTime, Local};

use crate::error::Error;
use crate::panels::Generation;
use crate::ui::TextInput;

/// Outcome of committing the URL field.
#[derive(Debug, PartialEq, Eq)]
pub enum IngestSubmit {
    /// Empty/whitespace URL; nothing is dispatched.
    Rejected,
    /// Dispatch a clone request for this URL.
    Dispatch(String),
}

/// Side-panel state: repository ingestion, file tree, and source summary.
///
/// Tree and source follow a stale-but-valid policy: a failed refresh leaves
/// the previous value untouched, and a completion for a superseded request
/// is discarded outright.
#[derive(Debug, Default)]
pub struct RepoPanel {
    pub url_input: TextInput,
    committed_url: String,
    tree: Vec<String>,
    source: String,
    tree_gen: Generation,
    source_gen: Generation,
    clones_in_flight: usize,
    last_refreshed: Option<DateTime<Local>>,
}

impl RepoPanel {
    /// Commit the URL field. There is deliberately no single-flight guard:
    /// two quick submissions dispatch two independent clone requests.
    pub fn submit_ingest(&mut self) -> IngestSubmit {
        let url = self.url_input.text().trim().to_string();
        if url.is_empty() {
            return IngestSubmit::Rejected;
        }
        self.committed_url = url.clone();
        self.clones_in_flight += 1;
        IngestSubmit::Dispatch(url)
    }

    pub fn clone_settled(&mut self) {
        self.clones_in_flight = self.clones_in_flight.saturating_sub(1);
    }

    pub fn committed_url(&self) -> &str {
        &self.committed_url
    }

    pub fn status_label(&self) -> String {
        match self.clones_in_flight {
            0 => "Idle".to_string(),
            1 => "Cloning".to_string(),
            n => format!("Cloning x{n}"),
        }
    }

    pub fn begin_tree_refresh(&mut self) -> u64 {
        self.tree_gen.begin()
    }

    pub fn begin_source_refresh(&mut self) -> u64 {
        self.source_gen.begin()
    }

    /// Apply a settled tree refresh. Returns the error for the caller to
    /// surface; `None` on success or when the completion was stale.
    pub fn apply_tree(&mut self, seq: u64, result: Result<Vec<String>, Error>) -> Option<Error> {
        if !self.tree_gen.accepts(seq) {
            return None;
        }
        match result {
            Ok(tree) => {
                self.tree = tree;
                self.last_refreshed = Some(Local::now());
                None
            }
            Err(err) => Some(err),
        }
    }

    /// Apply a settled source refresh; same contract as [`apply_tree`].
    ///
    /// [`apply_tree`]: RepoPanel::apply_tree
    pub fn apply_source(&mut self, seq: u64, result: Result<String, Error>) -> Option<Error> {
        if !self.source_gen.accepts(seq) {
            return None;
        }
        match result {
            Ok(source) => {
                self.source = source;
                None
            }
            Err(err) => Some(err),
        }
    }

    pub fn tree(&self) -> &[String] {
        &self.tree
    }

    pub fn tree_text(&self) -> String {
        self.tree.join("\n")
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Local>> {
        self.last_refreshed
    }
}
