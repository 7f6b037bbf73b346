use crate::api::FileEntry;
use crate::error::Error;
use crate::panels::Generation;

/// A content fetch started by a selection. `dir` is the resolved path
/// payload; `None` is sent to the backend as an explicit null rather than
/// rejected client-side.
#[derive(Debug, PartialEq, Eq)]
pub struct CodeFetch {
    pub seq: u64,
    pub dir: Option<String>,
}

/// Code-viewer state: the backend file listing, the current selection, and
/// the fetched file text.
///
/// While a content fetch is in flight the viewer shows only a loading
/// indicator, never stale content, so the text is cleared when the fetch
/// begins. An empty string therefore means "not yet fetched" and is
/// indistinguishable from a fetched empty file.
#[derive(Debug, Default)]
pub struct ViewerPanel {
    entries: Vec<FileEntry>,
    selected: Option<usize>,
    content: String,
    loading: bool,
    loading_files: bool,
    files_gen: Generation,
    code_gen: Generation,
}

impl ViewerPanel {
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.entries.get(i))
            .map(|e| e.name.as_str())
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn loading_files(&self) -> bool {
        self.loading_files
    }

    /// Case-sensitive exact-match lookup of a display name. Duplicate names
    /// resolve to the first entry.
    pub fn lookup_path(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.path.as_str())
    }

    pub fn begin_files_fetch(&mut self) -> u64 {
        self.loading_files = true;
        self.files_gen.begin()
    }

    /// Apply a settled file-listing fetch. The selection survives a reload
    /// only if the same display name is still listed.
    pub fn apply_files(
        &mut self,
        seq: u64,
        result: Result<Vec<FileEntry>, Error>,
    ) -> Option<Error> {
        if !self.files_gen.accepts(seq) {
            return None;
        }
        self.loading_files = false;
        match result {
            Ok(entries) => {
                let kept = self
                    .selected_name()
                    .map(str::to_string)
                    .and_then(|name| entries.iter().position(|e| e.name == name));
                self.entries = entries;
                self.selected = kept;
                None
            }
            Err(err) => Some(err),
        }
    }

    /// Select a display name and start a content fetch for it.
    pub fn begin_fetch_by_name(&mut self, name: &str) -> CodeFetch {
        self.selected = self.entries.iter().position(|e| e.name == name);
        self.content.clear();
        self.loading = true;
        let dir = self.lookup_path(name).map(str::to_string);
        CodeFetch {
            seq: self.code_gen.begin(),
            dir,
        }
    }

    /// Apply a settled content fetch. On failure the viewer stays cleared
    /// (it was emptied when the fetch began).
    pub fn apply_content(&mut self, seq: u64, result: Result<String, Error>) -> Option<Error> {
        if !self.code_gen.accepts(seq) {
            return None;
        }
        self.loading = false;
        match result {
            Ok(text) => {
                self.content = text;
                None
            }
            Err(err) => Some(err),
        }
    }
}
