use std::path::{Path, PathBuf};

/// Outcome for one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Unchanged,
    /// Reformatted, or would be under `--check`/`--diff`.
    Changed,
    Error,
}

#[derive(Debug, Clone)]
pub struct FileResult {
    pub path: PathBuf,
    pub status: FileStatus,
    pub error: Option<String>,
}

impl FileResult {
    pub fn new(path: &Path, status: FileStatus) -> Self {
        Self {
            path: path.to_path_buf(),
            status,
            error: None,
        }
    }

    pub fn error(path: &Path, message: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            status: FileStatus::Error,
            error: Some(message.into()),
        }
    }
}

/// Per-file results of one `run`.
#[derive(Debug, Default)]
pub struct Report {
    pub results: Vec<FileResult>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, result: FileResult) {
        self.results.push(result);
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    fn count(&self, status: FileStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    pub fn unchanged(&self) -> usize {
        self.count(FileStatus::Unchanged)
    }

    pub fn changed(&self) -> usize {
        self.count(FileStatus::Changed)
    }

    pub fn errors(&self) -> usize {
        self.count(FileStatus::Error)
    }

    pub fn has_errors(&self) -> bool {
        self.errors() > 0
    }

    pub fn has_changes(&self) -> bool {
        self.changed() > 0
    }

    /// One-line summary, e.g. `3 file(s) processed, 1 reformatted, 2 unchanged`.
    ///
    /// `check` switches the wording to what would happen.
    pub fn summary(&self, check: bool) -> String {
        let mut parts = vec![format!("{} file(s) processed", self.total())];
        if self.changed() > 0 {
            let verb = if check { "would be reformatted" } else { "reformatted" };
            parts.push(format!("{} {}", self.changed(), verb));
        }
        if self.unchanged() > 0 {
            parts.push(format!("{} unchanged", self.unchanged()));
        }
        if self.errors() > 0 {
            parts.push(format!("{} error(s)", self.errors()));
        }
        parts.join(", ")
    }

    pub fn print_errors(&self) {
        for result in &self.results {
            if let Some(ref error) = result.error {
                eprintln!("error: {}: {}", result.path.display(), error);
            }
        }
    }

    /// Exit code for the binary: 2 on any error, 1 when `check` found changes.
    pub fn exit_code(&self, check: bool) -> i32 {
        if self.has_errors() {
            2
        } else if check && self.has_changes() {
            1
        } else {
            0
        }
    }
}
