//! Corpus loader
//!
//! Scans one skills directory and parses every skill document it finds.

use crate::document::parse_document;
use crate::error::{CorpusError, Result};
use skillaudit_types::{Corpus, Degradation, SkillDocument};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File name of a skill inside its own directory
pub const SKILL_FILE: &str = "SKILL.md";

/// Loader for a directory of skill documents
#[derive(Debug, Clone)]
pub struct CorpusLoader {
    /// Directory to scan
    root: PathBuf,
    /// Skill file looked up inside each subdirectory
    skill_file: String,
}

impl CorpusLoader {
    /// Create a loader for `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            skill_file: SKILL_FILE.to_string(),
        }
    }

    /// Use a different per-directory skill file name
    pub fn with_skill_file(mut self, name: impl Into<String>) -> Self {
        self.skill_file = name.into();
        self
    }

    /// Read and parse the whole corpus
    ///
    /// Fails only when the root directory itself cannot be listed.
    pub fn load(&self) -> Result<Corpus> {
        info!("Loading skills from {}", self.root.display());

        let mut corpus = Corpus::new(&self.root);

        for (id, path) in self.discover()? {
            let (document, degradations) = read_document(&id, &path);

            if !degradations.is_empty() {
                debug!("Skill '{}' degraded: {:?}", id, degradations);
            }

            if !corpus.insert(document, degradations) {
                warn!(
                    "Duplicate skill identifier '{}' at {}, keeping the first one",
                    id,
                    path.display()
                );
            }
        }

        info!(
            "Loaded {} skills ({} degraded)",
            corpus.len(),
            corpus.degraded().len()
        );
        Ok(corpus)
    }

    /// List candidate documents in sorted path order
    fn discover(&self) -> Result<Vec<(String, PathBuf)>> {
        if !self.root.exists() {
            return Err(CorpusError::NotFound(self.root.clone()));
        }
        if !self.root.is_dir() {
            return Err(CorpusError::NotADirectory(self.root.clone()));
        }

        let unreadable = |source| CorpusError::Unreadable {
            path: self.root.clone(),
            source,
        };

        let mut paths = fs::read_dir(&self.root)
            .map_err(unreadable)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(unreadable)?;
        paths.sort();

        let mut candidates = Vec::new();

        for path in paths {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                debug!("Skipping non UTF-8 path {:?}", path);
                continue;
            };
            if name.starts_with('.') {
                continue;
            }

            if path.is_dir() {
                let skill_file = path.join(&self.skill_file);
                if skill_file.is_file() {
                    candidates.push((name.to_string(), skill_file));
                } else {
                    debug!("Skipping {:?}: no {}", path, self.skill_file);
                }
            } else if is_markdown(&path) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    candidates.push((stem.to_string(), path.clone()));
                }
            }
        }

        debug!("Discovered {} skill files", candidates.len());
        Ok(candidates)
    }
}

/// Load a corpus from `root` with default settings
pub fn load_corpus(root: impl AsRef<Path>) -> Result<Corpus> {
    CorpusLoader::new(root.as_ref()).load()
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md"))
}

/// Read one document; read failures degrade instead of failing the batch
fn read_document(id: &str, path: &Path) -> (SkillDocument, Vec<Degradation>) {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            let (document, mut degradations) = parse_document(id, path, String::new());
            degradations.insert(
                0,
                Degradation::Unreadable {
                    reason: e.to_string(),
                },
            );
            return (document, degradations);
        }
    };

    match String::from_utf8(bytes) {
        Ok(raw) => parse_document(id, path, raw),
        Err(e) => {
            warn!("{} is not valid UTF-8, replacing invalid bytes", path.display());
            let raw = String::from_utf8_lossy(e.as_bytes()).into_owned();
            let (document, mut degradations) = parse_document(id, path, raw);
            degradations.insert(0, Degradation::InvalidUtf8);
            (document, degradations)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_markdown() {
        assert!(is_markdown(Path::new("skills/linter.md")));
        assert!(is_markdown(Path::new("skills/README.MD")));
        assert!(!is_markdown(Path::new("skills/notes.txt")));
        assert!(!is_markdown(Path::new("skills/Makefile")));
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let result = CorpusLoader::new("/definitely/not/a/skills/dir").load();
        assert!(matches!(result, Err(CorpusError::NotFound(_))));
    }
}
