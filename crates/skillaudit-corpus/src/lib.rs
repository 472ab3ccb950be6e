//! `SkillAudit` Corpus Loader
//!
//! Reads a directory of skill documents into an immutable [`Corpus`].
//!
//! ## Layout
//!
//! - `<root>/<skill-name>/SKILL.md` (identifier: the directory name)
//! - `<root>/<skill-name>.md` (identifier: the file stem)
//!
//! ## Degradation
//!
//! Only a missing or unreadable root directory is an error. Anything wrong
//! inside a single document (no metadata block, unterminated block, missing
//! sections, invalid UTF-8) is recorded as a [`Degradation`] and the document
//! is kept with empty fields.
//!
//! [`Degradation`]: skillaudit_types::Degradation

#![deny(unsafe_code, dead_code, unused_imports, unused_variables, missing_docs)]

pub mod document;
pub mod error;
pub mod loader;

pub use document::parse_document;
pub use error::CorpusError;
pub use loader::{load_corpus, CorpusLoader};
pub use skillaudit_types::Corpus;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{load_corpus, Corpus, CorpusError, CorpusLoader};
}
