//! `{{NAME}}` placeholder templates
//!
//! Substitution is a single left-to-right pass over the template text.
//! Substituted values are copied verbatim and never rescanned, and a
//! placeholder with no value is left in the output untouched.

use crate::error::{ReportError, Result};
use crate::kind::ReportKind;
use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Values for the placeholders of one report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    values: BTreeMap<String, String>,
}

impl Placeholders {
    /// Empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Values every report carries: generation date and time, version, skill count
    #[must_use]
    pub fn common(num_skills: usize, at: &DateTime<Local>) -> Self {
        let mut values = Self::new();
        values
            .set("GENERATION_DATE", at.format("%Y-%m-%d"))
            .set("GENERATION_TIME", at.format("%H:%M:%S"))
            .set("VERSION", env!("CARGO_PKG_VERSION"))
            .set("NUM_SKILLS", num_skills);
        values
    }

    /// Set `name` (without braces), replacing any previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl Display) -> &mut Self {
        self.values.insert(name.into(), value.to_string());
        self
    }

    /// Value of `name`, if set
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Take every value from `other`
    pub fn extend(&mut self, other: Placeholders) -> &mut Self {
        self.values.extend(other.values);
        self
    }

    /// Number of values set
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no value is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Replace every known `{{NAME}}` in `template`
#[must_use]
pub fn substitute(template: &str, values: &Placeholders) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];

        let replaced = candidate[OPEN.len()..].find(CLOSE).and_then(|end| {
            let name = &candidate[OPEN.len()..OPEN.len() + end];
            values
                .get(name)
                .map(|value| (value, OPEN.len() + end + CLOSE.len()))
        });

        match replaced {
            Some((value, consumed)) => {
                out.push_str(value);
                rest = &candidate[consumed..];
            }
            None => {
                // Not a known token; move on by one brace so "{{{NAME}}" still matches
                out.push('{');
                rest = &candidate[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// A template file loaded from disk
#[derive(Debug, Clone)]
pub struct Template {
    path: PathBuf,
    text: String,
}

impl Template {
    /// Load the template for `kind` from `dir`
    pub fn load(dir: &Path, kind: ReportKind) -> Result<Self> {
        let path = dir.join(kind.template_file());
        let text = fs::read_to_string(&path).map_err(|source| ReportError::TemplateMissing {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path, text })
    }

    /// Where the template was read from
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render with `values`
    #[must_use]
    pub fn render(&self, values: &Placeholders) -> String {
        substitute(&self.text, values)
    }
}
