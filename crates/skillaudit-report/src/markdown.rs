//! Markdown fragments shared by the renderers

/// Placeholder text for an empty table or list
pub const NONE: &str = "None";

/// A pipe table with a header row
#[derive(Debug, Clone)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Table with the given column titles
    #[must_use]
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append one row
    pub fn push<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.rows
            .push(cells.into_iter().map(|cell| cell.to_string()).collect());
    }

    /// Whether no rows were pushed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the table, or `empty` when it has no rows
    #[must_use]
    pub fn render_or(&self, empty: &str) -> String {
        if self.is_empty() {
            return empty.to_string();
        }

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(row(&self.header));
        lines.push(format!("|{}", "---|".repeat(self.header.len())));
        lines.extend(self.rows.iter().map(|cells| row(cells)));
        lines.join("\n")
    }
}

fn row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

/// `count` as a whole percentage of `total` (0 when `total` is 0)
#[must_use]
pub fn percent(count: usize, total: usize) -> usize {
    if total == 0 {
        0
    } else {
        count * 100 / total
    }
}

/// Comma-separated list, or [`NONE`]
#[must_use]
pub fn list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let items: Vec<String> = items
        .into_iter()
        .map(|item| item.as_ref().to_string())
        .collect();
    if items.is_empty() {
        NONE.to_string()
    } else {
        items.join(", ")
    }
}

/// Check or cross mark
#[must_use]
pub fn mark(yes: bool) -> &'static str {
    if yes {
        "✓"
    } else {
        "✗"
    }
}
