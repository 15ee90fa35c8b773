//! The run report: one markdown document assembled once at run end.
//!
//! Locale tasks complete in any order, so each one contributes a whole
//! [`ReportSection`] as a value and the report is assembled after all of
//! them have settled. There is no shared mutable accumulator to interleave.

use std::path::Path;

use crate::error::RunError;
use crate::reconcile::{
    LocaleOutcome,
    ReconciliationResult,
};
use crate::tree::FlatKeyMap;

/// Key/translation table for one locale that had fills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    pub locale: String,
    pub entries: Vec<(String, String)>,
}

impl ReportSection {
    /// Build a section from a translated flat map, keeping its key order.
    #[must_use]
    pub fn from_translations(locale: &str, translated: &FlatKeyMap) -> Self {
        let entries = translated
            .iter()
            .map(|(key, value)| {
                let text = value.as_str().map_or_else(|| value.to_string(), str::to_string);
                (key.clone(), text)
            })
            .collect();
        Self { locale: locale.to_string(), entries }
    }
}

/// The complete run report.
#[derive(Debug, Default)]
pub struct Report {
    results: Vec<ReconciliationResult>,
    sections: Vec<ReportSection>,
}

impl Report {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a locale's outcome and, when it filled keys, its section.
    pub fn push(&mut self, result: ReconciliationResult, section: Option<ReportSection>) {
        self.results.push(result);
        if let Some(section) = section {
            self.sections.push(section);
        }
    }

    #[must_use]
    pub fn results(&self) -> &[ReconciliationResult] {
        &self.results
    }

    /// Whether any locale failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.results.iter().any(|r| matches!(r.outcome, LocaleOutcome::Failed(_)))
    }

    /// Render the report as markdown: a status line per requested locale,
    /// then one key/translation table per locale that had fills.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::from("# Generated Translations\n\n");

        for result in &self.results {
            let line = match &result.outcome {
                LocaleOutcome::Filled { keys } => {
                    format!("- `{}`: filled {keys} missing key(s)\n", result.locale)
                }
                LocaleOutcome::AlreadyComplete => {
                    format!("- `{}`: already complete, nothing to do\n", result.locale)
                }
                LocaleOutcome::Failed(error) => {
                    format!("- `{}`: FAILED: {error}\n", result.locale)
                }
            };
            out.push_str(&line);
        }
        out.push('\n');

        for section in &self.sections {
            out.push_str(&format!("## Translations for locale: `{}`\n\n", section.locale));
            out.push_str("| Key | Translation |\n|-----|-------------|\n");
            for (key, translation) in &section.entries {
                out.push_str(&format!(
                    "| {} | {} |\n",
                    escape_cell(key),
                    escape_cell(translation)
                ));
            }
            out.push_str("\n---\n\n");
        }

        out
    }

    /// Persist the report, once, at run end.
    ///
    /// # Errors
    /// [`RunError::ReportWrite`] if the file cannot be written.
    pub async fn write(&self, path: &Path) -> Result<(), RunError> {
        tracing::debug!(path = %path.display(), "Writing report");
        tokio::fs::write(path, self.to_markdown())
            .await
            .map_err(|source| RunError::ReportWrite { path: path.to_path_buf(), source })
    }
}

/// A literal `|` in a cell would end the markdown table column early.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::error::LocaleError;
    use crate::tree::flatten;

    fn result(locale: &str, outcome: LocaleOutcome) -> ReconciliationResult {
        ReconciliationResult { locale: locale.to_string(), outcome }
    }

    #[googletest::test]
    fn lists_every_requested_locale_once() {
        let mut report = Report::new();
        report.push(result("es", LocaleOutcome::Filled { keys: 2 }), None);
        report.push(result("fr", LocaleOutcome::AlreadyComplete), None);
        report.push(
            result(
                "de",
                LocaleOutcome::Failed(LocaleError::BatchMisaligned { sent: 3, received: 2 }),
            ),
            None,
        );

        let markdown = report.to_markdown();

        expect_that!(markdown.as_str(), contains_substring("- `es`: filled 2 missing key(s)"));
        expect_that!(markdown.as_str(), contains_substring("- `fr`: already complete"));
        expect_that!(markdown.as_str(), contains_substring("- `de`: FAILED"));
        expect_that!(markdown.matches("- `").count(), eq(3));
    }

    #[googletest::test]
    fn sections_render_key_translation_tables() {
        let translated = flatten(&json!({ "c": "Mundo", "d": { "e": "Hola" } }));
        let section = ReportSection::from_translations("es", &translated);

        let mut report = Report::new();
        report.push(result("es", LocaleOutcome::Filled { keys: 2 }), Some(section));

        let markdown = report.to_markdown();

        expect_that!(markdown.as_str(), contains_substring("## Translations for locale: `es`"));
        expect_that!(markdown.as_str(), contains_substring("| Key | Translation |"));
        expect_that!(markdown.as_str(), contains_substring("| c | Mundo |"));
        expect_that!(markdown.as_str(), contains_substring("| d.e | Hola |"));
    }

    #[googletest::test]
    fn pipe_characters_in_cells_are_escaped() {
        let translated = flatten(&json!({ "menu|item": "Uno | Dos" }));
        let section = ReportSection::from_translations("es", &translated);

        let mut report = Report::new();
        report.push(result("es", LocaleOutcome::Filled { keys: 1 }), Some(section));

        let markdown = report.to_markdown();

        expect_that!(markdown.as_str(), contains_substring("| menu\\|item | Uno \\| Dos |"));
    }

    #[googletest::test]
    fn has_failures_reflects_outcomes() {
        let mut report = Report::new();
        report.push(result("es", LocaleOutcome::Filled { keys: 1 }), None);
        expect_that!(report.has_failures(), eq(false));

        report.push(
            result("de", LocaleOutcome::Failed(LocaleError::StructuralConflict { path: "a".into() })),
            None,
        );
        expect_that!(report.has_failures(), eq(true));
    }
}
