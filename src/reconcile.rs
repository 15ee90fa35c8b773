//! Per-locale reconciliation pipeline and its orchestration.
//!
//! Every target locale is an independent unit of work: load → flatten →
//! diff → translate → rehydrate → write. Locale tasks run concurrently
//! and always settle into a [`ReconciliationResult`]; one locale's
//! failure never aborts its siblings. The report is assembled from the
//! settled outcomes and written once.

use std::path::Path;

use futures::StreamExt;
use futures::future;
use futures::stream;
use serde_json::Value;

use crate::batch::translate_missing;
use crate::config::{
    OutputMode,
    RunOptions,
};
use crate::diff::missing_entries;
use crate::error::{
    LocaleError,
    RunError,
};
use crate::provider::Translator;
use crate::report::{
    Report,
    ReportSection,
};
use crate::tree::{
    FlatKeyMap,
    flatten,
    rehydrate,
};

/// Per-locale outcome record.
#[derive(Debug)]
pub struct ReconciliationResult {
    pub locale: String,
    pub outcome: LocaleOutcome,
}

/// How a locale's pipeline ended.
#[derive(Debug)]
pub enum LocaleOutcome {
    /// Missing keys were translated and written out.
    Filled { keys: usize },
    /// No missing keys; the file was left as is.
    AlreadyComplete,
    /// The pipeline failed; the locale file was not modified.
    Failed(LocaleError),
}

/// Drives reconciliation of all selected target locales against one base.
#[derive(Debug)]
pub struct Reconciler<T> {
    translator: T,
    options: RunOptions,
}

impl<T: Translator> Reconciler<T> {
    #[must_use]
    pub fn new(translator: T, options: RunOptions) -> Self {
        Self { translator, options }
    }

    /// Run the full reconciliation and write the report.
    ///
    /// # Errors
    /// Only fatal conditions: an unusable base locale file, a failed
    /// output-directory creation, or a failed report write. Per-locale
    /// errors are recorded in the returned [`Report`] instead.
    pub async fn run(&self) -> Result<Report, RunError> {
        let base_tree = self.load_base_tree().await?;
        let base_map = flatten(&base_tree);
        tracing::info!(
            base = %self.options.base_locale,
            keys = base_map.len(),
            locales = self.options.locales.len(),
            "Starting reconciliation"
        );

        // Idempotent, once per run, before any locale task needs it.
        if self.options.output_mode == OutputMode::Copy {
            let dir = self.options.output_dir();
            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(|source| RunError::OutputDir { path: dir, source })?;
        }

        let tasks = self
            .options
            .locales
            .iter()
            .map(|locale| self.reconcile_locale(locale, &base_map));

        // Join-all-settled: every task yields a result, never an abort.
        let settled = match self.options.max_concurrency {
            Some(limit) if limit > 0 => {
                stream::iter(tasks).buffered(limit).collect::<Vec<_>>().await
            }
            _ => future::join_all(tasks).await,
        };

        let mut report = Report::new();
        for (result, section) in settled {
            report.push(result, section);
        }

        report.write(&self.options.report_path()).await?;
        Ok(report)
    }

    async fn load_base_tree(&self) -> Result<Value, RunError> {
        let path = self.options.base_path();
        if !path.exists() {
            return Err(RunError::BaseFileMissing { path });
        }
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| RunError::BaseFileRead { path: path.clone(), source })?;
        serde_json::from_str(&content).map_err(|source| RunError::BaseFileParse { path, source })
    }

    /// One locale's pipeline, with its error caught at this boundary.
    async fn reconcile_locale(
        &self,
        locale: &str,
        base_map: &FlatKeyMap,
    ) -> (ReconciliationResult, Option<ReportSection>) {
        match self.try_reconcile_locale(locale, base_map).await {
            Ok((outcome, section)) => {
                (ReconciliationResult { locale: locale.to_string(), outcome }, section)
            }
            Err(error) => {
                tracing::warn!(locale = %locale, error = %error, "Locale failed");
                (
                    ReconciliationResult {
                        locale: locale.to_string(),
                        outcome: LocaleOutcome::Failed(error),
                    },
                    None,
                )
            }
        }
    }

    async fn try_reconcile_locale(
        &self,
        locale: &str,
        base_map: &FlatKeyMap,
    ) -> Result<(LocaleOutcome, Option<ReportSection>), LocaleError> {
        let path = self.options.locale_path(locale);
        let mut tree = read_tree(&path).await?;
        let target_map = flatten(&tree);

        let missing = missing_entries(base_map, &target_map);
        if missing.is_empty() {
            tracing::info!(locale = %locale, "All keys are present");
            return Ok((LocaleOutcome::AlreadyComplete, None));
        }
        tracing::debug!(locale = %locale, missing = missing.len(), "Found missing keys");

        let translated = translate_missing(&self.translator, &missing, locale).await?;
        rehydrate(&mut tree, &translated)?;

        let output_path = self.options.output_path(locale);
        write_tree(&output_path, &tree).await?;
        tracing::info!(locale = %locale, path = %output_path.display(), "Locale file written");

        let section = ReportSection::from_translations(locale, &translated);
        Ok((LocaleOutcome::Filled { keys: translated.len() }, Some(section)))
    }
}

async fn read_tree(path: &Path) -> Result<Value, LocaleError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LocaleError::Read { path: path.to_path_buf(), source })?;
    serde_json::from_str(&content)
        .map_err(|source| LocaleError::Parse { path: path.to_path_buf(), source })
}

async fn write_tree(path: &Path, tree: &Value) -> Result<(), LocaleError> {
    let mut content = serde_json::to_string_pretty(tree)
        .map_err(|source| LocaleError::Write { path: path.to_path_buf(), source: std::io::Error::other(source) })?;
    content.push('\n');
    tokio::fs::write(path, content)
        .await
        .map_err(|source| LocaleError::Write { path: path.to_path_buf(), source })
}
