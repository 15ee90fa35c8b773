//! Run configuration resolved before the orchestrator starts.

use std::path::{
    Path,
    PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};

/// Default base locale, by convention the reconciliation reference.
pub const DEFAULT_BASE_LOCALE: &str = "en";

/// Name of the sibling directory used in copy mode.
pub const OUTPUT_SUBDIR: &str = "translated";

/// Where rehydrated trees are written, chosen once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputMode {
    /// Overwrite each locale file in place.
    Replace,
    /// Write same-named files into the `translated/` subdirectory.
    Copy,
}

/// Fully resolved parameters for one reconciliation run.
///
/// The interactive selection surface (or flags) produces this; the
/// orchestrator has no interactive dependency.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory containing one `<locale>.json` file per locale.
    pub directory: PathBuf,

    /// Reference locale whose key set defines completeness.
    pub base_locale: String,

    /// Target locales to reconcile, without the base.
    pub locales: Vec<String>,

    pub output_mode: OutputMode,

    /// Upper bound on simultaneous provider calls. `None` = unbounded.
    pub max_concurrency: Option<usize>,
}

impl RunOptions {
    /// Path of a locale's input file.
    #[must_use]
    pub fn locale_path(&self, locale: &str) -> PathBuf {
        self.directory.join(format!("{locale}.json"))
    }

    /// Path of the base locale file.
    #[must_use]
    pub fn base_path(&self) -> PathBuf {
        self.locale_path(&self.base_locale)
    }

    /// Output path for a locale, per the run's output mode.
    #[must_use]
    pub fn output_path(&self, locale: &str) -> PathBuf {
        match self.output_mode {
            OutputMode::Replace => self.locale_path(locale),
            OutputMode::Copy => self.output_dir().join(format!("{locale}.json")),
        }
    }

    /// The copy-mode output directory.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.directory.join(OUTPUT_SUBDIR)
    }

    /// Path of the run report.
    #[must_use]
    pub fn report_path(&self) -> PathBuf {
        self.directory.join("translation_log.md")
    }
}

/// List the locale codes available in `directory`, excluding the base.
///
/// A locale is any `*.json` file; the code is the file stem.
///
/// # Errors
/// Propagates directory read errors.
pub fn available_locales(directory: &Path, base_locale: &str) -> std::io::Result<Vec<String>> {
    let mut locales = Vec::new();
    for entry in std::fs::read_dir(directory)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json")
            && let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().to_string())
            && stem != base_locale
        {
            locales.push(stem);
        }
    }
    locales.sort();
    Ok(locales)
}
