//! Command line surface and interactive selection.
//!
//! Everything interactive happens here; the orchestrator only ever sees a
//! fully resolved [`RunOptions`].

use std::path::PathBuf;

use clap::Parser;
use inquire::list_option::ListOption;
use inquire::validator::Validation;
use inquire::{
    InquireError,
    MultiSelect,
    Select,
};
use thiserror::Error;

use crate::config::{
    DEFAULT_BASE_LOCALE,
    OUTPUT_SUBDIR,
    OutputMode,
    RunOptions,
    available_locales,
};

#[derive(Error, Debug)]
pub enum CliError {
    #[error("directory does not exist: {0}")]
    DirectoryMissing(PathBuf),

    #[error("failed to read directory: {0}")]
    DirectoryRead(#[from] std::io::Error),

    #[error("no locale files other than the base were found in {0}")]
    NoTargetLocales(PathBuf),

    #[error("unknown locale '{0}': no matching .json file in the directory")]
    UnknownLocale(String),

    #[error("prompt failed: {0}")]
    Prompt(#[from] InquireError),
}

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Fill missing translation keys in locale JSON files from a base locale",
    long_about = None
)]
pub struct Cli {
    /// Directory containing one JSON file per locale
    pub directory: PathBuf,

    /// Base locale whose key set defines completeness
    #[clap(long, value_name = "LOCALE", default_value = DEFAULT_BASE_LOCALE)]
    pub base: String,

    /// Target locales to process; prompts interactively when omitted
    #[clap(long, value_name = "LOCALES", value_delimiter = ',')]
    pub locales: Vec<String>,

    /// Overwrite the original locale files
    #[clap(long, conflicts_with = "copy")]
    pub replace: bool,

    /// Write results into the output subdirectory instead
    #[clap(long)]
    pub copy: bool,

    /// DeepL API key
    #[clap(long, env = "DEEPL_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Maximum number of simultaneous translation requests
    #[clap(long, value_name = "N")]
    pub max_concurrency: Option<usize>,
}

/// A fully resolved run, ready to hand to the orchestrator.
#[derive(Debug)]
pub struct ResolvedRun {
    pub options: RunOptions,
    pub api_key: String,
}

impl Cli {
    /// Resolve arguments into run options, prompting for whatever was not
    /// given on the command line.
    ///
    /// # Errors
    /// Missing directory, no target locales, unknown locale names, or a
    /// failed/cancelled prompt.
    pub fn resolve(self) -> Result<ResolvedRun, CliError> {
        if !self.directory.is_dir() {
            return Err(CliError::DirectoryMissing(self.directory));
        }

        let available = available_locales(&self.directory, &self.base)?;
        if available.is_empty() {
            return Err(CliError::NoTargetLocales(self.directory));
        }

        let locales = if self.locales.is_empty() {
            prompt_locales(&available)?
        } else {
            for locale in &self.locales {
                if !available.contains(locale) {
                    return Err(CliError::UnknownLocale(locale.clone()));
                }
            }
            self.locales
        };

        let output_mode = if self.replace {
            OutputMode::Replace
        } else if self.copy {
            OutputMode::Copy
        } else {
            prompt_output_mode()?
        };

        Ok(ResolvedRun {
            options: RunOptions {
                directory: self.directory,
                base_locale: self.base,
                locales,
                output_mode,
                max_concurrency: self.max_concurrency,
            },
            api_key: self.api_key,
        })
    }
}

fn prompt_locales(available: &[String]) -> Result<Vec<String>, CliError> {
    let selected = MultiSelect::new("Select locales to process:", available.to_vec())
        .with_validator(|answer: &[ListOption<&String>]| {
            if answer.is_empty() {
                Ok(Validation::Invalid("You must select at least one locale.".into()))
            } else {
                Ok(Validation::Valid)
            }
        })
        .prompt()?;
    Ok(selected)
}

fn prompt_output_mode() -> Result<OutputMode, CliError> {
    const REPLACE: &str = "Replace the original files";
    let copy_label = format!("Write copies into a '{OUTPUT_SUBDIR}/' directory");

    let choice = Select::new(
        "How should the updated files be written?",
        vec![REPLACE.to_string(), copy_label],
    )
    .prompt()?;

    if choice == REPLACE { Ok(OutputMode::Replace) } else { Ok(OutputMode::Copy) }
}
