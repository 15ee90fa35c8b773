//! Entry point for the locale-sync CLI.

use std::process::ExitCode;

use clap::Parser;
use locale_sync::cli::Cli;
use locale_sync::provider::DeepLTranslator;
use locale_sync::reconcile::{
    LocaleOutcome,
    Reconciler,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let resolved = match cli.resolve() {
        Ok(resolved) => resolved,
        Err(error) => {
            eprintln!("Error: {error}");
            return ExitCode::FAILURE;
        }
    };

    let translator = DeepLTranslator::new(resolved.api_key);
    let reconciler = Reconciler::new(translator, resolved.options.clone());

    match reconciler.run().await {
        Ok(report) => {
            for result in report.results() {
                match &result.outcome {
                    LocaleOutcome::Filled { keys } => {
                        println!("{}: filled {keys} missing key(s)", result.locale);
                    }
                    LocaleOutcome::AlreadyComplete => {
                        println!("{}: all keys are present", result.locale);
                    }
                    LocaleOutcome::Failed(error) => {
                        eprintln!("{}: failed: {error}", result.locale);
                    }
                }
            }
            println!("Report written to {}", resolved.options.report_path().display());

            if report.has_failures() { ExitCode::FAILURE } else { ExitCode::SUCCESS }
        }
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}
