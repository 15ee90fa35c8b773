//! locale-sync
//!
//! Reconciles multi-locale JSON translation files against a base locale:
//! detects keys missing from each target locale, translates exactly those
//! keys in one batch per locale, and merges the results back into each
//! file's nested structure without disturbing existing content.

pub mod batch;
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod provider;
pub mod reconcile;
pub mod report;
pub mod tree;

pub use reconcile::Reconciler;
