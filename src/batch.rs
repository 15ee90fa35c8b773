//! Batching of missing keys into a single provider call.
//!
//! The missing values are joined into one newline-delimited blob, sent as
//! a single translation request, and the response is split back on the
//! same delimiter. Index `i` of the response belongs to key `i` of the
//! missing set, so the positional invariant is guarded twice: values may
//! not contain the delimiter, and the response cardinality must match.

use serde_json::Value;

use crate::error::LocaleError;
use crate::provider::Translator;
use crate::tree::FlatKeyMap;

/// Delimiter between batch items on the provider wire.
const BATCH_DELIMITER: char = '\n';

/// Translate the values of `missing` into `target_locale`.
///
/// Returns a flat map with the same keys in the same order, each mapped to
/// its translated value.
///
/// # Errors
/// - [`LocaleError::DelimiterInValue`] when a source value embeds the
///   delimiter and would shift every following translation.
/// - [`LocaleError::Provider`] when the provider call fails.
/// - [`LocaleError::BatchMisaligned`] when the split response does not
///   have exactly one item per missing key.
pub async fn translate_missing<T: Translator>(
    translator: &T,
    missing: &FlatKeyMap,
    target_locale: &str,
) -> Result<FlatKeyMap, LocaleError> {
    let mut batch = Vec::with_capacity(missing.len());
    for (key, value) in missing {
        let text = value_as_text(value);
        if text.contains(BATCH_DELIMITER) {
            return Err(LocaleError::DelimiterInValue { key: key.clone() });
        }
        batch.push(text);
    }

    let request_text = batch.join("\n");
    let response_text = translator.translate(&request_text, None, target_locale).await?;

    let translations: Vec<&str> = response_text.split(BATCH_DELIMITER).collect();
    if translations.len() != missing.len() {
        return Err(LocaleError::BatchMisaligned {
            sent: missing.len(),
            received: translations.len(),
        });
    }

    let translated: FlatKeyMap = missing
        .keys()
        .zip(translations)
        .map(|(key, translation)| (key.clone(), Value::String(translation.to_string())))
        .collect();

    for (key, translation) in &translated {
        tracing::debug!(locale = %target_locale, key = %key, translation = %translation, "Translated key");
    }
    tracing::info!(locale = %target_locale, keys = translated.len(), "Batch translated");

    Ok(translated)
}

/// Render a leaf value as provider-facing text.
///
/// Strings go through verbatim; other leaves use their compact JSON form.
fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
