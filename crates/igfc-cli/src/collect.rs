//! Live collection: resolve every username through one shared resolver.

use anyhow::Context;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use igfc_core::{CollectedProfile, RecordSource, RequestSettings};
use igfc_scraper::ProfileResolver;

/// Builds the HTTP client and resolver from `settings` and resolves
/// `handles` with at most `settings.concurrency` in flight.
///
/// # Errors
///
/// Returns an error only if the HTTP client cannot be built. Per-username
/// failures are logged and skipped.
pub(crate) async fn collect_live(
    settings: &RequestSettings,
    handles: &[String],
    fetched_at: DateTime<Utc>,
) -> anyhow::Result<Vec<CollectedProfile>> {
    let resolver =
        ProfileResolver::from_settings(settings).context("failed to build HTTP client")?;
    Ok(resolve_all(&resolver, handles, settings.concurrency, fetched_at).await)
}

/// Resolves `handles` in input order. Each username is its own error
/// boundary: a miss or an internal error drops only that username.
pub(crate) async fn resolve_all(
    resolver: &ProfileResolver,
    handles: &[String],
    concurrency: usize,
    fetched_at: DateTime<Utc>,
) -> Vec<CollectedProfile> {
    let results: Vec<_> = stream::iter(handles)
        .map(|handle| async move { (handle, resolver.fetch_profile(handle).await) })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut records = Vec::with_capacity(results.len());
    for (handle, result) in results {
        match result {
            Ok(Some(profile)) => {
                records.push(CollectedProfile::new(profile, fetched_at, RecordSource::Live));
            }
            Ok(None) => {
                tracing::warn!(username = %handle, "could not fetch profile; skipping");
            }
            Err(e) => {
                tracing::error!(username = %handle, error = %e, "error processing username; skipping");
            }
        }
    }

    tracing::info!(
        requested = handles.len(),
        collected = records.len(),
        "live collection finished"
    );
    records
}
