//! Multi-source fallback resolution
//!
//! [`SourceResolver::resolve`] walks an ordered adapter chain one adapter at a
//! time. The first adapter whose output normalizes to at least one item wins;
//! otherwise the caller gets every attempt back, in order, as a terminal
//! failure. Results are never merged across adapters.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::ResolverConfig;
use crate::errors::{AppResult, FailureKind, ResolverError, SourceError};
use crate::models::{AttemptFailure, ProviderResult, Query, ResolutionOutcome};
use crate::sources::SourceAdapter;

pub mod normalize;

pub use normalize::Normalizer;

#[derive(Debug, Clone)]
pub struct SourceResolver {
    adapter_timeout: Duration,
    normalizer: Normalizer,
}

impl SourceResolver {
    pub fn new(config: &ResolverConfig) -> AppResult<Self> {
        Ok(Self::with_normalizer(
            config.adapter_timeout,
            Normalizer::from_config(config)?,
        ))
    }

    pub fn with_normalizer(adapter_timeout: Duration, normalizer: Normalizer) -> Self {
        Self {
            adapter_timeout,
            normalizer,
        }
    }

    /// Resolve `query` against `adapters` in priority order
    ///
    /// Adapter failures are recorded, never returned as `Err`; the error side
    /// is reserved for a malformed chain (two adapters with one name).
    pub async fn resolve(
        &self,
        query: &Query,
        adapters: &[Arc<dyn SourceAdapter>],
    ) -> Result<ResolutionOutcome, ResolverError> {
        ensure_unique_names(adapters)?;

        let mut attempts = Vec::with_capacity(adapters.len());

        for adapter in adapters {
            match self.attempt(adapter.as_ref(), query).await {
                Ok(result) => {
                    info!(
                        "Resolved '{}' for {} from '{}' ({} items, {} earlier failures)",
                        query.entity(),
                        query.date(),
                        result.source,
                        result.items.len(),
                        attempts.len()
                    );
                    return Ok(ResolutionOutcome::Resolved {
                        result,
                        failed_before: attempts,
                    });
                }
                Err(error) => {
                    log_failure(adapter.name(), query, &error);
                    attempts.push(AttemptFailure::from_error(adapter.name(), &error));
                }
            }
        }

        warn!(
            "No source produced listings for '{}' on {} ({} tried)",
            query.entity(),
            query.date(),
            attempts.len()
        );
        Ok(ResolutionOutcome::Exhausted { attempts })
    }

    /// One bounded adapter call, normalized
    async fn attempt(&self, adapter: &dyn SourceAdapter, query: &Query) -> Result<ProviderResult, SourceError> {
        let name = adapter.name();
        let budget = self.effective_timeout(adapter);

        debug!(
            "Trying '{}' for '{}' on {} (budget {:?})",
            name,
            query.entity(),
            query.date(),
            budget
        );

        let raw = tokio::time::timeout(budget, adapter.fetch(query))
            .await
            .map_err(|_| SourceError::timeout(name, budget))??;

        let result = self.normalizer.normalize(raw, name, query.date());
        if result.items.is_empty() {
            return Err(SourceError::empty(name));
        }
        Ok(result)
    }

    /// The adapter's own timeout, capped by the resolver ceiling
    fn effective_timeout(&self, adapter: &dyn SourceAdapter) -> Duration {
        adapter
            .timeout()
            .map_or(self.adapter_timeout, |own| own.min(self.adapter_timeout))
    }
}

fn ensure_unique_names(adapters: &[Arc<dyn SourceAdapter>]) -> Result<(), ResolverError> {
    let mut seen = HashSet::with_capacity(adapters.len());
    for adapter in adapters {
        if !seen.insert(adapter.name()) {
            return Err(ResolverError::DuplicateAdapter(adapter.name().to_string()));
        }
    }
    Ok(())
}

fn log_failure(name: &str, query: &Query, error: &SourceError) {
    match error.kind() {
        FailureKind::ConfigurationError => warn!(
            "Source '{}' is not usable for '{}': {}. Check its credentials in the config file or environment",
            name,
            query.entity(),
            error
        ),
        FailureKind::TransportError => warn!(
            "Source '{}' unreachable for '{}': {}",
            name,
            query.entity(),
            error
        ),
        FailureKind::ParseError => warn!(
            "Source '{}' returned an unexpected payload for '{}': {}",
            name,
            query.entity(),
            error
        ),
        FailureKind::EmptyResultError => debug!(
            "Source '{}' had nothing for '{}' on {}: {}",
            name,
            query.entity(),
            query.date(),
            error
        ),
    }
}
