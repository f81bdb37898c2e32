//! Batch enrichment.
//!
//! A batch is filtered up front (private, loopback, link-local and ignored
//! addresses never leave the process), the remaining entities are looked up
//! with at most `concurrency_limit` requests in flight, and the first failed
//! lookup aborts the whole batch. Lookups still queued at that point are
//! never started; lookups already in flight run to completion in the
//! background and their results are dropped.

use crate::address;
use crate::config::{ApiVersion, DEFAULT_CONCURRENCY_LIMIT};
use crate::error::BatchError;
use crate::ignore::IgnoreList;
use crate::model::{Entity, LookupOutcome, ResultBatch};
use crate::providers::ContextProvider;
use crate::response::{classify, Classified, LookupFailure};
use crate::summary::summary_tags;
use futures::stream::{FuturesUnordered, StreamExt};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Per-batch lookup options.
#[derive(Clone, PartialEq, Eq)]
pub struct LookupOptions {
    /// Spur API token.
    pub api_key: String,
    /// Comma-separated addresses and CIDR ranges to skip.
    pub ignore_ips: String,
    /// Maximum requests in flight. Values below 1 are treated as 1.
    pub concurrency_limit: usize,
}

impl LookupOptions {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_ignore_ips(mut self, ignore_ips: impl Into<String>) -> Self {
        self.ignore_ips = ignore_ips.into();
        self
    }

    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit;
        self
    }
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            ignore_ips: String::new(),
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
        }
    }
}

impl fmt::Debug for LookupOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupOptions")
            .field("api_key", &"<redacted>")
            .field("ignore_ips", &self.ignore_ips)
            .field("concurrency_limit", &self.concurrency_limit)
            .finish()
    }
}

/// Why an entity was filtered before lookup.
fn skip_reason(entity: &Entity, ignore: &IgnoreList) -> Option<&'static str> {
    if !address::is_eligible(entity) {
        return address::ineligible_reason(entity);
    }
    ignore.matches(entity).then_some("ignored")
}

/// Enriches batches of entities through a context provider.
pub struct EnrichmentEngine {
    provider: Arc<dyn ContextProvider>,
}

impl EnrichmentEngine {
    pub fn new(provider: Arc<dyn ContextProvider>) -> Self {
        info!(
            provider = provider.name(),
            api_version = %provider.api_version(),
            "Enrichment engine initialized"
        );
        Self { provider }
    }

    /// Enrich a batch.
    ///
    /// On success the batch holds exactly one outcome per input entity, in
    /// completion order. If any lookup fails, the whole call fails with that
    /// lookup's error and every other outcome is discarded.
    pub async fn enrich(
        &self,
        entities: &[Entity],
        options: &LookupOptions,
    ) -> Result<ResultBatch, BatchError> {
        debug!(entities = entities.len(), options = ?options, "Starting enrichment batch");

        let ignore = IgnoreList::parse(&options.ignore_ips);
        let mut outcomes = Vec::with_capacity(entities.len());
        let mut pending = Vec::new();

        for entity in entities {
            match skip_reason(entity, &ignore) {
                Some(reason) => {
                    debug!(entity = %entity.value, reason, "Skipping lookup");
                    outcomes.push(LookupOutcome::Skipped {
                        entity: entity.clone(),
                    });
                }
                None => pending.push(entity),
            }
        }

        let limit = options.concurrency_limit.max(1);
        debug!(
            lookups = pending.len(),
            skipped = outcomes.len(),
            concurrency_limit = limit,
            "Dispatching lookups"
        );

        let api_key: Arc<str> = Arc::from(options.api_key.as_str());
        let mut queue = pending.into_iter();
        let mut in_flight = FuturesUnordered::new();
        for entity in queue.by_ref().take(limit) {
            in_flight.push(lookup(self.provider.clone(), entity.clone(), api_key.clone()));
        }

        while let Some(outcome) = in_flight.next().await {
            if let LookupOutcome::Failed {
                entity,
                error,
                detail,
            } = outcome
            {
                error!(
                    entity = %entity.value,
                    error = %error,
                    detail = ?detail,
                    queued = queue.len(),
                    "Lookup failed, aborting batch"
                );
                if !in_flight.is_empty() {
                    debug!(in_flight = in_flight.len(), "Letting in-flight lookups finish");
                    tokio::spawn(async move { while in_flight.next().await.is_some() {} });
                }
                return Err(BatchError {
                    entity,
                    error,
                    detail,
                });
            }
            outcomes.push(outcome);

            if let Some(entity) = queue.next() {
                in_flight.push(lookup(self.provider.clone(), entity.clone(), api_key.clone()));
            }
        }

        debug!(results = outcomes.len(), "Enrichment batch complete");
        Ok(ResultBatch::new(outcomes))
    }
}

async fn lookup(
    provider: Arc<dyn ContextProvider>,
    entity: Entity,
    api_key: Arc<str>,
) -> LookupOutcome {
    let result = provider.fetch(&entity.value, &api_key).await;

    match classify(result) {
        Ok(Classified::Data(details)) => {
            let summary_tags = match provider.api_version() {
                ApiVersion::V2 => summary_tags(&details),
                ApiVersion::V1 => Vec::new(),
            };
            LookupOutcome::Enriched {
                entity,
                summary_tags,
                details,
            }
        }
        Ok(Classified::Empty) => {
            debug!(entity = %entity.value, "No context returned");
            LookupOutcome::Empty { entity }
        }
        Err(LookupFailure { error, detail }) => LookupOutcome::Failed {
            entity,
            error,
            detail,
        },
    }
}
