/*!
 * Per-chunk orchestration.
 *
 * Each chunk moves through: skip-if-completed, cache lookup, bounded
 * generation attempts under the fallback profile table, validation, then
 * persistence of the result file and the progress record. Outcomes are
 * values, not exceptions; only a transport-level failure aborts the run.
 */

use futures::stream::{self, StreamExt};
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

use crate::app_config::{GenerationConfig, RetryConfig};
use crate::chunker::Chunk;
use crate::errors::PipelineError;
use crate::file_utils::FileManager;
use crate::providers::GenerationClient;
use crate::translation::cache::{content_hash, ContentCache};
use crate::translation::profiles::ProfileSelector;
use crate::translation::progress::{ProgressStore, TranslationProgress};
use crate::validation::{strip_reasoning_tags, Validator};

/// Prompt wrapped around each chunk before it is sent to the service
const TRANSLATION_PROMPT: &str = "You are a professional literary translator. \
Translate the following English novel text into natural, fluent Korean. \
Preserve paragraph breaks, names and tone. \
Output only the Korean translation, without commentary.\n\n";

/// Terminal state of one chunk within a run
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkOutcome {
    /// Already completed in a prior run; not processed
    Skipped,
    /// A valid result was produced (or found in the cache) and persisted
    Accepted {
        /// Generation attempts consumed (0 for a cache hit)
        attempts: u32,
        /// Whether the result came from the content cache
        from_cache: bool,
    },
    /// The best available invalid result was persisted after the retry
    /// budget for invalid output ran out
    Degraded {
        /// Generation attempts consumed
        attempts: u32,
        /// Validation reasons for the accepted result
        reasons: Vec<String>,
    },
    /// No usable result after all attempts; the chunk is recorded as
    /// failed and the run continues
    Failed {
        /// Diagnostic reasons
        reasons: Vec<String>,
    },
}

/// Aggregate statistics for one orchestrator run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    pub total_chunks: usize,
    pub accepted: usize,
    pub accepted_from_cache: usize,
    pub degraded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub cache_hit_rate: f64,
    pub duration_secs: f64,
}

impl RunStats {
    fn tally(&mut self, outcome: &ChunkOutcome) {
        match outcome {
            ChunkOutcome::Skipped => self.skipped += 1,
            ChunkOutcome::Accepted { from_cache, .. } => {
                self.accepted += 1;
                if *from_cache {
                    self.accepted_from_cache += 1;
                }
            }
            ChunkOutcome::Degraded { .. } => self.degraded += 1,
            ChunkOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} chunks: {} accepted ({} from cache), {} degraded, {} failed, {} skipped, cache hit rate {:.0}%, {:.1}s",
            self.total_chunks,
            self.accepted,
            self.accepted_from_cache,
            self.degraded,
            self.failed,
            self.skipped,
            self.cache_hit_rate * 100.0,
            self.duration_secs
        )
    }
}

/// Sequences chunks through cache, generation, validation and persistence
pub struct Orchestrator {
    client: Arc<dyn GenerationClient>,
    cache: ContentCache,
    validator: Validator,
    profiles: ProfileSelector,
    retry: RetryConfig,
    concurrent_requests: usize,
    batch_size: usize,
    progress: Arc<Mutex<TranslationProgress>>,
    store: ProgressStore,
    results_dir: PathBuf,
}

impl Orchestrator {
    /// Create an orchestrator writing results and progress under `output_dir`.
    ///
    /// The progress file is loaded immediately so chunks completed in a
    /// prior run are skipped.
    pub fn new(
        client: Arc<dyn GenerationClient>,
        cache: ContentCache,
        validator: Validator,
        retry: RetryConfig,
        generation: &GenerationConfig,
        output_dir: &Path,
    ) -> Self {
        let store = ProgressStore::new(output_dir.join("translation_progress.json"));
        let progress = Arc::new(Mutex::new(store.load()));

        Self {
            client,
            cache,
            validator,
            profiles: ProfileSelector::new(),
            retry,
            concurrent_requests: generation.concurrent_requests.max(1),
            batch_size: generation.batch_size.max(1),
            progress,
            store,
            results_dir: output_dir.join("translated_chunks"),
        }
    }

    /// Snapshot of the current progress record
    pub fn progress(&self) -> TranslationProgress {
        self.progress.lock().clone()
    }

    /// Directory the per-chunk result files are written to
    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// Process all chunks, sequentially or through the worker pool
    /// depending on the configured concurrency
    pub async fn run(&self, chunks: &[Chunk]) -> Result<RunStats, PipelineError> {
        if self.concurrent_requests <= 1 {
            self.run_sequential(chunks).await
        } else {
            self.run_concurrent(chunks).await
        }
    }

    /// Process chunks one at a time, in index order
    pub async fn run_sequential(&self, chunks: &[Chunk]) -> Result<RunStats, PipelineError> {
        let start = Instant::now();
        let mut stats = RunStats {
            total_chunks: chunks.len(),
            ..RunStats::default()
        };

        for chunk in chunks {
            let outcome = self.process_chunk(chunk).await?;
            stats.tally(&outcome);
        }

        self.finalize_stats(&mut stats, start);
        info!("Run finished: {}", stats);
        Ok(stats)
    }

    /// Process chunks through a bounded worker pool.
    ///
    /// Chunks are submitted in fixed-size batches with up to
    /// `concurrent_requests` in flight. A fatal transport error cancels
    /// queued work; chunks already persisted stay valid and resumable.
    pub async fn run_concurrent(&self, chunks: &[Chunk]) -> Result<RunStats, PipelineError> {
        let start = Instant::now();
        let mut stats = RunStats {
            total_chunks: chunks.len(),
            ..RunStats::default()
        };

        let semaphore = Arc::new(Semaphore::new(self.concurrent_requests));
        let aborted = Arc::new(AtomicBool::new(false));

        for batch in chunks.chunks(self.batch_size) {
            let results = stream::iter(batch.iter())
                .map(|chunk| {
                    let semaphore = semaphore.clone();
                    let aborted = aborted.clone();
                    async move {
                        let _permit = semaphore.acquire().await.unwrap();
                        if aborted.load(Ordering::SeqCst) {
                            return Ok(None);
                        }
                        match self.process_chunk(chunk).await {
                            Ok(outcome) => Ok(Some(outcome)),
                            Err(e) => {
                                aborted.store(true, Ordering::SeqCst);
                                Err(e)
                            }
                        }
                    }
                })
                .buffer_unordered(self.concurrent_requests)
                .collect::<Vec<_>>()
                .await;

            let mut fatal = None;
            for result in results {
                match result {
                    Ok(Some(outcome)) => stats.tally(&outcome),
                    Ok(None) => {}
                    Err(e) => fatal = Some(e),
                }
            }
            if let Some(e) = fatal {
                return Err(e);
            }
        }

        self.finalize_stats(&mut stats, start);
        info!("Run finished: {}", stats);
        Ok(stats)
    }

    /// Drive one chunk to a terminal state.
    ///
    /// Returns `Err` only for fatal transport failures; every other
    /// condition is an outcome value.
    pub async fn process_chunk(&self, chunk: &Chunk) -> Result<ChunkOutcome, PipelineError> {
        if self.progress.lock().is_completed(&chunk.id) {
            debug!("Skipping {}: already completed", chunk.id);
            return Ok(ChunkOutcome::Skipped);
        }

        let hash = content_hash(&chunk.content);
        if let Some(result) = self.cache.get(&hash) {
            debug!("Cache hit for {}", chunk.id);
            return Ok(self.accept(chunk, &result, 0, true));
        }

        let prompt = format!("{}{}", TRANSLATION_PROMPT, chunk.content.trim());

        let mut invalid_seen = 0u32;
        let mut attempts_used = 0u32;
        let mut last_invalid: Option<(String, Vec<String>)> = None;

        for attempt in 0..self.retry.max_attempts {
            attempts_used = attempt + 1;
            let profile = self.profiles.for_attempt(attempt as usize);

            let raw = match self.client.generate(&prompt, profile).await {
                Ok(raw) => raw,
                Err(e) if e.is_fatal() => {
                    error!("Fatal provider failure on {}: {}", chunk.id, e);
                    if let Some(hint) = e.remediation() {
                        error!("{}", hint);
                    }
                    return Err(PipelineError::Transport(e));
                }
                Err(e) => {
                    warn!(
                        "Attempt {}/{} for {} failed: {}",
                        attempt + 1,
                        self.retry.max_attempts,
                        chunk.id,
                        e
                    );
                    continue;
                }
            };

            let text = strip_reasoning_tags(&raw);
            if text.trim().is_empty() {
                debug!(
                    "Attempt {}/{} for {} returned an empty result",
                    attempt + 1,
                    self.retry.max_attempts,
                    chunk.id
                );
                continue;
            }

            let report = self.validator.check(&text);
            if report.passed {
                self.cache.store(&hash, &text);
                return Ok(self.accept(chunk, &text, attempt + 1, false));
            }

            invalid_seen += 1;
            warn!(
                "Attempt {}/{} for {} failed validation ({} invalid so far): {}",
                attempt + 1,
                self.retry.max_attempts,
                chunk.id,
                invalid_seen,
                report.reasons.join("; ")
            );
            last_invalid = Some((text, report.reasons));

            if invalid_seen >= self.retry.degrade_after_invalid {
                break;
            }
        }

        // Bounded degradation: keep the best available output rather than
        // discard the chunk. Degraded results are persisted and marked
        // completed (not retried on resume) but never cached.
        if let Some((text, reasons)) = last_invalid {
            warn!(
                "Accepting degraded result for {} after {} invalid attempt(s)",
                chunk.id, invalid_seen
            );
            return Ok(self.persist_outcome(chunk, &text, || ChunkOutcome::Degraded {
                attempts: attempts_used,
                reasons,
            }));
        }

        let reasons = vec![format!(
            "no usable result after {} attempts (all empty or errored)",
            self.retry.max_attempts
        )];
        warn!("Chunk {} failed: {}", chunk.id, reasons[0]);
        self.record_failure(&chunk.id);
        Ok(ChunkOutcome::Failed { reasons })
    }

    /// Persist an accepted result and record completion
    fn accept(&self, chunk: &Chunk, text: &str, attempts: u32, from_cache: bool) -> ChunkOutcome {
        self.persist_outcome(chunk, text, || ChunkOutcome::Accepted {
            attempts,
            from_cache,
        })
    }

    /// Write the result file and the progress record for a usable result.
    ///
    /// A result-file failure downgrades the chunk to failed so that the
    /// missing artifact is retried on the next run; a progress-file
    /// failure is a warning only, with resumability for this chunk not
    /// guaranteed until the next successful save.
    fn persist_outcome<F>(&self, chunk: &Chunk, text: &str, outcome: F) -> ChunkOutcome
    where
        F: FnOnce() -> ChunkOutcome,
    {
        let path = self.results_dir.join(format!("ko_{}.txt", chunk.id));
        if let Err(e) = FileManager::write_to_file(&path, text) {
            warn!("Failed to write result for {}: {}", chunk.id, e);
            self.record_failure(&chunk.id);
            return ChunkOutcome::Failed {
                reasons: vec![format!("result file write failed: {}", e)],
            };
        }

        // The save happens under the lock: with pool workers finishing
        // concurrently, an unlocked save could rename an older snapshot
        // over a newer one and drop completions from the on-disk record.
        {
            let mut progress = self.progress.lock();
            progress.mark_completed(&chunk.id);
            self.save_progress(&progress);
        }

        outcome()
    }

    /// Record a failed chunk and persist the progress record
    fn record_failure(&self, id: &str) {
        let mut progress = self.progress.lock();
        progress.mark_failed(id);
        self.save_progress(&progress);
    }

    /// Overwrite the progress file; failures are logged, not fatal
    fn save_progress(&self, progress: &TranslationProgress) {
        if let Err(e) = self.store.save(progress) {
            warn!("Failed to persist progress record: {}", e);
        }
    }

    fn finalize_stats(&self, stats: &mut RunStats, start: Instant) {
        let (_, _, hit_rate) = self.cache.stats();
        stats.cache_hit_rate = hit_rate;
        stats.duration_secs = start.elapsed().as_secs_f64();
    }
}
