/*!
 * Translation pipeline machinery.
 *
 * This module contains everything between the chunk list and the result
 * files. It is split into several submodules:
 *
 * - `cache`: Content-addressed cache so identical passages are generated once
 * - `profiles`: Fallback generation profiles used across retry attempts
 * - `progress`: Durable completed/failed chunk bookkeeping for resumable runs
 * - `pipeline`: Per-chunk orchestration state machine
 */

// Re-export main types for easier usage
pub use self::cache::{content_hash, ContentCache};
pub use self::pipeline::{ChunkOutcome, Orchestrator, RunStats};
pub use self::profiles::{fallback_profiles, GenerationProfile, ProfileSelector};
pub use self::progress::{ProgressStore, TranslationProgress};

// Submodules
pub mod cache;
pub mod pipeline;
pub mod profiles;
pub mod progress;
