/*!
 * Main application controller.
 *
 * Wires the chunker, the generation client and the orchestrator together
 * around a work directory: chapter text goes in, chunk files and a chunk
 * index come out, and a translation run turns those into per-chunk result
 * files plus a final run index. Container parsing and document reassembly
 * live outside this crate; the controller only consumes ordered chapter
 * text and produces ordered, keyed result files.
 */

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local};
use log::info;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::app_config::Config;
use crate::chunker::{Chunk, ChunkIndex, ChunkSettings, TextChunker};
use crate::file_utils::FileManager;
use crate::providers::GenerationClient;
use crate::translation::cache::ContentCache;
use crate::translation::pipeline::{Orchestrator, RunStats};
use crate::translation::profiles::{fallback_profiles, GenerationProfile};
use crate::validation::Validator;

/// One unit of ordered chapter text supplied by the extraction collaborator
#[derive(Debug, Clone)]
pub struct Chapter {
    /// Chapter name, used in chunk ids
    pub name: String,
    /// Plain chapter text
    pub content: String,
}

/// Run metadata written once per translation run
#[derive(Debug, Serialize)]
struct TranslationInfo {
    run_id: String,
    model: String,
    /// Decoding parameters used across retry attempts, default first
    profiles: &'static [GenerationProfile],
    started_at: String,
    finished_at: String,
    duration_minutes: f64,
    stats: RunStats,
}

/// Final index summarizing a translation run next to the chunk index it
/// consumed
#[derive(Debug, Serialize)]
struct TranslationIndex {
    translation_info: TranslationInfo,
    original_info: ChunkIndex,
}

/// Main controller for chunking and translation runs
pub struct AppController {
    config: Config,
}

impl AppController {
    /// Create a controller with a validated configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this controller runs with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Split chapters into chunks and write the chunk files plus
    /// `chunk_index.json` under `work_dir/chunks/`.
    ///
    /// Chapter order is preserved: chunks are numbered per chapter and the
    /// index lists them in reading order.
    pub fn chunk_chapters(&self, chapters: &[Chapter], work_dir: &Path) -> Result<ChunkIndex> {
        let chunker = TextChunker::from_config(&self.config.chunking)?;
        let chunks_dir = work_dir.join("chunks");
        FileManager::ensure_dir(&chunks_dir)?;

        let mut all_chunks: Vec<Chunk> = Vec::new();
        for chapter in chapters {
            let chunks = chunker.chunk_text(&chapter.content, &chapter.name);
            for chunk in &chunks {
                let path = FileManager::chunk_file_path(&chunks_dir, &chunk.id);
                FileManager::write_to_file(&path, &chunk.content)?;
            }
            all_chunks.extend(chunks);
        }

        let index = ChunkIndex::build(
            &all_chunks,
            ChunkSettings {
                max_chunk_size: self.config.chunking.max_chunk_size,
                min_chunk_size: self.config.chunking.min_chunk_size,
            },
        );

        let index_json = serde_json::to_string_pretty(&index)?;
        FileManager::write_atomic(chunks_dir.join("chunk_index.json"), &index_json)?;

        info!(
            "Chunked {} chapter(s) into {} chunk(s), {} chars total",
            chapters.len(),
            index.stats.total_chunks,
            index.stats.total_chars
        );
        Ok(index)
    }

    /// Load the chunk set referenced by `work_dir/chunks/chunk_index.json`
    pub fn load_chunks(&self, work_dir: &Path) -> Result<Vec<Chunk>> {
        let chunks_dir = work_dir.join("chunks");
        let index = ChunkIndex::from_file(chunks_dir.join("chunk_index.json"))?;

        let mut chunks = Vec::with_capacity(index.chunks.len());
        for (order, entry) in index.chunks.iter().enumerate() {
            let id = ChunkIndex::chunk_id(entry).to_string();
            let content = FileManager::read_to_string(chunks_dir.join(&entry.file))
                .with_context(|| format!("Chunk file listed in index is missing: {}", entry.file))?;
            let size = content.chars().count();
            chunks.push(Chunk {
                id,
                chapter: entry.chapter.clone(),
                order,
                content,
                size,
            });
        }
        Ok(chunks)
    }

    /// Check the service is reachable and the configured model is present
    /// before any chunk is submitted
    pub async fn preflight(&self, client: &dyn GenerationClient) -> Result<()> {
        client.test_connection().await.map_err(|e| {
            anyhow!(
                "{} - check that the generation service is running (e.g. `ollama serve`)",
                e
            )
        })?;

        let model = &self.config.generation.model;
        let available = client
            .model_available(model)
            .await
            .map_err(|e| anyhow!("Could not list models: {}", e))?;
        if !available {
            return Err(anyhow!(
                "Model '{}' is not available - pull it first (e.g. `ollama pull {}`)",
                model,
                model
            ));
        }
        Ok(())
    }

    /// Run a full translation pass over a prepared work directory.
    ///
    /// Resumable: chunks recorded as completed in the progress file under
    /// `output_dir` are skipped. Writes one `ko_{id}.txt` result per
    /// accepted or degraded chunk and a final `translation_index.json`.
    pub async fn translate(
        &self,
        client: Arc<dyn GenerationClient>,
        work_dir: &Path,
        output_dir: &Path,
    ) -> Result<RunStats> {
        self.preflight(client.as_ref()).await?;

        let chunks = self.load_chunks(work_dir)?;
        let index = ChunkIndex::from_file(work_dir.join("chunks").join("chunk_index.json"))?;

        let orchestrator = Orchestrator::new(
            client,
            ContentCache::new(self.config.enable_cache),
            Validator::from_config(&self.config.validation),
            self.config.retry.clone(),
            &self.config.generation,
            output_dir,
        );

        let started_at: DateTime<Local> = Local::now();
        info!(
            "Starting translation run: {} chunk(s), model {}",
            chunks.len(),
            self.config.generation.model
        );

        let stats = orchestrator.run(&chunks).await?;
        let finished_at: DateTime<Local> = Local::now();

        self.write_translation_index(output_dir, &index, &stats, started_at, finished_at)?;
        Ok(stats)
    }

    /// Write the per-run summary index next to the result files
    fn write_translation_index(
        &self,
        output_dir: &Path,
        original_info: &ChunkIndex,
        stats: &RunStats,
        started_at: DateTime<Local>,
        finished_at: DateTime<Local>,
    ) -> Result<()> {
        let index = TranslationIndex {
            translation_info: TranslationInfo {
                run_id: Uuid::new_v4().to_string(),
                model: self.config.generation.model.clone(),
                profiles: fallback_profiles(),
                started_at: started_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                finished_at: finished_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                duration_minutes: stats.duration_secs / 60.0,
                stats: stats.clone(),
            },
            original_info: original_info.clone(),
        };

        let json = serde_json::to_string_pretty(&index)?;
        FileManager::write_atomic(output_dir.join("translation_index.json"), &json)?;
        Ok(())
    }
}
