use std::sync::Arc;

use booktrans::app_config::Config;
use booktrans::app_controller::{AppController, Chapter};
use booktrans::providers::mock::MockClient;
use tempfile::tempdir;

use crate::common::init_logging;

fn small_chunk_config() -> Config {
    let mut config = Config::default();
    config.chunking.max_chunk_size = 60;
    config.chunking.min_chunk_size = 20;
    config.generation.concurrent_requests = 1;
    config
}

fn sample_chapters() -> Vec<Chapter> {
    vec![
        Chapter {
            name: "chapter_01".to_string(),
            content: "The morning was quiet and cold. Nobody stirred in the house.\n\n\
                      Outside, the first snow of the season settled on the roofs."
                .to_string(),
        },
        Chapter {
            name: "chapter_02".to_string(),
            content: "A letter arrived with the noon post, addressed in a familiar hand."
                .to_string(),
        },
    ]
}

#[test]
fn test_new_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.chunking.min_chunk_size = config.chunking.max_chunk_size + 1;
    assert!(AppController::new(config).is_err());
}

#[test]
fn test_chunkChapters_withChapters_shouldWriteChunkFilesAndIndex() {
    init_logging();
    let dir = tempdir().unwrap();
    let controller = AppController::new(small_chunk_config()).unwrap();

    let index = controller
        .chunk_chapters(&sample_chapters(), dir.path())
        .unwrap();

    assert!(index.stats.total_chunks >= 2);
    assert!(dir.path().join("chunks").join("chunk_index.json").exists());

    for entry in &index.chunks {
        let path = dir.path().join("chunks").join(&entry.file);
        assert!(path.exists(), "missing chunk file {}", entry.file);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.chars().count(), entry.size);
    }
}

#[test]
fn test_loadChunks_withChunkedWorkDir_shouldRebuildChunkSet() {
    init_logging();
    let dir = tempdir().unwrap();
    let controller = AppController::new(small_chunk_config()).unwrap();

    let index = controller
        .chunk_chapters(&sample_chapters(), dir.path())
        .unwrap();
    let chunks = controller.load_chunks(dir.path()).unwrap();

    assert_eq!(chunks.len(), index.stats.total_chunks);
    for (order, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.order, order);
        assert!(!chunk.content.is_empty());
        assert_eq!(chunk.size, chunk.content.chars().count());
    }
    // Reading order follows the chapter order.
    assert_eq!(chunks.first().unwrap().chapter, "chapter_01");
    assert_eq!(chunks.last().unwrap().chapter, "chapter_02");
}

#[tokio::test]
async fn test_preflight_withUnreachableService_shouldFailWithHint() {
    let controller = AppController::new(Config::default()).unwrap();
    let err = controller
        .preflight(&MockClient::unreachable())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("ollama serve"));
}

#[tokio::test]
async fn test_preflight_withMissingModel_shouldFailWithPullHint() {
    let controller = AppController::new(Config::default()).unwrap();
    let err = controller
        .preflight(&MockClient::model_missing())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("ollama pull"));
}

#[tokio::test]
async fn test_translate_withWorkingClient_shouldProduceResultsAndRunIndex() {
    init_logging();
    let work_dir = tempdir().unwrap();
    let output_dir = tempdir().unwrap();
    let controller = AppController::new(small_chunk_config()).unwrap();

    let index = controller
        .chunk_chapters(&sample_chapters(), work_dir.path())
        .unwrap();

    let client = MockClient::working();
    let stats = controller
        .translate(Arc::new(client.clone()), work_dir.path(), output_dir.path())
        .await
        .unwrap();

    assert_eq!(stats.total_chunks, index.stats.total_chunks);
    assert_eq!(stats.accepted, index.stats.total_chunks);
    assert_eq!(stats.failed, 0);

    let results_dir = output_dir.path().join("translated_chunks");
    for entry in &index.chunks {
        let id = booktrans::chunker::ChunkIndex::chunk_id(entry);
        assert!(results_dir.join(format!("ko_{}.txt", id)).exists());
    }

    let run_index: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(output_dir.path().join("translation_index.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(
        run_index["translation_info"]["model"],
        Config::default().generation.model
    );

    // The run index records the decoding parameters the run used.
    let profiles = run_index["translation_info"]["profiles"].as_array().unwrap();
    assert_eq!(profiles.len(), 5);
    assert_eq!(profiles[0]["name"], "default");
    assert!((profiles[0]["temperature"].as_f64().unwrap() - 0.1).abs() < 1e-6);
    assert_eq!(profiles[4]["name"], "minimal");
    assert_eq!(
        run_index["original_info"]["stats"]["total_chunks"]
            .as_u64()
            .unwrap() as usize,
        index.stats.total_chunks
    );
}

#[tokio::test]
async fn test_translate_withSecondRun_shouldSkipEverything() {
    init_logging();
    let work_dir = tempdir().unwrap();
    let output_dir = tempdir().unwrap();
    let controller = AppController::new(small_chunk_config()).unwrap();

    controller
        .chunk_chapters(&sample_chapters(), work_dir.path())
        .unwrap();

    let first_client = MockClient::working();
    let first = controller
        .translate(Arc::new(first_client.clone()), work_dir.path(), output_dir.path())
        .await
        .unwrap();

    let second_client = MockClient::working();
    let second = controller
        .translate(Arc::new(second_client.clone()), work_dir.path(), output_dir.path())
        .await
        .unwrap();

    assert_eq!(first.accepted, first.total_chunks);
    assert_eq!(second.skipped, second.total_chunks);
    assert_eq!(second.accepted, 0);
    assert_eq!(second_client.call_count(), 0);
}
