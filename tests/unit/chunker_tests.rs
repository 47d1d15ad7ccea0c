use booktrans::chunker::{Chunk, ChunkIndex, ChunkSettings, TextChunker};

#[test]
fn test_chunkText_withEmptyInput_shouldReturnNoChunks() {
    let chunker = TextChunker::new(30, 10).unwrap();
    assert!(chunker.chunk_text("", "ch01").is_empty());
    assert!(chunker.chunk_text("   \n\n  \n ", "ch01").is_empty());
}

#[test]
fn test_chunkText_withInputBelowMinimum_shouldReturnSingleChunk() {
    let chunker = TextChunker::new(30, 10).unwrap();
    let chunks = chunker.chunk_text("Tiny.", "ch01");

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].content, "Tiny.");
    assert_eq!(chunks[0].size, 5);
}

#[test]
fn test_chunkText_withParagraphsFittingTogether_shouldPackIntoOneChunk() {
    let chunker = TextChunker::new(30, 10).unwrap();
    let chunks = chunker.chunk_text("First para.\n\nSecond one.", "ch01");

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].content, "First para.\n\nSecond one.");
}

#[test]
fn test_chunkText_withKoreanParagraphs_shouldKeepEveryChunkWithinBounds() {
    let chunker = TextChunker::new(30, 10).unwrap();
    let paragraph = "가".repeat(26);
    let text = format!("{p}\n\n{p}\n\n{p}", p = paragraph);

    let chunks = chunker.chunk_text(&text, "ch01");

    assert_eq!(chunks.len(), 3);
    for chunk in &chunks {
        assert!(chunk.size >= 10 && chunk.size <= 30, "size {} out of bounds", chunk.size);
        assert_eq!(chunk.content, paragraph);
    }
}

#[test]
fn test_chunkText_withKoreanSentenceParagraphs_shouldKeepEveryChunkWithinBounds() {
    let chunker = TextChunker::new(30, 10).unwrap();
    let text = "문단1입니다. 내용이 길어서 충분히 길어집니다.\n\n\
                문단2입니다. 내용이 길어서 충분히 길어집니다.\n\n\
                문단3입니다. 내용이 길어서 충분히 길어집니다.";

    let chunks = chunker.chunk_text(text, "ch01");

    assert!(!chunks.is_empty());
    for chunk in &chunks {
        assert!(
            chunk.size >= 10 && chunk.size <= 30,
            "size {} out of bounds",
            chunk.size
        );
    }

    let rejoined = chunks
        .iter()
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    assert_eq!(rejoined, text);
}

#[test]
fn test_chunkText_withInputExactlyAtMaximum_shouldNotSplit() {
    let chunker = TextChunker::new(30, 10).unwrap();
    let text = "a".repeat(30);

    let chunks = chunker.chunk_text(&text, "ch01");

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].size, 30);
}

#[test]
fn test_chunkText_withUnsplittableToken_shouldEmitOversizedChunk() {
    let chunker = TextChunker::new(30, 10).unwrap();
    let token = "x".repeat(45);

    let chunks = chunker.chunk_text(&token, "ch01");

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].size, 45);
    assert_eq!(chunks[0].content, token);
}

#[test]
fn test_chunkText_withOversizedParagraph_shouldFallBackToSentences() {
    let chunker = TextChunker::new(40, 10).unwrap();
    let text = "Aaaa bbbb cccc. Dddd eeee ffff. Gggg hhhh iiii. Jjjj kkkk llll.";

    let chunks = chunker.chunk_text(text, "ch01");

    assert_eq!(chunks.len(), 2);
    for chunk in &chunks {
        assert!(chunk.size <= 40, "size {} exceeds maximum", chunk.size);
        assert!(chunk.size >= 10, "size {} below minimum", chunk.size);
    }

    let rejoined = chunks
        .iter()
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    assert_eq!(rejoined, text);
}

#[test]
fn test_chunkText_withTrailingShortParagraph_shouldMergeIntoPreviousChunk() {
    let chunker = TextChunker::new(20, 10).unwrap();
    let text = format!("{}\n\nbb", "a".repeat(19));

    let chunks = chunker.chunk_text(&text, "ch01");

    // The tail is below the minimum, so it extends the previous chunk
    // rather than becoming its own piece.
    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].content.ends_with("bb"));
    assert_eq!(chunks[0].size, 23);
}

#[test]
fn test_chunkText_withSameInputTwice_shouldBeDeterministic() {
    let chunker = TextChunker::new(40, 10).unwrap();
    let text = "One sentence here. Another follows. And a third one.\n\nA second paragraph.";

    let first = chunker.chunk_text(text, "ch01");
    let second = chunker.chunk_text(text, "ch01");

    assert_eq!(first, second);
}

#[test]
fn test_chunkText_withMultipleChunks_shouldNumberSequentially() {
    let chunker = TextChunker::new(30, 10).unwrap();
    let paragraph = "가".repeat(26);
    let text = format!("{p}\n\n{p}\n\n{p}", p = paragraph);

    let chunks = chunker.chunk_text(&text, "intro");

    assert_eq!(chunks[0].id, "intro_part_01");
    assert_eq!(chunks[1].id, "intro_part_02");
    assert_eq!(chunks[2].id, "intro_part_03");
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.order, i);
        assert_eq!(chunk.chapter, "intro");
    }
}

#[test]
fn test_new_withInvalidBounds_shouldFail() {
    assert!(TextChunker::new(10, 30).is_err());
    assert!(TextChunker::new(0, 0).is_err());
    assert!(TextChunker::new(30, 0).is_err());
}

#[test]
fn test_chunkIndexBuild_withChunks_shouldComputeStats() {
    let chunks = vec![
        Chunk {
            id: "ch01_part_01".to_string(),
            chapter: "ch01".to_string(),
            order: 0,
            content: "a".repeat(20),
            size: 20,
        },
        Chunk {
            id: "ch01_part_02".to_string(),
            chapter: "ch01".to_string(),
            order: 1,
            content: "b".repeat(10),
            size: 10,
        },
    ];

    let index = ChunkIndex::build(
        &chunks,
        ChunkSettings {
            max_chunk_size: 30,
            min_chunk_size: 10,
        },
    );

    assert_eq!(index.stats.total_chunks, 2);
    assert_eq!(index.stats.total_chars, 30);
    assert!((index.stats.average_size - 15.0).abs() < f64::EPSILON);
    assert_eq!(index.chunks[0].file, "ch01_part_01.txt");
    assert_eq!(ChunkIndex::chunk_id(&index.chunks[0]), "ch01_part_01");
}
