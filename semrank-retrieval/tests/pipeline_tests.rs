//! End-to-end pipeline scenarios with a deterministic stub embedder.

use std::sync::Arc;

use async_trait::async_trait;
use semrank_retrieval::error::Result;
use semrank_retrieval::{
    Document, EmbeddingProvider, InMemoryVectorStore, MatchConfig, MatchPipeline,
    RecursiveChunker, RetrievalError,
};

/// Deterministic bag-of-keywords embedder: dimension `i` counts occurrences
/// of the `i`-th vocabulary word. Good enough for relative similarity.
struct KeywordEmbedder {
    vocab: Vec<&'static str>,
}

impl KeywordEmbedder {
    fn new() -> Self {
        Self {
            vocab: vec![
                "solar", "panel", "battery", "chemistry", "storage", "research", "projects",
                "efficiency",
            ],
        }
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered.split_whitespace().collect();
        Ok(self
            .vocab
            .iter()
            .map(|keyword| words.iter().filter(|w| *w == keyword).count() as f32)
            .collect())
    }

    fn dimensions(&self) -> usize {
        self.vocab.len()
    }

    fn model_id(&self) -> &str {
        "keyword-stub"
    }
}

/// Fails on texts containing a marker word; everything else embeds fine.
struct FlakyEmbedder {
    inner: KeywordEmbedder,
}

#[async_trait]
impl EmbeddingProvider for FlakyEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.contains("poison") {
            return Err(RetrievalError::Embedding {
                provider: "flaky".into(),
                message: "refused this text".into(),
            });
        }
        self.inner.embed(text).await
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn model_id(&self) -> &str {
        "flaky-stub"
    }
}

/// Simulates a backend that is down entirely.
struct DownEmbedder;

#[async_trait]
impl EmbeddingProvider for DownEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(RetrievalError::EmbeddingBackend {
            provider: "down".into(),
            message: "connection refused".into(),
        })
    }

    fn dimensions(&self) -> usize {
        8
    }

    fn model_id(&self) -> &str {
        "down-stub"
    }
}

fn build_pipeline(
    provider: Arc<dyn EmbeddingProvider>,
    store: Arc<InMemoryVectorStore>,
) -> MatchPipeline {
    let config = MatchConfig::builder().chunk_size(200).chunk_overlap(40).top_k(20).build().unwrap();
    MatchPipeline::builder()
        .config(config.clone())
        .embedding_provider(provider)
        .vector_store(store)
        .chunker(Arc::new(
            RecursiveChunker::new(config.chunk_size, config.chunk_overlap).unwrap(),
        ))
        .build()
        .unwrap()
}

#[tokio::test]
async fn stub_embedder_is_deterministic() {
    let embedder = KeywordEmbedder::new();
    let a = embedder.embed("solar battery research").await.unwrap();
    let b = embedder.embed("solar battery research").await.unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn battery_query_ranks_battery_entity_first() {
    let store = Arc::new(InMemoryVectorStore::new());
    let pipeline = build_pipeline(Arc::new(KeywordEmbedder::new()), store);

    let corpus = vec![
        Document::new("member_a", "solar panel efficiency research"),
        Document::new("member_b", "battery chemistry research"),
    ];
    pipeline.index_corpus("profiles", &corpus).await.unwrap();

    let ranked = pipeline.rank("profiles", "battery storage projects", 20).await.unwrap();
    assert!(!ranked.is_empty());
    assert_eq!(ranked[0].entity_id, "member_b");
    // Descending scores, every profile has at least one contributing chunk.
    for window in ranked.windows(2) {
        assert!(window[0].match_score_percent >= window[1].match_score_percent);
    }
    assert!(ranked.iter().all(|p| !p.contributing_chunks.is_empty()));
}

#[tokio::test]
async fn empty_corpus_ranks_to_empty_sequence() {
    let store = Arc::new(InMemoryVectorStore::new());
    let pipeline = build_pipeline(Arc::new(KeywordEmbedder::new()), store);

    let ranked = pipeline.rank("profiles", "anything at all", 10).await.unwrap();
    assert!(ranked.is_empty());
}

#[tokio::test]
async fn query_results_are_sorted_ascending_and_bounded() {
    let store = Arc::new(InMemoryVectorStore::new());
    let pipeline = build_pipeline(Arc::new(KeywordEmbedder::new()), store);

    let corpus = vec![
        Document::new("a", "solar research"),
        Document::new("b", "battery research"),
        Document::new("c", "battery storage"),
        Document::new("d", "chemistry projects"),
    ];
    pipeline.index_corpus("profiles", &corpus).await.unwrap();

    let results = pipeline.query("profiles", "battery storage", 3).await.unwrap();
    assert!(results.len() <= 3);
    for window in results.windows(2) {
        assert!(window[0].distance <= window[1].distance);
    }
}

#[tokio::test]
async fn poisoned_chunk_is_dropped_without_failing_the_document() {
    let store = Arc::new(InMemoryVectorStore::new());
    let pipeline = MatchPipeline::builder()
        .config(MatchConfig::builder().chunk_size(30).chunk_overlap(5).build().unwrap())
        .embedding_provider(Arc::new(FlakyEmbedder { inner: KeywordEmbedder::new() }))
        .vector_store(store.clone())
        .chunker(Arc::new(RecursiveChunker::new(30, 5).unwrap()))
        .build()
        .unwrap();

    // Two paragraphs so the chunker produces separate chunks; one is poisoned.
    let doc = Document::new("member_x", "battery research notes\n\npoison paragraph here");
    let stored = pipeline.index_document("profiles", &doc).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].text.contains("battery"));
    assert_eq!(store.count("profiles").await, 1);
}

#[tokio::test]
async fn backend_unavailability_aborts_the_run() {
    let store = Arc::new(InMemoryVectorStore::new());
    let pipeline = build_pipeline(Arc::new(DownEmbedder), store);

    let corpus = vec![Document::new("a", "some text")];
    let err = pipeline.index_corpus("profiles", &corpus).await.unwrap_err();
    assert!(matches!(err, RetrievalError::EmbeddingBackend { .. }));
}

#[tokio::test]
async fn snapshot_round_trip_preserves_query_results() {
    let dir = tempfile::tempdir().unwrap();
    let embedder = Arc::new(KeywordEmbedder::new());

    let store = Arc::new(InMemoryVectorStore::new());
    let pipeline = build_pipeline(embedder.clone(), store.clone());
    let corpus = vec![
        Document::new("member_a", "solar panel efficiency research"),
        Document::new("member_b", "battery chemistry research"),
        Document::new("member_c", "battery storage projects"),
    ];
    pipeline.index_corpus("profiles", &corpus).await.unwrap();

    let before = pipeline.query("profiles", "battery storage", 10).await.unwrap();
    store.save(dir.path(), embedder.model_id(), embedder.dimensions()).await.unwrap();

    let loaded = Arc::new(InMemoryVectorStore::load(dir.path()).await.unwrap());
    let reloaded_pipeline = build_pipeline(embedder.clone(), loaded);
    let after = reloaded_pipeline.query("profiles", "battery storage", 10).await.unwrap();

    assert_eq!(before.len(), after.len());
    for (b, a) in before.iter().zip(after.iter()) {
        assert_eq!(b.chunk.id, a.chunk.id);
        assert_eq!(b.chunk.text, a.chunk.text);
        assert!((b.distance - a.distance).abs() < 1e-6);
    }

    // Sidecar is advisory but should record what we built with.
    let info = semrank_retrieval::snapshot::read_info(dir.path()).unwrap().unwrap();
    assert_eq!(info.embedding_model, "keyword-stub");
    assert_eq!(info.collections.get("profiles"), Some(&store.count("profiles").await));
}

#[tokio::test]
async fn loading_a_missing_snapshot_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = InMemoryVectorStore::load(dir.path().join("nope")).await.unwrap_err();
    assert!(matches!(err, RetrievalError::Snapshot(_)));
}
