//! End-to-end ingestion pipeline: documents → chunks → vectors → index.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::config::RagConfig;
use crate::embed::Embedder;
use crate::errors::RagError;
use crate::index::VectorIndex;
use crate::record::{Document, IndexEntry, IngestReport};
use crate::splitter::Splitter;

/// Splits, embeds and indexes the given documents.
///
/// Upserts run in `cfg.upsert_batch`-sized batches; when `progress` is set a
/// progress bar tracks them on stderr. Fails with [`RagError::NoChunks`] when
/// splitting leaves nothing to index.
pub(crate) async fn ingest_documents(
    cfg: &RagConfig,
    embedder: &Embedder,
    index: &dyn VectorIndex,
    documents: Vec<Document>,
    progress: bool,
) -> Result<IngestReport, RagError> {
    let pages_loaded = documents.len();

    let chunks = Splitter::from_config(cfg)?.split_documents(&documents);
    if chunks.is_empty() {
        return Err(RagError::NoChunks);
    }
    let chunks_created = chunks.len();
    info!(
        pages = pages_loaded,
        chunks = chunks_created,
        "split documents"
    );

    let entries: Vec<IndexEntry> = embedder
        .embed_documents(chunks)
        .await?
        .into_iter()
        .map(|(vector, chunk)| IndexEntry::from_pair(vector, chunk))
        .collect();

    let batch_size = cfg.upsert_batch.max(1);
    let total_batches = entries.len().div_ceil(batch_size);
    let pb = progress.then(|| {
        let pb = ProgressBar::new(total_batches as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
        ) {
            pb.set_style(style.progress_chars("##-"));
        }
        pb
    });

    let mut items_added = 0usize;
    for batch in entries.chunks(batch_size) {
        items_added += index.add(batch.to_vec()).await?;
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }
    if let Some(pb) = &pb {
        pb.finish_with_message("indexed");
    }

    info!(items_added, "ingestion complete");
    Ok(IngestReport {
        pages_loaded,
        chunks_created,
        items_added,
    })
}
