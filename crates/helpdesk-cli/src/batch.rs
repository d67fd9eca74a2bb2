//! Batch classification: one description per line, classified concurrently.

use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use futures::stream::{self, StreamExt};
use helpdesk_ai::{ClassificationResult, Classifier, Source};
use helpdesk_core::Category;
use tokio::io::AsyncReadExt;

pub struct BatchStats {
    /// Input line and its result, in input order.
    pub results: Vec<(String, ClassificationResult)>,
    pub by_category: HashMap<Category, usize>,
    pub by_source: HashMap<Source, usize>,
    pub elapsed_secs: f64,
}

/// Read the whole input, from stdin when `path` is `-`.
pub async fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("reading stdin")?;
        Ok(buf)
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))
    }
}

/// Classify every non-blank line. At most `concurrency` classifications run
/// at once; results keep input order.
pub async fn run_batch(classifier: &Classifier, input: &str, concurrency: usize) -> BatchStats {
    let start = Instant::now();
    let lines: Vec<&str> = input
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let results: Vec<(String, ClassificationResult)> = stream::iter(lines)
        .map(|line| async move { (line.to_string(), classifier.classify(line).await) })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut by_category = HashMap::new();
    let mut by_source = HashMap::new();
    for (_, r) in &results {
        *by_category.entry(r.category).or_insert(0) += 1;
        *by_source.entry(r.source).or_insert(0) += 1;
    }

    BatchStats {
        results,
        by_category,
        by_source,
        elapsed_secs: start.elapsed().as_secs_f64(),
    }
}
