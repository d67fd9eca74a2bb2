//! Cross-encoder reranking stage.
//!
//! The description is the query and each category's passage a candidate; the
//! best-scoring passage decides the category.

use std::sync::Arc;

use async_trait::async_trait;
use helpdesk_core::Category;
use tracing::debug;

use crate::labels::category_passages;
use crate::{ClassifyError, Source, Stage};

/// Scores how well each passage answers the query.
///
/// Implementations return exactly one score per passage, in passage order.
#[async_trait]
pub trait Reranker: Send + Sync {
    async fn score(&self, query: &str, passages: &[&str]) -> Result<Vec<f32>, ClassifyError>;
}

pub struct RerankStage {
    reranker: Arc<dyn Reranker>,
}

impl RerankStage {
    pub fn new(reranker: Arc<dyn Reranker>) -> Self {
        Self { reranker }
    }
}

/// Index of the highest score. Ties keep the earlier index.
fn best_index(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &s) in scores.iter().enumerate() {
        match best {
            Some((_, b)) if s <= b => {}
            _ => best = Some((i, s)),
        }
    }
    best.map(|(i, _)| i)
}

#[async_trait]
impl Stage for RerankStage {
    fn source(&self) -> Source {
        Source::Reranker
    }

    fn is_remote(&self) -> bool {
        true
    }

    async fn attempt(&self, description: &str) -> Result<Category, ClassifyError> {
        let passages = category_passages();
        let scores = self.reranker.score(description, &passages).await?;

        if scores.len() != Category::ALL.len() {
            return Err(ClassifyError::RemoteMalformedResponse(format!(
                "expected {} scores, got {}",
                Category::ALL.len(),
                scores.len()
            )));
        }
        if let Some(bad) = scores.iter().find(|s| !s.is_finite()) {
            return Err(ClassifyError::RemoteMalformedResponse(format!(
                "non-finite score {bad}"
            )));
        }

        debug!(?scores, "reranker scores");
        let idx = best_index(&scores).ok_or(ClassifyError::NoConfidentMatch)?;
        Ok(Category::ALL[idx])
    }
}

#[cfg(feature = "http")]
pub use http::HttpReranker;

#[cfg(feature = "http")]
mod http {
    use std::fmt;

    use async_trait::async_trait;
    use serde::{Deserialize, Serialize};

    use super::Reranker;
    use crate::{ClassifyError, RemoteModelConfig};

    #[derive(Serialize)]
    struct RerankRequest<'a> {
        model: &'a str,
        query: &'a str,
        documents: &'a [&'a str],
    }

    #[derive(Deserialize)]
    struct RerankResponse {
        results: Vec<RerankResult>,
    }

    #[derive(Deserialize)]
    struct RerankResult {
        index: usize,
        relevance_score: f32,
    }

    /// Reranker backed by a Cohere-style `/rerank` HTTP endpoint.
    pub struct HttpReranker {
        client: reqwest::Client,
        endpoint: String,
        api_key: String,
        model: String,
    }

    impl fmt::Debug for HttpReranker {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("HttpReranker")
                .field("endpoint", &self.endpoint)
                .field("model", &self.model)
                .finish()
        }
    }

    impl HttpReranker {
        pub fn new(config: &RemoteModelConfig) -> Self {
            Self {
                client: reqwest::Client::new(),
                endpoint: config.endpoint.clone(),
                api_key: config.api_key.clone(),
                model: config.model.clone(),
            }
        }
    }

    /// Reorder `(index, score)` results into one score per document.
    fn align_scores(results: Vec<RerankResult>, n: usize) -> Result<Vec<f32>, ClassifyError> {
        let mut slots: Vec<Option<f32>> = vec![None; n];
        for r in results {
            let slot = slots.get_mut(r.index).ok_or_else(|| {
                ClassifyError::RemoteMalformedResponse(format!(
                    "result index {} out of range for {n} documents",
                    r.index
                ))
            })?;
            if slot.replace(r.relevance_score).is_some() {
                return Err(ClassifyError::RemoteMalformedResponse(format!(
                    "duplicate result for document {}",
                    r.index
                )));
            }
        }
        slots
            .into_iter()
            .enumerate()
            .map(|(i, s)| {
                s.ok_or_else(|| {
                    ClassifyError::RemoteMalformedResponse(format!("no score for document {i}"))
                })
            })
            .collect()
    }

    #[async_trait]
    impl Reranker for HttpReranker {
        async fn score(&self, query: &str, passages: &[&str]) -> Result<Vec<f32>, ClassifyError> {
            let body = RerankRequest {
                model: &self.model,
                query,
                documents: passages,
            };

            let resp = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await?;
            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(ClassifyError::from_status(status.as_u16(), body));
            }

            let parsed: RerankResponse = resp.json().await?;
            align_scores(parsed.results, passages.len())
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedScores(Vec<f32>);

    #[async_trait]
    impl Reranker for FixedScores {
        async fn score(&self, _: &str, passages: &[&str]) -> Result<Vec<f32>, ClassifyError> {
            assert_eq!(passages.len(), 4);
            Ok(self.0.clone())
        }
    }

    fn stage(scores: Vec<f32>) -> RerankStage {
        RerankStage::new(Arc::new(FixedScores(scores)))
    }

    #[tokio::test]
    async fn highest_score_wins() {
        let c = stage(vec![0.2, 0.1, 0.05, 0.05]).attempt("x").await.unwrap();
        assert_eq!(c, Category::TechnicalIssue);

        let c = stage(vec![0.1, 0.2, 0.7, 0.3]).attempt("x").await.unwrap();
        assert_eq!(c, Category::BillingIssue);
    }

    #[tokio::test]
    async fn ties_go_to_first_category() {
        let c = stage(vec![0.1, 0.4, 0.4, 0.4]).attempt("x").await.unwrap();
        assert_eq!(c, Category::AccountIssue);
    }

    #[tokio::test]
    async fn wrong_length_is_malformed() {
        let err = stage(vec![0.9, 0.1]).attempt("x").await.unwrap_err();
        assert!(matches!(err, ClassifyError::RemoteMalformedResponse(_)));
    }

    #[tokio::test]
    async fn nan_is_malformed() {
        let err = stage(vec![0.1, f32::NAN, 0.2, 0.3])
            .attempt("x")
            .await
            .unwrap_err();
        assert!(matches!(err, ClassifyError::RemoteMalformedResponse(_)));
    }

    #[test]
    fn best_index_basics() {
        assert_eq!(best_index(&[]), None);
        assert_eq!(best_index(&[-1.0, -0.5]), Some(1));
        assert_eq!(best_index(&[3.0, 3.0]), Some(0));
    }
}
