//! Summarization model boundary
//!
//! [`SummaryModel`] is the contract for an abstractive summarization
//! capability: given a prompt and generation parameters it produces a shorter
//! paraphrase, or fails. Calls may be slow; the [`Summarizer`] bounds them
//! with a timeout.
//!
//! [`LazyModel`] is an explicitly owned handle that loads the model on first
//! use and is shared by cloning, so heavy models are not loaded at startup
//! and tests can substitute a fake.
//!
//! [`Summarizer`]: crate::summarizer::policy::Summarizer

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use crate::config::SummarizerConfig;
use crate::errors::{PipelineError, Result};

/// Decoding parameters handed to the model.
///
/// These are tuning knobs; any model that produces a fluent, shorter
/// paraphrase within `[min_length, max_length]` words is conformant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_length: usize,
    pub min_length: usize,
    pub length_penalty: f64,
    pub num_beams: usize,
    pub early_stopping: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::from(&SummarizerConfig::default())
    }
}

impl From<&SummarizerConfig> for GenerationParams {
    fn from(config: &SummarizerConfig) -> Self {
        Self {
            max_length: config.max_length,
            min_length: config.min_length,
            length_penalty: config.length_penalty,
            num_beams: config.num_beams,
            early_stopping: config.early_stopping,
        }
    }
}

/// An abstractive summarization capability.
pub trait SummaryModel: Send + Sync {
    /// Generate a summary of `prompt`.
    fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> impl Future<Output = Result<String>> + Send;
}

impl<M: SummaryModel> SummaryModel for &M {
    fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> impl Future<Output = Result<String>> + Send {
        (**self).generate(prompt, params)
    }
}

impl<M: SummaryModel> SummaryModel for Arc<M> {
    fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> impl Future<Output = Result<String>> + Send {
        (**self).generate(prompt, params)
    }
}

// ============================================================================
// LazyModel
// ============================================================================

type Loader<M> = Arc<dyn Fn() -> Result<M> + Send + Sync>;

/// Lazily loaded, cheaply cloneable model handle.
///
/// The loader runs at most once successfully; clones share the loaded model.
/// A failed load is not cached, so the next call tries again.
pub struct LazyModel<M> {
    cell: Arc<OnceCell<M>>,
    loader: Loader<M>,
}

impl<M: Send + Sync> LazyModel<M> {
    pub fn new(loader: impl Fn() -> Result<M> + Send + Sync + 'static) -> Self {
        Self {
            cell: Arc::new(OnceCell::new()),
            loader: Arc::new(loader),
        }
    }

    /// Wrap an already loaded model.
    pub fn loaded(model: M) -> Self {
        Self {
            cell: Arc::new(OnceCell::from(model)),
            loader: Arc::new(|| -> Result<M> {
                Err(PipelineError::Model("model handle has no loader".into()))
            }),
        }
    }

    /// Borrow the model, loading it first if needed.
    pub async fn get(&self) -> Result<&M> {
        self.cell
            .get_or_try_init(|| async { (self.loader)() })
            .await
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }
}

impl<M> Clone for LazyModel<M> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
            loader: Arc::clone(&self.loader),
        }
    }
}

impl<M> std::fmt::Debug for LazyModel<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyModel")
            .field("loaded", &self.cell.initialized())
            .finish()
    }
}

impl<M: SummaryModel> SummaryModel for LazyModel<M> {
    fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> impl Future<Output = Result<String>> + Send {
        async move {
            let model = self.get().await?;
            model.generate(prompt, params).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Echo;

    impl SummaryModel for Echo {
        async fn generate(&self, prompt: &str, _params: &GenerationParams) -> Result<String> {
            Ok(prompt.to_string())
        }
    }

    #[test]
    fn test_params_from_config() {
        let config = SummarizerConfig {
            max_length: 40,
            num_beams: 2,
            ..Default::default()
        };
        let params = GenerationParams::from(&config);
        assert_eq!(params.max_length, 40);
        assert_eq!(params.min_length, 20);
        assert_eq!(params.num_beams, 2);
        assert!(params.early_stopping);
        assert_eq!(params.length_penalty, 2.0);
    }

    #[tokio::test]
    async fn test_lazy_model_loads_once() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loads);
        let model = LazyModel::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Echo)
        });
        let shared = model.clone();
        assert!(!model.is_loaded());

        let params = GenerationParams::default();
        assert_eq!(model.generate("a", &params).await.unwrap(), "a");
        assert_eq!(shared.generate("b", &params).await.unwrap(), "b");

        assert!(shared.is_loaded());
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let model = LazyModel::new(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(PipelineError::Model("weights missing".into()))
            } else {
                Ok(Echo)
            }
        });
        let params = GenerationParams::default();

        let err = model.generate("x", &params).await.unwrap_err();
        assert!(matches!(err, PipelineError::Model(_)));
        assert!(!model.is_loaded());

        assert_eq!(model.generate("x", &params).await.unwrap(), "x");
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_preloaded_and_blanket_impls() {
        let model = Arc::new(LazyModel::loaded(Echo));
        assert!(model.is_loaded());

        async fn run<M: SummaryModel>(model: M) -> String {
            model
                .generate("hobbit", &GenerationParams::default())
                .await
                .unwrap()
        }
        assert_eq!(run(&model).await, "hobbit");
        assert_eq!(run(Arc::clone(&model)).await, "hobbit");
    }
}
