//! Pipeline runner: orchestrates the three request stages.
//!
//! [`QueryPipeline`] sequences keyphrase extraction, summarization and
//! catalog scoring. Each stage consumes the previous stage's full output,
//! so stages run strictly in order; only scoring fans out across records.
//!
//! # Static dispatch
//!
//! `QueryPipeline` is generic over the entity recognizer and summary model,
//! so each combination is monomorphized. Tests substitute fakes by choosing
//! different type parameters; production wires in [`LazyRecognizer`] /
//! [`LazyModel`] handles shared across pipelines.
//!
//! # Concurrency
//!
//! Running takes `&self` and borrows the catalog immutably. Every request
//! owns its keyphrases, summary and scored records, so any number of
//! requests may share one pipeline and one catalog.
//!
//! [`LazyRecognizer`]: crate::nlp::entities::LazyRecognizer
//! [`LazyModel`]: crate::summarizer::model::LazyModel

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::config::PipelineConfig;
use crate::errors::{PipelineError, Result};
use crate::nlp::entities::EntityRecognizer;
use crate::phrase::extraction::KeyphraseExtractor;
use crate::pipeline::observer::{
    NoopObserver, PipelineObserver, StageClock, StageReport, STAGE_EXTRACT, STAGE_SCORE,
    STAGE_SUMMARIZE,
};
use crate::scoring::scorer::RelevanceScorer;
use crate::summarizer::model::SummaryModel;
use crate::summarizer::policy::Summarizer;
use crate::types::{CatalogRecord, KeyphraseSet, RankedResult, Summary};

/// Tracing span for a pipeline stage.
macro_rules! trace_stage {
    ($name:expr) => {
        tracing::info_span!("pipeline_stage", stage = $name)
    };
}

// ============================================================================
// Request options and outcome
// ============================================================================

/// Per-request result sizes and an optional model timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    pub top_k_keyphrases: usize,
    pub top_k_results: usize,
    /// Overrides `summarizer.timeout_ms` for this request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            top_k_keyphrases: 5,
            top_k_results: 10,
            timeout_ms: None,
        }
    }
}

impl RunOptions {
    pub fn new(top_k_keyphrases: usize, top_k_results: usize) -> Self {
        Self {
            top_k_keyphrases,
            top_k_results,
            timeout_ms: None,
        }
    }

    /// Give the summary model at most `timeout` for this request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_k_keyphrases == 0 {
            return Err(PipelineError::InvalidConfiguration(
                "top_k_keyphrases must be greater than 0".into(),
            ));
        }
        if self.top_k_results == 0 {
            return Err(PipelineError::InvalidConfiguration(
                "top_k_results must be greater than 0".into(),
            ));
        }
        if self.timeout_ms == Some(0) {
            return Err(PipelineError::InvalidConfiguration(
                "timeout_ms must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Everything one request produced.
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutcome<'a> {
    pub keyphrases: KeyphraseSet,
    pub summary: Summary,
    pub results: RankedResult<'a>,
}

impl<'a> QueryOutcome<'a> {
    fn empty(raw: &str) -> Self {
        Self {
            keyphrases: KeyphraseSet::new(),
            summary: Summary::passthrough(raw),
            results: RankedResult::empty(),
        }
    }
}

// ============================================================================
// QueryPipeline
// ============================================================================

/// Extract → summarize → score.
#[derive(Debug, Clone)]
pub struct QueryPipeline<R, M> {
    extractor: KeyphraseExtractor<R>,
    summarizer: Summarizer<M>,
    scorer: RelevanceScorer,
    config: PipelineConfig,
}

impl<R: EntityRecognizer, M: SummaryModel> QueryPipeline<R, M> {
    /// Build a pipeline. Invalid configuration fails here, never per request.
    pub fn new(config: PipelineConfig, recognizer: R, model: M) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            extractor: KeyphraseExtractor::from_config(recognizer, &config.extractor)?,
            summarizer: Summarizer::new(model, config.summarizer.clone())?,
            scorer: RelevanceScorer::from_config(&config.scorer),
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn extractor(&self) -> &KeyphraseExtractor<R> {
        &self.extractor
    }

    pub fn summarizer(&self) -> &Summarizer<M> {
        &self.summarizer
    }

    /// Result sizes taken from the configuration.
    pub fn default_options(&self) -> RunOptions {
        RunOptions::new(self.config.extractor.top_n, self.config.scorer.top_k)
    }

    /// Run with the configured result sizes.
    pub async fn run<'a>(&self, raw: &str, catalog: &'a [CatalogRecord]) -> Result<QueryOutcome<'a>> {
        self.run_with(raw, catalog, self.default_options()).await
    }

    pub async fn run_with<'a>(
        &self,
        raw: &str,
        catalog: &'a [CatalogRecord],
        options: RunOptions,
    ) -> Result<QueryOutcome<'a>> {
        self.run_observed(raw, catalog, options, &mut NoopObserver)
            .await
    }

    /// Run and return only the ranked records.
    pub async fn rank<'a>(
        &self,
        raw: &str,
        catalog: &'a [CatalogRecord],
        options: RunOptions,
    ) -> Result<RankedResult<'a>> {
        Ok(self.run_with(raw, catalog, options).await?.results)
    }

    /// Run, notifying `observer` at every stage boundary.
    ///
    /// Empty or whitespace-only input returns empty keyphrases and results
    /// with the input as a passthrough summary; no stage runs.
    pub async fn run_observed<'a>(
        &self,
        raw: &str,
        catalog: &'a [CatalogRecord],
        options: RunOptions,
        observer: &mut impl PipelineObserver,
    ) -> Result<QueryOutcome<'a>> {
        options.validate()?;
        if raw.trim().is_empty() {
            tracing::debug!("empty input; skipping pipeline stages");
            return Ok(QueryOutcome::empty(raw));
        }
        tracing::trace!(input = raw, "pipeline request");

        // Stage 1: Extract keyphrases
        observer.on_stage_start(STAGE_EXTRACT);
        let clock = StageClock::start();
        let keyphrases = {
            let _span = trace_stage!(STAGE_EXTRACT).entered();
            self.extractor
                .extract(raw, self.extractor.bounds(), options.top_k_keyphrases)
        };
        let report = StageReport::new(clock.elapsed()).with_items(keyphrases.len());
        observer.on_stage_end(STAGE_EXTRACT, &report);
        observer.on_keyphrases(&keyphrases);

        // Stage 2: Summarize
        observer.on_stage_start(STAGE_SUMMARIZE);
        let clock = StageClock::start();
        let summary = self
            .summarizer
            .summarize_or_fallback(raw, options.timeout())
            .instrument(trace_stage!(STAGE_SUMMARIZE))
            .await?;
        let report = StageReport::new(clock.elapsed());
        observer.on_stage_end(STAGE_SUMMARIZE, &report);
        observer.on_summary(&summary);

        // Stage 3: Score catalog
        observer.on_stage_start(STAGE_SCORE);
        let clock = StageClock::start();
        let results = {
            let _span = trace_stage!(STAGE_SCORE).entered();
            self.scorer
                .score(&keyphrases, &summary, catalog, options.top_k_results)
        };
        let report = StageReport::new(clock.elapsed()).with_items(results.len());
        observer.on_stage_end(STAGE_SCORE, &report);
        observer.on_results(&results);

        tracing::debug!(
            keyphrases = keyphrases.len(),
            summary_kind = ?summary.kind,
            results = results.len(),
            "pipeline finished"
        );

        Ok(QueryOutcome {
            keyphrases,
            summary,
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SummaryFallback;
    use crate::nlp::entities::{HeuristicRecognizer, NoopRecognizer};
    use crate::pipeline::observer::StageTimingObserver;
    use crate::summarizer::model::GenerationParams;
    use crate::types::SummaryKind;

    const FRODO: &str = "The Lord of the Rings is a story about a hobbit named Frodo Baggins who must destroy a powerful ring in Mordor.";

    struct FixedModel(&'static str);

    impl SummaryModel for FixedModel {
        async fn generate(&self, _prompt: &str, _params: &GenerationParams) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct DownModel;

    impl SummaryModel for DownModel {
        async fn generate(&self, _prompt: &str, _params: &GenerationParams) -> Result<String> {
            Err(PipelineError::Model("connection refused".into()))
        }
    }

    fn catalog() -> Vec<CatalogRecord> {
        vec![
            CatalogRecord::new("unrelated")
                .with_title("A Brief History of Time")
                .with_description("Cosmology for the general reader."),
            CatalogRecord::new("lotr")
                .with_title("The Lord of the Rings")
                .with_characters("Frodo Baggins, Gandalf")
                .with_description("A hobbit must destroy a powerful ring."),
        ]
    }

    fn pipeline<M: SummaryModel>(model: M) -> QueryPipeline<HeuristicRecognizer, M> {
        QueryPipeline::new(PipelineConfig::default(), HeuristicRecognizer::new(), model).unwrap()
    }

    #[tokio::test]
    async fn test_run_end_to_end() {
        let pipeline = pipeline(FixedModel("A hobbit must destroy a powerful ring."));
        let records = catalog();
        let outcome = pipeline.run(FRODO, &records).await.unwrap();

        assert!(outcome.keyphrases.contains("Frodo Baggins"));
        assert_eq!(outcome.summary.kind, SummaryKind::Generated);
        assert_eq!(outcome.results.ids(), vec!["lotr", "unrelated"]);
    }

    #[tokio::test]
    async fn test_rank_uses_options() {
        let pipeline = pipeline(FixedModel("a ring"));
        let records = catalog();
        let ranked = pipeline
            .rank(FRODO, &records, RunOptions::new(5, 1))
            .await
            .unwrap();
        assert_eq!(ranked.ids(), vec!["lotr"]);
    }

    #[tokio::test]
    async fn test_zero_top_k_rejected() {
        let pipeline = pipeline(FixedModel("a ring"));
        let records = catalog();
        for options in [RunOptions::new(0, 10), RunOptions::new(5, 0)] {
            assert!(matches!(
                pipeline.run_with(FRODO, &records, options).await,
                Err(PipelineError::InvalidConfiguration(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_zero_timeout_rejected() {
        let pipeline = pipeline(FixedModel("a ring"));
        let records = catalog();
        let options = RunOptions::default().with_timeout(Duration::ZERO);
        assert!(matches!(
            pipeline.run_with(FRODO, &records, options).await,
            Err(PipelineError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_run_options_timeout_serde() {
        let options: RunOptions =
            serde_json::from_str(r#"{"top_k_keyphrases": 3, "top_k_results": 7}"#).unwrap();
        assert_eq!(options.timeout(), None);

        let options: RunOptions = serde_json::from_str(
            r#"{"top_k_keyphrases": 3, "top_k_results": 7, "timeout_ms": 250}"#,
        )
        .unwrap();
        assert_eq!(options.timeout(), Some(Duration::from_millis(250)));
        assert_eq!(
            RunOptions::new(3, 7).with_timeout(Duration::from_millis(250)),
            options
        );
    }

    #[test]
    fn test_invalid_config_fails_at_construction() {
        let mut config = PipelineConfig::default();
        config.scorer.top_k = 0;
        assert!(matches!(
            QueryPipeline::new(config, NoopRecognizer, FixedModel("x")),
            Err(PipelineError::InvalidConfiguration(_))
        ));

        let mut config = PipelineConfig::default();
        config.extractor.min_phrase_words = 4;
        config.extractor.max_phrase_words = 2;
        assert!(QueryPipeline::new(config, NoopRecognizer, FixedModel("x")).is_err());
    }

    #[tokio::test]
    async fn test_empty_input() {
        let pipeline = pipeline(FixedModel("unused"));
        let records = catalog();
        let outcome = pipeline.run("   ", &records).await.unwrap();

        assert!(outcome.keyphrases.is_empty());
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.summary.kind, SummaryKind::Passthrough);
    }

    #[tokio::test]
    async fn test_model_down_falls_back() {
        let pipeline = pipeline(DownModel);
        let records = catalog();
        let outcome = pipeline.run(FRODO, &records).await.unwrap();

        assert_eq!(outcome.summary.kind, SummaryKind::Fallback);
        assert_eq!(outcome.summary.text, FRODO);
        assert_eq!(outcome.results.len(), 2);
    }

    #[tokio::test]
    async fn test_request_timeout_overrides_config() {
        struct StalledModel;

        impl SummaryModel for StalledModel {
            async fn generate(&self, _prompt: &str, _params: &GenerationParams) -> Result<String> {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok("never".into())
            }
        }

        let pipeline = pipeline(StalledModel);
        let records = catalog();
        let options = RunOptions::default().with_timeout(Duration::from_millis(20));
        let outcome = pipeline.run_with(FRODO, &records, options).await.unwrap();

        assert_eq!(outcome.summary.kind, SummaryKind::Fallback);
        assert_eq!(outcome.results.len(), 2);
    }

    #[tokio::test]
    async fn test_model_down_fail_policy() {
        let mut config = PipelineConfig::default();
        config.summarizer.fallback = SummaryFallback::Fail;
        let pipeline = QueryPipeline::new(config, HeuristicRecognizer::new(), DownModel).unwrap();
        let records = catalog();

        assert!(matches!(
            pipeline.run(FRODO, &records).await,
            Err(PipelineError::SummarizationUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_run_observed_reports_each_stage() {
        let pipeline = pipeline(FixedModel("a ring"));
        let records = catalog();
        let mut obs = StageTimingObserver::new();

        let outcome = pipeline
            .run_observed(FRODO, &records, RunOptions::default(), &mut obs)
            .await
            .unwrap();

        let names: Vec<&str> = obs.reports().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec![STAGE_EXTRACT, STAGE_SUMMARIZE, STAGE_SCORE]);
        assert_eq!(
            obs.report(STAGE_EXTRACT).and_then(|r| r.items()),
            Some(outcome.keyphrases.len())
        );
        assert_eq!(obs.report(STAGE_SCORE).and_then(|r| r.items()), Some(2));
    }
}
