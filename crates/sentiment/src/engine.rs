//! Analysis engine
//!
//! Scores single news items and batches. Title and summary are tallied
//! separately and the title tally is weighted up (`title_weight`), since
//! headlines carry the editorial framing. Batches are processed item by
//! item in input order; one bad item never aborts the rest.

use herald_core::{AnalysisResult, ImpactClass, NewsItem, clamp_confidence};
use log::{debug, warn};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::coins::CoinDetector;
use crate::error::{AnalysisError, AssessorError, Result};
use crate::lexicon::Lexicon;
use crate::scorer::KeywordScorer;

/// Verdict from an external assessor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    pub impact: ImpactClass,
    pub confidence: f64,
}

/// Optional external collaborator (e.g. a model-backed classifier) that
/// can refine the keyword verdict.
///
/// Returning `Ok(None)` means "no opinion". Errors never fail the item;
/// the engine falls back to the keyword verdict.
pub trait ImpactAssessor: Send + Sync {
    fn name(&self) -> &str;

    fn assess(
        &self,
        title: &str,
        summary: &str,
    ) -> std::result::Result<Option<Assessment>, AssessorError>;
}

/// Per-item outcome inside a batch
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Analyzed(AnalysisResult),
    Failed {
        request_id: String,
        error: AnalysisError,
    },
}

impl ItemOutcome {
    pub fn is_analyzed(&self) -> bool {
        matches!(self, ItemOutcome::Analyzed(_))
    }

    /// Uniform record: failures become the neutral error result
    pub fn into_result(self) -> AnalysisResult {
        match self {
            ItemOutcome::Analyzed(result) => result,
            ItemOutcome::Failed { request_id, error } => {
                AnalysisResult::failed(request_id, error.to_string())
            }
        }
    }
}

/// Orchestrates keyword scoring, coin detection and optional assessment
#[derive(Clone)]
pub struct AnalysisEngine {
    scorer: KeywordScorer,
    detector: CoinDetector,
    assessor: Option<Arc<dyn ImpactAssessor>>,
}

impl std::fmt::Debug for AnalysisEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisEngine")
            .field("scorer", &self.scorer)
            .field("detector", &self.detector)
            .field("assessor", &self.assessor.as_ref().map(|a| a.name().to_string()))
            .finish()
    }
}

impl AnalysisEngine {
    pub fn new(scorer: KeywordScorer, detector: CoinDetector) -> Self {
        Self {
            scorer,
            detector,
            assessor: None,
        }
    }

    /// Built-in lexicon, default vocabulary and default constants
    pub fn with_defaults() -> Self {
        Self::new(
            KeywordScorer::new(Arc::new(Lexicon::builtin())),
            CoinDetector::default(),
        )
    }

    /// Attach an external assessor
    pub fn with_assessor(mut self, assessor: Arc<dyn ImpactAssessor>) -> Self {
        self.assessor = Some(assessor);
        self
    }

    pub fn scorer(&self) -> &KeywordScorer {
        &self.scorer
    }

    pub fn detector(&self) -> &CoinDetector {
        &self.detector
    }

    pub fn lexicon(&self) -> &Lexicon {
        self.scorer.lexicon()
    }

    pub fn assessor_name(&self) -> Option<&str> {
        self.assessor.as_deref().map(|a| a.name())
    }

    /// Analyze one news item
    ///
    /// Empty title or summary is a validation error; no scoring happens.
    pub fn analyze_single(
        &self,
        title: &str,
        summary: &str,
        request_id: &str,
    ) -> Result<AnalysisResult> {
        let title = title.trim();
        let summary = summary.trim();
        match (title.is_empty(), summary.is_empty()) {
            (true, true) => return Err(AnalysisError::MissingContent),
            (true, false) => return Err(AnalysisError::MissingTitle),
            (false, true) => return Err(AnalysisError::MissingSummary),
            (false, false) => {}
        }

        let weight = self.scorer.config().title_weight;
        let tally = self.scorer.tally(title).scaled(weight) + self.scorer.tally(summary);
        let keyword = self.scorer.classify(&tally);
        let (impact, confidence) = match self.consult_assessor(title, summary, request_id) {
            Some(assessment) => blend(keyword, assessment),
            None => keyword,
        };

        let coins = self.detector.detect_ordered(title, summary);
        debug!(
            "Analyzed {}: {} ({:.1}) coins={:?}",
            request_id, impact, confidence, coins
        );

        Ok(AnalysisResult::new(impact, confidence, coins, request_id))
    }

    /// Analyze one batch item, containing any failure in the outcome
    pub fn analyze_item(&self, item: &NewsItem, request_id: &str) -> ItemOutcome {
        let attempt = panic::catch_unwind(AssertUnwindSafe(|| {
            self.analyze_single(&item.title, &item.summary, request_id)
        }));

        match attempt {
            Ok(Ok(result)) => ItemOutcome::Analyzed(result),
            Ok(Err(error)) => {
                debug!("Item {} rejected: {}", request_id, error);
                ItemOutcome::Failed {
                    request_id: request_id.to_string(),
                    error,
                }
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!("Item {} failed while scoring: {}", request_id, message);
                ItemOutcome::Failed {
                    request_id: request_id.to_string(),
                    error: AnalysisError::Internal(message),
                }
            }
        }
    }

    /// Analyze every item; outcome `i` belongs to item `i`
    pub fn analyze_batch_outcomes(&self, items: &[NewsItem], request_id: &str) -> Vec<ItemOutcome> {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| self.analyze_item(item, &item_request_id(request_id, index)))
            .collect()
    }

    /// Analyze every item into a uniform result sequence of the same length
    pub fn analyze_batch(&self, items: &[NewsItem], request_id: &str) -> Vec<AnalysisResult> {
        let outcomes = self.analyze_batch_outcomes(items, request_id);
        let failed = outcomes.iter().filter(|o| !o.is_analyzed()).count();
        if failed > 0 {
            debug!(
                "Batch {}: {} of {} items failed",
                request_id,
                failed,
                outcomes.len()
            );
        }
        outcomes.into_iter().map(ItemOutcome::into_result).collect()
    }

    fn consult_assessor(&self, title: &str, summary: &str, request_id: &str) -> Option<Assessment> {
        let assessor = self.assessor.as_ref()?;
        match assessor.assess(title, summary) {
            Ok(assessment) => assessment,
            Err(e) => {
                warn!("{}: falling back to keyword verdict: {}", request_id, e);
                None
            }
        }
    }
}

/// Request id of item `index` within batch `request_id`
pub fn item_request_id(request_id: &str, index: usize) -> String {
    format!("{}_item_{}", request_id, index)
}

/// Merge keyword and assessor verdicts
///
/// Agreement: mean confidence, never below the keyword confidence.
/// Disagreement: the more confident verdict wins.
fn blend(keyword: (ImpactClass, f64), assessment: Assessment) -> (ImpactClass, f64) {
    let (impact, confidence) = keyword;
    let assessed = clamp_confidence(assessment.confidence);
    if assessment.impact == impact {
        (impact, confidence.max((confidence + assessed) / 2.0))
    } else if assessed > confidence {
        (assessment.impact, assessed)
    } else {
        keyword
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
