//! TreeScanner - single scan pass over a subtree
//!
//! One `scan()` walks a subtree, evaluates each candidate title exactly
//! once (a marker attribute makes overlapping passes idempotent) and
//! hides the enclosing listing container when the title carries a full
//! calendar date.
//!
//! Every per-candidate step is fail-soft: a structural mismatch skips
//! that candidate and never aborts the pass. The only externally
//! observable failure mode is a dated item staying visible.

use serde::{Deserialize, Serialize};

use crate::dom::{DocumentTree, NodeId};
use crate::matcher::DateCortex;
use crate::scanner::titles::collect_candidates;

// =============================================================================
// Types
// =============================================================================

/// Marker attribute stamped on every evaluated candidate
pub const PROCESSED_ATTR: &str = "data-lv-scanned";

fn default_min_len() -> usize {
    6
}
fn default_max_len() -> usize {
    120
}
fn default_detail_marker() -> String {
    "/items/".to_string()
}

/// Build-time tunables for candidate filtering and page suppression
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ScanConfig {
    /// Minimum trimmed title length, in graphemes
    #[serde(default = "default_min_len")]
    pub candidate_min_len: usize,
    /// Maximum trimmed title length, in graphemes
    #[serde(default = "default_max_len")]
    pub candidate_max_len: usize,
    /// Path substring marking a single-item detail page; scanning is
    /// suppressed there
    #[serde(default = "default_detail_marker")]
    pub detail_path_marker: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            candidate_min_len: default_min_len(),
            candidate_max_len: default_max_len(),
            detail_path_marker: default_detail_marker(),
        }
    }
}

impl ScanConfig {
    /// Parse a (possibly partial) JSON object; absent fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to parse config: {}", e))
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("Failed to serialize config: {}", e))
    }
}

/// Counters for one scan pass
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScanOutcome {
    /// Candidates discovered under the scan root
    pub candidates: usize,
    /// Candidates skipped because a previous pass already stamped them
    pub already_marked: usize,
    /// Candidates evaluated by the date matcher this pass
    pub evaluated: usize,
    /// Evaluated candidates whose title carried a valid full date
    pub matched: usize,
    /// Containers newly hidden this pass
    pub hidden: usize,
    pub total_us: u64,
}

impl ScanOutcome {
    /// Fold another pass into this one (timing adds up)
    pub fn merge(&mut self, other: &ScanOutcome) {
        self.candidates += other.candidates;
        self.already_marked += other.already_marked;
        self.evaluated += other.evaluated;
        self.matched += other.matched;
        self.hidden += other.hidden;
        self.total_us += other.total_us;
    }
}

// =============================================================================
// TreeScanner
// =============================================================================

/// Container resolution order, most structurally specific first
const ARTICLE_TAGS: &[&str] = &["article"];
const LIST_ITEM_TAGS: &[&str] = &["li"];

/// Subtree scanner: candidate discovery, date evaluation, container hiding
pub struct TreeScanner {
    date_cortex: DateCortex,
    config: ScanConfig,
}

impl TreeScanner {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            date_cortex: DateCortex::new(),
            config,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan the subtree rooted at `root`.
    ///
    /// Side effects: stamps `PROCESSED_ATTR` on every visited candidate
    /// and hides zero or more containers. Re-running on an unchanged
    /// subtree performs no new evaluations and no new mutations.
    pub fn scan(&self, tree: &mut DocumentTree, root: NodeId) -> ScanOutcome {
        let start = instant::Instant::now();
        let mut outcome = ScanOutcome::default();

        let candidates = collect_candidates(tree, root, &self.config);
        outcome.candidates = candidates.len();

        for candidate in candidates {
            if tree.attr(candidate, PROCESSED_ATTR).is_some() {
                outcome.already_marked += 1;
                continue;
            }
            // Stamp before evaluating, so the candidate is never revisited
            // even if a later step bails out.
            if tree.set_attr(candidate, PROCESSED_ATTR, "1").is_err() {
                continue;
            }
            outcome.evaluated += 1;

            let title = tree.text_content(candidate);
            if self.date_cortex.evaluate(title.trim()).is_none() {
                continue;
            }
            outcome.matched += 1;

            // Missing container: skip silently, never abort the pass
            let container = match self.resolve_container(tree, candidate) {
                Some(container) => container,
                None => continue,
            };
            if tree.hide(container) {
                outcome.hidden += 1;
            }
        }

        outcome.total_us = start.elapsed().as_micros() as u64;
        outcome
    }

    /// Walk up from a title element to its listing container.
    ///
    /// Priority reflects decreasing structural confidence: an enclosing
    /// `article`, else an enclosing `li`, else the immediate parent
    /// element.
    fn resolve_container(&self, tree: &DocumentTree, title: NodeId) -> Option<NodeId> {
        if let Some(article) = tree.closest(title, ARTICLE_TAGS) {
            return Some(article);
        }
        if let Some(item) = tree.closest(title, LIST_ITEM_TAGS) {
            return Some(item);
        }
        tree.parent_element(title)
    }
}

impl Default for TreeScanner {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

// =============================================================================
// Tests
// =============================================================================
