//! FilterConductor: page-lifetime coordinator for scan passes
//!
//! # Design Principles
//! 1. State machine: Uninitialized → Active | Suppressed
//! 2. One attach() per page load: suppression check + initial full scan
//! 3. Insertion batches drive incremental scans; there is no teardown
//!    path (the conductor's lifetime is the page's lifetime)
//!
//! # Usage
//! ```rust,ignore
//! let mut conductor = FilterConductor::new(ScanConfig::default());
//! conductor.attach(&mut tree, "/tags/rust");   // initial full scan
//! // ... host inserts more listing entries ...
//! conductor.pump(&mut tree);                    // scan what arrived
//! ```

use crate::dom::{DocumentTree, MutationRecord};
use crate::scanner::core::{ScanConfig, ScanOutcome, TreeScanner};

// =============================================================================
// State Machine
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Fresh instance, attach() not called yet
    Uninitialized,
    /// Page path names a single-item detail view: never scan
    Suppressed,
    /// Initial scan done, insertion batches are being consumed
    Active,
}

// =============================================================================
// FilterConductor
// =============================================================================

/// Single coordinator for all scanning on one page.
///
/// Owns the scanner; callers own the tree and the page path string.
pub struct FilterConductor {
    scanner: TreeScanner,
    state: State,
    passes: u64,
    hidden_total: u64,
}

impl FilterConductor {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            scanner: TreeScanner::new(config),
            state: State::Uninitialized,
            passes: 0,
            hidden_total: 0,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        self.scanner.config()
    }

    /// Initialize for a page: apply the suppression rule, then run the
    /// initial full-document scan.
    ///
    /// Detail pages (path contains the configured marker) suppress the
    /// conductor for the whole page lifetime and return `None`.
    /// Insertion records queued while the tree was being built are
    /// discarded: the full scan covers that content already.
    pub fn attach(&mut self, tree: &mut DocumentTree, page_path: &str) -> Option<ScanOutcome> {
        if page_path.contains(&self.scanner.config().detail_path_marker) {
            self.state = State::Suppressed;
            return None;
        }
        self.state = State::Active;
        tree.take_mutations();

        let outcome = self.scanner.scan(tree, tree.root());
        self.note(&outcome);
        Some(outcome)
    }

    /// Consume one insertion batch.
    ///
    /// Added nodes become scan roots in the order the host reported
    /// them; non-element nodes are filtered out. Returns the aggregated
    /// outcome, or `None` when not active (not yet attached, or
    /// suppressed).
    pub fn on_insertions(
        &mut self,
        tree: &mut DocumentTree,
        records: &[MutationRecord],
    ) -> Option<ScanOutcome> {
        if self.state != State::Active {
            return None;
        }
        let mut aggregate = ScanOutcome::default();
        for record in records {
            for &node in &record.added {
                if !tree.is_element(node) {
                    continue;
                }
                aggregate.merge(&self.scanner.scan(tree, node));
            }
        }
        self.note(&aggregate);
        Some(aggregate)
    }

    /// Drain the tree's queued insertions and consume them as one batch.
    ///
    /// The queue is drained even while suppressed, so it cannot grow
    /// without bound on detail pages.
    pub fn pump(&mut self, tree: &mut DocumentTree) -> Option<ScanOutcome> {
        let batch = tree.take_mutations();
        self.on_insertions(tree, &batch)
    }

    fn note(&mut self, outcome: &ScanOutcome) {
        self.passes += 1;
        self.hidden_total += outcome.hidden as u64;
    }

    // -------------------------------------------------------------------------
    // Introspection
    // -------------------------------------------------------------------------

    pub fn is_active(&self) -> bool {
        self.state == State::Active
    }

    pub fn is_suppressed(&self) -> bool {
        self.state == State::Suppressed
    }

    /// Current state name (for debugging)
    pub fn state_name(&self) -> &'static str {
        match self.state {
            State::Uninitialized => "uninitialized",
            State::Suppressed => "suppressed",
            State::Active => "active",
        }
    }

    /// Scan passes run so far (initial scan + one per consumed batch)
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Containers hidden over the page lifetime
    pub fn hidden_total(&self) -> u64 {
        self.hidden_total
    }
}

impl Default for FilterConductor {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeId;

    /// Assemble one listing entry detached, then attach it, the way a
    /// rendering engine inserts a finished card: one insertion record.
    fn listing_item(
        tree: &mut DocumentTree,
        parent: NodeId,
        title: &str,
    ) -> (NodeId, NodeId) {
        let container = tree.create_element("article");
        let heading = tree.create_element("h2");
        let link = tree.create_element("a");
        let text = tree.create_text(title);
        tree.append_child(container, heading).unwrap();
        tree.append_child(heading, link).unwrap();
        tree.append_child(link, text).unwrap();
        tree.append_child(parent, container).unwrap();
        (container, link)
    }

    #[test]
    fn test_end_to_end_listing_page() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let (dated, _) = listing_item(&mut tree, root, "2025年2月12日のまとめ");
        let (plain, _) = listing_item(&mut tree, root, "JavaScriptの基礎");
        let (invalid, _) = listing_item(&mut tree, root, "2025/2/31 の出来事まとめ");

        let mut conductor = FilterConductor::default();
        let outcome = conductor.attach(&mut tree, "/tags/rust").unwrap();

        assert!(tree.is_hidden(dated));
        assert!(!tree.is_hidden(plain));
        assert!(!tree.is_hidden(invalid));
        assert_eq!(outcome.hidden, 1);
        assert!(conductor.is_active());
        assert_eq!(conductor.hidden_total(), 1);
    }

    #[test]
    fn test_detail_page_is_suppressed() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let (dated, _) = listing_item(&mut tree, root, "2025年2月12日のまとめ");

        let mut conductor = FilterConductor::default();
        assert!(conductor
            .attach(&mut tree, "/someone/items/abc123")
            .is_none());
        assert!(conductor.is_suppressed());
        assert!(!tree.is_hidden(dated));

        // later insertions are swallowed too
        listing_item(&mut tree, root, "2024年1月1日の記録");
        assert!(conductor.pump(&mut tree).is_none());
        assert!(!tree.has_pending_mutations());
        assert_eq!(conductor.passes(), 0);
    }

    #[test]
    fn test_unattached_conductor_ignores_batches() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        listing_item(&mut tree, root, "2025年2月12日のまとめ");
        let mut conductor = FilterConductor::default();
        assert!(conductor.pump(&mut tree).is_none());
    }

    #[test]
    fn test_insertion_driven_scan() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let (old, old_link) = listing_item(&mut tree, root, "JavaScriptの基礎");

        let mut conductor = FilterConductor::default();
        conductor.attach(&mut tree, "/").unwrap();
        assert!(!tree.has_pending_mutations());

        // infinite scroll delivers a new dated entry
        let (fresh, _) = listing_item(&mut tree, root, "2025年2月12日のまとめ");
        let outcome = conductor.pump(&mut tree).unwrap();

        assert!(tree.is_hidden(fresh));
        assert!(!tree.is_hidden(old));
        // only the inserted subtree was walked: prior content untouched
        assert_eq!(outcome.candidates, 1);
        assert_eq!(outcome.already_marked, 0);
        assert_eq!(tree.attr(old_link, crate::scanner::PROCESSED_ATTR), Some("1"));
    }

    #[test]
    fn test_non_element_insertions_filtered() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let para = tree.create_element("p");
        tree.append_child(root, para).unwrap();

        let mut conductor = FilterConductor::default();
        conductor.attach(&mut tree, "/").unwrap();

        // a bare text node arrives alongside an element
        let loose_text = tree.create_text("2025年2月12日のまとめではない生テキスト");
        tree.append_child(para, loose_text).unwrap();
        let (fresh, _) = listing_item(&mut tree, root, "2025年2月12日のまとめ");

        let outcome = conductor.pump(&mut tree).unwrap();
        assert_eq!(outcome.candidates, 1);
        assert!(tree.is_hidden(fresh));
    }

    #[test]
    fn test_batches_processed_in_arrival_order() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let mut conductor = FilterConductor::default();
        conductor.attach(&mut tree, "/").unwrap();

        let (first, _) = listing_item(&mut tree, root, "2025年2月12日のまとめ");
        let first_batch = conductor.pump(&mut tree).unwrap();
        let (second, _) = listing_item(&mut tree, root, "2024年12月31日のまとめ");
        let second_batch = conductor.pump(&mut tree).unwrap();

        assert!(tree.is_hidden(first));
        assert!(tree.is_hidden(second));
        assert_eq!(first_batch.hidden, 1);
        assert_eq!(second_batch.hidden, 1);
        // attach + two batches
        assert_eq!(conductor.passes(), 3);
        assert_eq!(conductor.hidden_total(), 2);
    }

    #[test]
    fn test_nested_insertion_overlap_is_idempotent() {
        // A batch can report both a container and, in a later record, a
        // node nested inside it. The marker keeps the double coverage
        // free of double evaluation.
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let mut conductor = FilterConductor::default();
        conductor.attach(&mut tree, "/").unwrap();

        let (container, link) = listing_item(&mut tree, root, "2025年2月12日のまとめ");
        let mut records = tree.take_mutations();
        // host re-reports the link as its own insertion
        records.push(MutationRecord {
            target: container,
            added: vec![link],
        });

        let outcome = conductor.on_insertions(&mut tree, &records).unwrap();
        assert_eq!(outcome.evaluated, 1);
        assert_eq!(outcome.already_marked, 1);
        assert_eq!(outcome.hidden, 1);
    }

    #[test]
    fn test_custom_detail_marker() {
        let config = ScanConfig {
            detail_path_marker: "/entries/".to_string(),
            ..ScanConfig::default()
        };
        let mut tree = DocumentTree::new();
        let mut conductor = FilterConductor::new(config);
        assert!(conductor.attach(&mut tree, "/entries/42").is_none());

        let mut other = DocumentTree::new();
        let mut listing = FilterConductor::new(ScanConfig {
            detail_path_marker: "/entries/".to_string(),
            ..ScanConfig::default()
        });
        // the default marker no longer suppresses
        assert!(listing.attach(&mut other, "/items/abc").is_some());
    }
}
