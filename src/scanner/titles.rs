//! Candidate title discovery
//!
//! Conservative structural heuristic for "this link is probably an
//! article title": a link inside an `h1`/`h2`/`h3`, or a generic
//! internal link (`href` starting with `/`), with trimmed text length
//! inside configured bounds. The bounds cut icon-only links and long
//! paragraph-like links, which are the main false-positive sources on
//! listing markup.

use unicode_segmentation::UnicodeSegmentation;

use crate::dom::{DocumentTree, NodeId};
use crate::scanner::core::ScanConfig;

/// Heading tags whose embedded links are always title candidates
pub const HEADING_TAGS: &[&str] = &["h1", "h2", "h3"];

/// Collect candidate title elements in the subtree rooted at `root`.
///
/// The walk includes `root` itself, so a bare link reported as an
/// inserted node is still considered. Results are in document order.
pub fn collect_candidates(tree: &DocumentTree, root: NodeId, config: &ScanConfig) -> Vec<NodeId> {
    tree.descendants(root)
        .into_iter()
        .filter(|&id| is_title_link(tree, id) && text_length_ok(tree, id, config))
        .collect()
}

fn is_title_link(tree: &DocumentTree, id: NodeId) -> bool {
    if tree.tag(id) != Some("a") {
        return false;
    }
    // The heading may sit above the scan root; the full ancestor chain is
    // checked, matching how CSS "h1 a" would match.
    if tree.closest(id, HEADING_TAGS).is_some() {
        return true;
    }
    tree.attr(id, "href")
        .map(|href| href.starts_with('/'))
        .unwrap_or(false)
}

fn text_length_ok(tree: &DocumentTree, id: NodeId, config: &ScanConfig) -> bool {
    let text = tree.text_content(id);
    let len = text.trim().graphemes(true).count();
    len >= config.candidate_min_len && len <= config.candidate_max_len
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn attach_link(
        tree: &mut DocumentTree,
        parent: NodeId,
        href: Option<&str>,
        text: &str,
    ) -> NodeId {
        let link = tree.create_element("a");
        if let Some(href) = href {
            tree.set_attr(link, "href", href).unwrap();
        }
        let title = tree.create_text(text);
        tree.append_child(parent, link).unwrap();
        tree.append_child(link, title).unwrap();
        link
    }

    #[test]
    fn test_heading_link_is_candidate_without_href() {
        let mut tree = DocumentTree::new();
        let heading = tree.create_element("h2");
        tree.append_child(tree.root(), heading).unwrap();
        let link = attach_link(&mut tree, heading, None, "週刊まとめ記事");

        let found = collect_candidates(&tree, tree.root(), &ScanConfig::default());
        assert_eq!(found, vec![link]);
    }

    #[test]
    fn test_internal_link_outside_heading_is_candidate() {
        let mut tree = DocumentTree::new();
        let div = tree.create_element("div");
        tree.append_child(tree.root(), div).unwrap();
        let link = attach_link(&mut tree, div, Some("/items/abc"), "週刊まとめ記事");

        let found = collect_candidates(&tree, tree.root(), &ScanConfig::default());
        assert_eq!(found, vec![link]);
    }

    #[test]
    fn test_external_link_outside_heading_is_not_candidate() {
        let mut tree = DocumentTree::new();
        let div = tree.create_element("div");
        tree.append_child(tree.root(), div).unwrap();
        attach_link(&mut tree, div, Some("https://example.com/x"), "週刊まとめ記事");

        assert!(collect_candidates(&tree, tree.root(), &ScanConfig::default()).is_empty());
    }

    #[test]
    fn test_length_bounds_filter() {
        let mut tree = DocumentTree::new();
        let heading = tree.create_element("h2");
        tree.append_child(tree.root(), heading).unwrap();
        // icon-ish, below the minimum
        attach_link(&mut tree, heading, None, "→");
        // above the maximum
        let long = "あ".repeat(121);
        attach_link(&mut tree, heading, None, &long);
        // exactly at bounds
        let min_ok = attach_link(&mut tree, heading, None, "123456");
        let max_ok = attach_link(&mut tree, heading, None, &"あ".repeat(120));

        let found = collect_candidates(&tree, tree.root(), &ScanConfig::default());
        assert_eq!(found, vec![min_ok, max_ok]);
    }

    #[test]
    fn test_length_measured_after_trimming() {
        let mut tree = DocumentTree::new();
        let heading = tree.create_element("h2");
        tree.append_child(tree.root(), heading).unwrap();
        // 5 visible graphemes padded by whitespace: still too short
        attach_link(&mut tree, heading, None, "   12345   ");

        assert!(collect_candidates(&tree, tree.root(), &ScanConfig::default()).is_empty());
    }

    #[test]
    fn test_scan_root_itself_can_be_a_candidate() {
        let mut tree = DocumentTree::new();
        let heading = tree.create_element("h2");
        tree.append_child(tree.root(), heading).unwrap();
        let link = attach_link(&mut tree, heading, None, "週刊まとめ記事");

        // heading sits above the scan root, chain check still applies
        let found = collect_candidates(&tree, link, &ScanConfig::default());
        assert_eq!(found, vec![link]);
    }

    #[test]
    fn test_non_link_elements_ignored() {
        let mut tree = DocumentTree::new();
        let heading = tree.create_element("h2");
        let span = tree.create_element("span");
        let text = tree.create_text("2025年2月12日のまとめ");
        tree.append_child(tree.root(), heading).unwrap();
        tree.append_child(heading, span).unwrap();
        tree.append_child(span, text).unwrap();

        assert!(collect_candidates(&tree, tree.root(), &ScanConfig::default()).is_empty());
    }
}
