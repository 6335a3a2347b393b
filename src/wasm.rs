//! FilterEngine - WASM boundary
//!
//! Owns a `DocumentTree` mirror plus a `FilterConductor`, and exposes
//! both over `wasm-bindgen`. The JS side mirrors the listing subtree
//! into the engine (createElement / createText / appendChild), calls
//! `attach()` once with the page path, and `pump()` from each
//! mutation-observer callback. Hidden node ids flow back so the JS side
//! can apply `display:none` to the real elements.

use wasm_bindgen::prelude::*;

use crate::dom::{DocumentTree, NodeId};
use crate::scanner::{FilterConductor, ScanConfig, ScanOutcome};

/// Serialize an optional outcome; `None` (suppressed / not attached)
/// becomes JS `null`.
fn outcome_to_js(outcome: Option<ScanOutcome>) -> JsValue {
    let Some(outcome) = outcome else {
        return JsValue::NULL;
    };
    match serde_wasm_bindgen::to_value(&outcome) {
        Ok(v) => v,
        Err(e) => {
            web_sys::console::error_1(
                &format!("[FilterEngine] Serialization failed: {:?}", e).into(),
            );
            JsValue::NULL
        }
    }
}

/// JS-facing engine: tree mirror + conductor in one object
#[wasm_bindgen]
pub struct FilterEngine {
    tree: DocumentTree,
    conductor: FilterConductor,
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl FilterEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            tree: DocumentTree::new(),
            conductor: FilterConductor::default(),
        }
    }

    /// Build an engine from a (possibly partial) config object:
    /// `{ candidate_min_len, candidate_max_len, detail_path_marker }`
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config: JsValue) -> Result<FilterEngine, JsValue> {
        let config: ScanConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse config: {}", e)))?;
        Ok(Self {
            tree: DocumentTree::new(),
            conductor: FilterConductor::new(config),
        })
    }

    // -------------------------------------------------------------------------
    // Tree mirroring
    // -------------------------------------------------------------------------

    pub fn root(&self) -> u32 {
        self.tree.root().0
    }

    #[wasm_bindgen(js_name = createElement)]
    pub fn create_element(&mut self, tag: &str) -> u32 {
        self.tree.create_element(tag).0
    }

    #[wasm_bindgen(js_name = createText)]
    pub fn create_text(&mut self, text: &str) -> u32 {
        self.tree.create_text(text).0
    }

    #[wasm_bindgen(js_name = setAttr)]
    pub fn set_attr(&mut self, id: u32, name: &str, value: &str) -> Result<(), JsValue> {
        self.tree
            .set_attr(NodeId(id), name, value)
            .map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(js_name = appendChild)]
    pub fn append_child(&mut self, parent: u32, child: u32) -> Result<(), JsValue> {
        self.tree
            .append_child(NodeId(parent), NodeId(child))
            .map_err(|e| JsValue::from_str(&e))
    }

    // -------------------------------------------------------------------------
    // Driving
    // -------------------------------------------------------------------------

    /// Suppression check + initial full scan. Returns the outcome, or
    /// `null` on a detail page.
    pub fn attach(&mut self, page_path: &str) -> JsValue {
        outcome_to_js(self.conductor.attach(&mut self.tree, page_path))
    }

    /// Consume the queued insertions as one batch. Returns the
    /// aggregated outcome, or `null` when not active.
    pub fn pump(&mut self) -> JsValue {
        outcome_to_js(self.conductor.pump(&mut self.tree))
    }

    // -------------------------------------------------------------------------
    // Introspection
    // -------------------------------------------------------------------------

    #[wasm_bindgen(js_name = isHidden)]
    pub fn is_hidden(&self, id: u32) -> bool {
        self.tree.is_hidden(NodeId(id))
    }

    /// Ids of every currently hidden element, for applying styles on
    /// the JS side
    #[wasm_bindgen(js_name = hiddenIds)]
    pub fn hidden_ids(&self) -> js_sys::Uint32Array {
        let ids: Vec<u32> = self
            .tree
            .descendants(self.tree.root())
            .into_iter()
            .filter(|&id| self.tree.is_hidden(id))
            .map(|id| id.0)
            .collect();
        js_sys::Uint32Array::from(ids.as_slice())
    }

    #[wasm_bindgen(js_name = stateName)]
    pub fn state_name(&self) -> String {
        self.conductor.state_name().to_string()
    }

    #[wasm_bindgen(js_name = hiddenTotal)]
    pub fn hidden_total(&self) -> u32 {
        self.conductor.hidden_total() as u32
    }
}

// =============================================================================
// Tests
// =============================================================================
