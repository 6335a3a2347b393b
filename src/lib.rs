//! ListVeil: Dated-title concealment for article listings
//!
//! A Rust/WASM engine that watches a continuously-mutating listing page
//! (pagination, infinite scroll) and hides every entry whose title
//! carries a fully-specified calendar date, without touching the
//! underlying data.
//!
//! # Architecture
//!
//! - `matcher/date.rs` - DateCortex: full-date detection (regex pattern
//!   + chrono calendar validation)
//! - `dom/tree.rs` - DocumentTree: arena-backed element tree, explicit
//!   root threading, insertion queue
//! - `scanner/titles.rs` - candidate title discovery heuristic
//! - `scanner/core.rs` - TreeScanner: one idempotent scan pass
//! - `scanner/conductor.rs` - FilterConductor: page-lifetime state
//!   machine (suppression rule, initial scan, insertion batches)
//! - `wasm.rs` - FilterEngine: the JS-facing boundary
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { FilterEngine } from 'listveil';
//!
//! await init();
//!
//! const engine = new FilterEngine();
//! // mirror the listing subtree, then:
//! engine.attach(location.pathname);   // initial full scan
//! // on every mutation-observer callback:
//! engine.pump();
//! ```

pub mod dom;
pub mod matcher;
pub mod scanner;
pub mod wasm;

// Public exports
pub use dom::*;
pub use matcher::*;
pub use scanner::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
