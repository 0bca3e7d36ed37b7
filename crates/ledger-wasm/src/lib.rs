//! WebAssembly bindings for the ledger primitives core.
//!
//! This crate provides JavaScript-accessible APIs for:
//! - Hashing, Base58Check and address derivation
//! - Merkle roots over transaction ids
//! - Batch proof-of-work mining driven from the page's event loop
//! - An in-memory UTXO ledger with JSON snapshots

use wasm_bindgen::prelude::*;

pub mod crypto;
pub mod ledger;
pub mod miner;
pub mod state;

// Re-export main types for JS access
pub use ledger::Ledger;
pub use miner::Miner;

/// Initialize the WASM module with better panic messages.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Log to the browser console.
#[wasm_bindgen]
pub fn console_log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Convert a core error into a JS exception value.
pub(crate) fn js_error(context: &str, error: impl core::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, error))
}
