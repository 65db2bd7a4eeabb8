//! Wallcrop WASM - WebAssembly bindings for Wallcrop
//!
//! This crate exposes the wallcrop-core editing session and the crop export
//! pipeline to the browser UI.
//!
//! # Module Structure
//!
//! - `session` - `JsCropSession`, the editor state object
//! - `export` - upload inspection and per-frame crop export
//! - `geometry` - standalone geometry helpers
//! - `logging` - forwards `log` records to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropSession, inspect_upload } from '@wallcrop/wasm';
//!
//! await init();
//!
//! const upload = inspect_upload(bytes, file.type, file.name);
//! const session = new JsCropSession();
//! session.load_image(upload.width, upload.height, file.name, url);
//! session.pointer_down('frame-1', undefined, event.clientX, event.clientY);
//! ```

use wasm_bindgen::prelude::*;

mod export;
mod geometry;
mod logging;
mod session;

pub use export::{export_file_name, export_frame, format_bytes, inspect_upload, JsCrop, JsUpload};
pub use geometry::{calculate_optimal_zoom, constrain_rect, point_in_rect};
pub use logging::set_log_level;
pub use session::JsCropSession;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logging::install();
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
