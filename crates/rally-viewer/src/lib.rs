//! Rally Viewer - exploded-diagram parts explorer
//!
//! Shows a bike's 3D diagram next to its parts list. Clicking a mesh resolves
//! it to a part, explodes the matching geometry, and shows the part details.

mod app;
mod catalog_source;
#[cfg(target_arch = "wasm32")]
mod file_loader;
mod ui;

pub use app::{run, ViewerOptions};
pub use catalog_source::{document_url, slug_from_base};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// WASM entry point
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::WARN)
            .build(),
    );

    // The catalog arrives later through the ?bike= fetch
    app::run(ViewerOptions::default());
}
