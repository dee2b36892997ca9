//! Catalog loading from the ?bike= url parameter

use bevy::prelude::*;
use rally_core::catalog::{BIKE_FILE, DIAGRAM_FILE, MAPPINGS_FILE, PARTS_FILE};
use rally_core::BikeCatalog;
use rally_scene::CatalogState;
use std::sync::{Arc, Mutex};
use wasm_bindgen::JsCast;

use crate::catalog_source::{document_url, slug_from_base};

const BIKE_PARAM: &str = "bike";

/// Plugin for fetching the catalog named in the page url
pub struct FileLoaderPlugin;

impl Plugin for FileLoaderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingLoad>()
            .add_systems(Startup, check_url_parameter)
            .add_systems(Update, process_pending_loads);
    }
}

/// Raw document bodies of one catalog
struct FetchedDocuments {
    slug: String,
    bike: Option<String>,
    diagram: String,
    parts: Option<String>,
    mappings: Option<String>,
}

/// Result slot filled by the fetch task
#[derive(Resource, Default)]
pub struct PendingLoad {
    result: Arc<Mutex<Option<Result<FetchedDocuments, String>>>>,
}

/// Check URL for ?bike= parameter on startup
fn check_url_parameter(mut catalog: ResMut<CatalogState>, pending: Res<PendingLoad>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(location) = window.location().href() else {
        return;
    };
    let Ok(url) = web_sys::Url::new(&location) else {
        return;
    };

    let Some(base) = url.search_params().get(BIKE_PARAM) else {
        catalog.error = Some("No bike selected. Add ?bike=<catalog url> to the page address.".to_string());
        return;
    };

    tracing::info!("Loading catalog from URL parameter: {}", base);
    catalog.loading = true;

    let slot = pending.result.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let result = fetch_documents(&base).await;
        if let Ok(mut slot) = slot.lock() {
            *slot = Some(result);
        }
    });
}

async fn fetch_documents(base: &str) -> Result<FetchedDocuments, String> {
    let diagram = fetch_text(&document_url(base, DIAGRAM_FILE))
        .await?
        .ok_or_else(|| format!("{} not found under {}", DIAGRAM_FILE, base))?;

    Ok(FetchedDocuments {
        slug: slug_from_base(base),
        bike: fetch_text(&document_url(base, BIKE_FILE)).await?,
        diagram,
        parts: fetch_text(&document_url(base, PARTS_FILE)).await?,
        mappings: fetch_text(&document_url(base, MAPPINGS_FILE)).await?,
    })
}

/// Fetch a document body; `None` when the server answers 404
async fn fetch_text(url: &str) -> Result<Option<String>, String> {
    let window = web_sys::window().ok_or("No window")?;

    let resp = wasm_bindgen_futures::JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| format!("Fetch failed: {:?}", e))?;

    let resp: web_sys::Response = resp.dyn_into().map_err(|_| "Response cast failed")?;

    if resp.status() == 404 {
        return Ok(None);
    }
    if !resp.ok() {
        return Err(format!("{}: HTTP {} {}", url, resp.status(), resp.status_text()));
    }

    let text = wasm_bindgen_futures::JsFuture::from(resp.text().map_err(|_| "Failed to get text")?)
        .await
        .map_err(|e| format!("Text extraction failed: {:?}", e))?;

    text.as_string().map(Some).ok_or_else(|| "Not a string".to_string())
}

/// Turn a finished fetch into the catalog resource
fn process_pending_loads(mut catalog: ResMut<CatalogState>, pending: Res<PendingLoad>) {
    let Ok(mut slot) = pending.result.try_lock() else {
        return;
    };
    let Some(result) = slot.take() else {
        return;
    };

    catalog.loading = false;
    let parsed = result.and_then(|docs| {
        BikeCatalog::from_documents(
            &docs.slug,
            docs.bike.as_deref(),
            &docs.diagram,
            docs.parts.as_deref(),
            docs.mappings.as_deref(),
        )
        .map_err(|e| e.to_string())
    });

    match parsed {
        Ok(loaded) => {
            tracing::info!(bike = %loaded.bike.id, parts = loaded.parts.len(), "Loaded catalog");
            catalog.catalog = Some(loaded);
            catalog.error = None;
        }
        Err(e) => {
            tracing::error!("Failed to load catalog: {}", e);
            catalog.error = Some(e);
        }
    }
}
