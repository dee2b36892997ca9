//! Bevy application setup

use bevy::prelude::*;
use bevy::winit::WinitSettings;
use bevy_egui::EguiPlugin;
use bevy_picking::{prelude::MeshPickingPlugin, DefaultPickingPlugins};
use rally_core::{BikeCatalog, ExplorerConfig};
use rally_scene::{CatalogState, ExplorerState, RallyScenePlugin};

use crate::ui::UiPlugin;

/// Startup inputs for the viewer
#[derive(Debug, Clone, Default)]
pub struct ViewerOptions {
    pub config: ExplorerConfig,
    /// Catalog known up front; the web build fetches it instead
    pub catalog: Option<BikeCatalog>,
    /// Root that model urls are resolved against
    pub asset_root: String,
}

pub fn run(options: ViewerOptions) {
    let title = options
        .catalog
        .as_ref()
        .map(|c| format!("{} - Parts Explorer", c.bike.title()))
        .unwrap_or_else(|| "Rally Parts Explorer".to_string());

    let mut app = App::new();
    app.insert_resource(ClearColor(Color::srgb(0.1, 0.1, 0.15)))
        .insert_resource(WinitSettings::default())
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title,
                        canvas: Some("#viewer-canvas".to_string()),
                        fit_canvas_to_parent: true,
                        prevent_default_event_handling: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    file_path: options.asset_root,
                    // Static hosts don't serve .meta files
                    meta_check: bevy::asset::AssetMetaCheck::Never,
                    ..default()
                }),
        )
        // Picking must be registered before EguiPlugin so egui can detect it
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(MeshPickingPlugin)
        .add_plugins(EguiPlugin::default())
        .add_plugins(RallyScenePlugin)
        .insert_resource(ExplorerState::new(options.config))
        .insert_resource(CatalogState {
            catalog: options.catalog,
            ..default()
        })
        .add_plugins(UiPlugin);

    #[cfg(target_arch = "wasm32")]
    app.add_plugins(crate::file_loader::FileLoaderPlugin);

    app.run();
}
