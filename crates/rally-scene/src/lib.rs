//! Rally Scene - Bevy integration for the exploded-diagram explorer
//!
//! Bridges a loaded glTF scene to `rally-core`: loads the diagram's model,
//! captures its meshes for the session, turns pointer clicks into mesh picks,
//! and writes the explode/highlight presentation back to transforms and materials.

pub mod camera;
pub mod highlight;
pub mod models;
pub mod picking;
pub mod scene;
pub mod types;
pub mod ui;

use bevy::prelude::*;

/// Plugin that sets up the explorer scene
pub struct RallyScenePlugin;

impl Plugin for RallyScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ExplorerState>()
            .init_resource::<CatalogState>()
            .init_resource::<DebugMode>()
            .add_plugins(camera::CameraPlugin)
            .add_plugins(scene::SceneSetupPlugin)
            .add_plugins(models::ModelsPlugin)
            .add_plugins(picking::PickingPlugin)
            .add_plugins(highlight::HighlightPlugin);
    }
}

// Re-export commonly used types
pub use camera::{MainCamera, TurntableState};
pub use models::ModelLoad;
pub use types::*;
