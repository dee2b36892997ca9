//! Shared resources, components, and messages

use bevy::prelude::*;
use rally_core::{BikeCatalog, ExplorerConfig, ExplorerSession, MeshId, PartCommand, SceneGeneration};

/// The explorer session. Systems take it mutably only when they change it,
/// so change detection drives the presentation pass.
#[derive(Resource, Debug, Default)]
pub struct ExplorerState {
    pub session: ExplorerSession,
}

impl ExplorerState {
    pub fn new(config: ExplorerConfig) -> Self {
        Self {
            session: ExplorerSession::new(config),
        }
    }
}

/// Catalog currently shown, plus the last load error for the UI
#[derive(Resource, Debug, Default)]
pub struct CatalogState {
    pub catalog: Option<BikeCatalog>,
    pub error: Option<String>,
    pub loading: bool,
}

/// Whether the debug inspector is shown
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DebugMode(pub bool);

/// Command from the UI (or any other system) to the explorer session
#[derive(Message, Debug, Clone)]
pub struct PartCommandMessage(pub PartCommand);

/// Where the model load currently stands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModelStatus {
    #[default]
    Idle,
    Loading,
    /// glTF asset loaded, waiting for the scene instance to spawn
    Spawning,
    Ready,
    Failed(String),
}

/// Turntable pivot; rotates about +Y
#[derive(Component)]
pub struct ModelPivot;

/// Child of the pivot carrying the fit scale and offset
#[derive(Component)]
pub struct ModelFit;

/// The spawned glTF scene root; every mesh id is relative to this entity
#[derive(Component)]
pub struct ModelRoot {
    pub generation: SceneGeneration,
}

/// A captured mesh entity
#[derive(Component, Debug, Clone)]
pub struct SceneMesh {
    pub id: MeshId,
}
