//! Explorer session: the single owner of selection and mapping state
//!
//! Ordering contract:
//! - a scene load bumps the generation and drops everything derived from the
//!   previous scene,
//! - a snapshot is only accepted for the current generation,
//! - after a snapshot is accepted the bulk pass runs, then the explicit pass,
//! - clicks then overwrite the association one part at a time.

use crate::config::ExplorerConfig;
use crate::explode::{compute_presentation, HighlightTarget, ScenePresentation};
use crate::mapping::{apply_explicit, bulk_assign, MappingSource, PartMeshAssociation};
use crate::part::{MeshPartMappings, Part, PartId};
use crate::part_key::{classify, PartKey};
use crate::resolve::{resolve_click, MeshDebugInfo};
use crate::scene::{MeshId, SceneFit, SceneIndex, SceneSnapshot};

/// Token identifying one scene load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SceneGeneration(pub u64);

/// Commands other components send to the explorer
#[derive(Debug, Clone, PartialEq)]
pub enum PartCommand {
    /// Record `alternative` as the replacement for `original_id` and select it
    Replace { original_id: PartId, alternative: Part },
    Select(PartId),
    ClearSelection,
}

/// Current selection. A click sets both; picking from the list sets only the part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub part: Option<PartId>,
    pub mesh: Option<MeshId>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.part.is_none() && self.mesh.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExplorerSession {
    config: ExplorerConfig,
    parts: Vec<Part>,
    mappings: MeshPartMappings,
    generation: SceneGeneration,
    index: Option<SceneIndex>,
    association: PartMeshAssociation,
    selection: Selection,
    debug: Option<MeshDebugInfo>,
}

impl ExplorerSession {
    pub fn new(config: ExplorerConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn part(&self, id: &PartId) -> Option<&Part> {
        self.parts.iter().find(|p| &p.id == id)
    }

    pub fn mappings(&self) -> &MeshPartMappings {
        &self.mappings
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_part(&self) -> Option<&Part> {
        self.selection.part.as_ref().and_then(|id| self.part(id))
    }

    pub fn association(&self) -> &PartMeshAssociation {
        &self.association
    }

    pub fn scene(&self) -> Option<&SceneIndex> {
        self.index.as_ref()
    }

    pub fn generation(&self) -> SceneGeneration {
        self.generation
    }

    /// Fit for the loaded scene, identity before a scene is annotated
    pub fn fit(&self) -> SceneFit {
        self.index.as_ref().map(SceneIndex::fit).unwrap_or_default()
    }

    /// Debug record of the last click
    pub fn debug_info(&self) -> Option<&MeshDebugInfo> {
        self.debug.as_ref()
    }

    /// Replace the part list. The association is rebuilt from scratch so the
    /// result depends only on the current inputs; a selected part that is no
    /// longer listed is dropped.
    pub fn set_parts(&mut self, parts: Vec<Part>) {
        self.parts = parts;
        if let Some(id) = &self.selection.part {
            if self.part(id).is_none() {
                tracing::debug!(part = %id, "Selected part removed from list");
                self.selection.part = None;
            }
        }
        self.association.clear();
        self.run_mapping_passes();
    }

    /// Replace the explicit table and rebuild the association
    pub fn set_mappings(&mut self, mappings: MeshPartMappings) {
        self.mappings = mappings;
        self.association.clear();
        self.run_mapping_passes();
    }

    /// Start a new scene load and forget everything derived from the old one
    pub fn begin_scene_load(&mut self) -> SceneGeneration {
        self.generation = SceneGeneration(self.generation.0 + 1);
        self.index = None;
        self.association.clear();
        self.selection = Selection::default();
        self.debug = None;
        tracing::debug!(generation = self.generation.0, "Scene load started");
        self.generation
    }

    /// Accept a captured scene. Returns false if a newer load has started.
    pub fn finish_scene_load(&mut self, generation: SceneGeneration, snapshot: SceneSnapshot) -> bool {
        if generation != self.generation {
            tracing::warn!(
                stale = generation.0,
                current = self.generation.0,
                "Discarding annotations for a superseded scene load"
            );
            return false;
        }

        let index = SceneIndex::build(snapshot, &self.config.zones, &self.config.fit);
        tracing::info!(
            generation = generation.0,
            meshes = index.len(),
            length_axis = ?index.frame().map(|f| f.length_axis),
            "Scene annotated"
        );
        self.index = Some(index);
        self.association.clear();
        self.run_mapping_passes();
        true
    }

    fn run_mapping_passes(&mut self) {
        let Some(index) = &self.index else {
            return;
        };
        let bulk = bulk_assign(index, &self.parts, &self.mappings, &mut self.association);
        let explicit = apply_explicit(index, &self.parts, &self.mappings, &mut self.association);
        tracing::info!(bulk, explicit, parts = self.parts.len(), "Mapped parts to meshes");
    }

    /// Resolve a picked mesh to a part and select both.
    ///
    /// Unknown meshes (not in the current scene) are ignored.
    pub fn click_mesh(&mut self, mesh_id: &MeshId) -> Option<PartId> {
        let index = self.index.as_ref()?;
        let Some(record) = index.get(mesh_id) else {
            tracing::warn!(mesh = %mesh_id, "Click on a mesh outside the current scene");
            return None;
        };

        let (resolution, explicit) = resolve_click(record, &self.parts, &self.mappings);
        let resolved = resolution.as_ref().map(|r| r.part_id.clone());
        self.debug = Some(MeshDebugInfo::new(record, explicit, resolved.clone()));
        self.selection.mesh = Some(mesh_id.clone());

        match resolution {
            Some(resolution) => {
                tracing::info!(
                    mesh = %record.node.name,
                    part = %resolution.part_id,
                    source = ?resolution.source,
                    score = ?resolution.score,
                    "Click resolved"
                );
                self.association
                    .assign(resolution.part_id.clone(), mesh_id.clone(), resolution.source);
                self.selection.part = Some(resolution.part_id);
            }
            None => {
                tracing::debug!(mesh = %record.node.name, "Click resolved to no part");
            }
        }
        resolved
    }

    /// Select a part from the list. The mesh selection is cleared so the
    /// part's own association (or its key group) drives the highlight.
    pub fn select_part(&mut self, id: &PartId) -> bool {
        if self.part(id).is_none() {
            tracing::warn!(part = %id, "Select for unknown part ignored");
            return false;
        }
        self.selection = Selection {
            part: Some(id.clone()),
            mesh: None,
        };
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::default();
    }

    pub fn dispatch(&mut self, command: PartCommand) {
        match command {
            PartCommand::Replace {
                original_id,
                alternative,
            } => {
                let Some(part) = self.parts.iter_mut().find(|p| p.id == original_id) else {
                    tracing::warn!(part = %original_id, "Replace for unknown part ignored");
                    return;
                };
                tracing::info!(part = %original_id, replacement = %alternative.id, "Replacement applied");
                part.replacement = Some(Box::new(alternative));
                self.select_part(&original_id);
            }
            PartCommand::Select(id) => {
                self.select_part(&id);
            }
            PartCommand::ClearSelection => self.clear_selection(),
        }
    }

    /// Which tier last wrote the mesh for `part`
    pub fn mapping_source(&self, part: &PartId) -> Option<MappingSource> {
        self.association.source_for(part)
    }

    /// Key whose mesh group highlights when the selected part has no mesh
    pub fn selected_key(&self) -> Option<PartKey> {
        self.selected_part().map(|p| classify(&p.name))
    }

    pub fn highlight_target(&self) -> HighlightTarget {
        let associated = self
            .selection
            .part
            .as_ref()
            .and_then(|id| self.association.mesh_for(id));
        HighlightTarget::resolve(self.selection.mesh.as_ref(), associated, self.selected_key())
    }

    /// Explode and highlight state for every mesh; empty before a scene is annotated
    pub fn presentation(&self) -> ScenePresentation {
        match &self.index {
            Some(index) => compute_presentation(index, &self.highlight_target(), &self.config.explode),
            None => ScenePresentation::default(),
        }
    }
}
