//! Mesh <-> part association and the passes that populate it
//!
//! Three sources write into one [`PartMeshAssociation`]:
//! 1. the explicit `mesh name -> part id` table,
//! 2. a one-time heuristic bulk pass that pairs parts and meshes sharing a key,
//! 3. click resolution.
//!
//! Last writer wins. The bulk pass never touches parts that have an explicit mapping.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::part::{MeshPartMappings, Part, PartId};
use crate::part_key::{classify, PartKey};
use crate::scene::{MeshId, MeshNode, SceneIndex};
use crate::zone::key_from_mesh;

/// Which tier produced a mesh -> part resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingSource {
    Explicit,
    Heuristic,
    Click,
}

/// Mesh currently believed to represent a part, and the tier that chose it
#[derive(Debug, Clone, PartialEq)]
struct AssociationEntry {
    mesh: MeshId,
    source: MappingSource,
}

/// `PartId -> MeshId`, at most one mesh per part
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartMeshAssociation {
    entries: HashMap<PartId, AssociationEntry>,
}

impl PartMeshAssociation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `part -> mesh`, replacing any previous mesh for the part
    pub fn assign(&mut self, part: PartId, mesh: MeshId, source: MappingSource) -> Option<MeshId> {
        self.entries
            .insert(part, AssociationEntry { mesh, source })
            .map(|previous| previous.mesh)
    }

    pub fn mesh_for(&self, part: &PartId) -> Option<&MeshId> {
        self.entries.get(part).map(|entry| &entry.mesh)
    }

    /// Tier that wrote the current entry for `part`
    pub fn source_for(&self, part: &PartId) -> Option<MappingSource> {
        self.entries.get(part).map(|entry| entry.source)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Explicit mapping for a mesh: own name first, then parent name.
///
/// Returns the raw table hit, whether or not the part exists.
pub fn explicit_part_for<'a>(mesh: &MeshNode, mappings: &'a MeshPartMappings) -> Option<&'a PartId> {
    mesh.lookup_names().find_map(|name| mappings.get(name))
}

/// Explicit mapping for a mesh, discarded unless the part is in `parts`
pub fn valid_explicit_part_for<'a>(
    mesh: &MeshNode,
    mappings: &'a MeshPartMappings,
    parts: &[Part],
) -> Option<&'a PartId> {
    explicit_part_for(mesh, mappings).filter(|id| parts.iter().any(|p| &p.id == *id))
}

/// Part ids that are targets of the explicit table and exist in `parts`
pub fn explicitly_mapped_parts(mappings: &MeshPartMappings, parts: &[Part]) -> HashSet<PartId> {
    let valid: HashSet<&PartId> = parts.iter().map(|p| &p.id).collect();
    mappings
        .targets()
        .filter(|id| valid.contains(id))
        .cloned()
        .collect()
}

/// Part ids grouped by name classification, each group in part-list order
pub fn parts_by_key(parts: &[Part]) -> BTreeMap<PartKey, Vec<PartId>> {
    let mut groups: BTreeMap<PartKey, Vec<PartId>> = BTreeMap::new();
    for part in parts {
        groups.entry(classify(&part.name)).or_default().push(part.id.clone());
    }
    groups
}

/// Heuristic bulk pass.
///
/// Meshes are grouped by `key_from_mesh`, parts by `classify`. Within a key,
/// the i-th part gets the i-th mesh; surplus parts share the last mesh and
/// surplus meshes stay unassigned. Explicitly mapped parts are skipped.
/// Returns how many parts were assigned.
pub fn bulk_assign(
    index: &SceneIndex,
    parts: &[Part],
    mappings: &MeshPartMappings,
    association: &mut PartMeshAssociation,
) -> usize {
    if parts.is_empty() || index.is_empty() {
        return 0;
    }

    let mut mesh_groups: HashMap<PartKey, Vec<&MeshId>> = HashMap::new();
    for record in index.iter() {
        mesh_groups
            .entry(key_from_mesh(Some(&record.annotation)))
            .or_default()
            .push(&record.node.id);
    }

    let explicit = explicitly_mapped_parts(mappings, parts);
    let mut assigned = 0;
    for (key, part_ids) in parts_by_key(parts) {
        let Some(meshes) = mesh_groups.get(&key) else {
            continue;
        };
        let Some(last) = meshes.last() else {
            continue;
        };
        for (i, part_id) in part_ids.into_iter().enumerate() {
            if explicit.contains(&part_id) {
                continue;
            }
            let mesh = meshes.get(i).unwrap_or(last);
            association.assign(part_id, (*mesh).clone(), MappingSource::Heuristic);
            assigned += 1;
        }
    }
    assigned
}

/// Explicit pass: every mesh whose name (or parent name) maps to a known part
/// claims that part. Later meshes in traversal order win.
pub fn apply_explicit(
    index: &SceneIndex,
    parts: &[Part],
    mappings: &MeshPartMappings,
    association: &mut PartMeshAssociation,
) -> usize {
    if mappings.is_empty() {
        return 0;
    }
    let mut applied = 0;
    for record in index.iter() {
        if let Some(part_id) = valid_explicit_part_for(&record.node, mappings, parts) {
            association.assign(part_id.clone(), record.node.id.clone(), MappingSource::Explicit);
            applied += 1;
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FitSettings, ZoneThresholds};
    use crate::testing::{bike_snapshot, parts};

    fn index() -> SceneIndex {
        SceneIndex::build(bike_snapshot(), &ZoneThresholds::default(), &FitSettings::default())
    }

    fn id(name: &str) -> MeshId {
        MeshId::from_path(name)
    }

    #[test]
    fn test_explicit_lookup_prefers_own_name() {
        let mut node = crate::testing::mesh_at("Fork_L", bevy_math::Vec3::ZERO);
        node.parent_name = Some("ForkAssembly".to_string());
        let mappings = MeshPartMappings::from_pairs([("Fork_L", "fork-left"), ("ForkAssembly", "fork")]);
        assert_eq!(explicit_part_for(&node, &mappings), Some(&PartId::from("fork-left")));

        let only_parent = MeshPartMappings::from_pairs([("ForkAssembly", "fork")]);
        assert_eq!(explicit_part_for(&node, &only_parent), Some(&PartId::from("fork")));
    }

    #[test]
    fn test_explicit_discarded_for_unknown_part() {
        let node = crate::testing::mesh_at("Fork_L", bevy_math::Vec3::ZERO);
        let mappings = MeshPartMappings::from_pairs([("Fork_L", "gone")]);
        let list = parts(&[("fork", "Front Fork")]);
        assert_eq!(valid_explicit_part_for(&node, &mappings, &list), None);
    }

    #[test]
    fn test_bulk_assign_by_index_with_clamp() {
        let index = index();
        // Three handlebar-class parts; the handlebar mesh bucket holds HandlebarMesh and BoundsMax
        let list = parts(&[
            ("grip", "Handlebar Grip"),
            ("lever", "Clutch Lever"),
            ("mirror", "Mirror"),
        ]);
        let mut association = PartMeshAssociation::new();
        let assigned = bulk_assign(&index, &list, &MeshPartMappings::default(), &mut association);
        assert_eq!(assigned, 3);
        assert_eq!(association.mesh_for(&"grip".into()), Some(&id("HandlebarMesh")));
        assert_eq!(association.mesh_for(&"lever".into()), Some(&id("BoundsMax")));
        // More parts than meshes: clamp to the last mesh
        assert_eq!(association.mesh_for(&"mirror".into()), Some(&id("BoundsMax")));
    }

    #[test]
    fn test_bulk_assign_leaves_extra_meshes_unassigned() {
        let index = index();
        let list = parts(&[("tank", "Fuel Tank")]);
        let mut association = PartMeshAssociation::new();
        bulk_assign(&index, &list, &MeshPartMappings::default(), &mut association);
        assert_eq!(association.len(), 1);
        assert_eq!(association.mesh_for(&"tank".into()), Some(&id("TankShell")));
    }

    #[test]
    fn test_bulk_assign_skips_explicit_parts() {
        let index = index();
        let list = parts(&[("grip", "Handlebar Grip"), ("lever", "Clutch Lever")]);
        let mappings = MeshPartMappings::from_pairs([("SeatMesh", "grip")]);
        let mut association = PartMeshAssociation::new();
        bulk_assign(&index, &list, &mappings, &mut association);
        assert_eq!(association.mesh_for(&"grip".into()), None);
        // Index positions are kept: lever is still the second handlebar part
        assert_eq!(association.mesh_for(&"lever".into()), Some(&id("BoundsMax")));

        apply_explicit(&index, &list, &mappings, &mut association);
        assert_eq!(association.mesh_for(&"grip".into()), Some(&id("SeatMesh")));
    }

    #[test]
    fn test_bulk_assign_without_matching_meshes() {
        let index = index();
        // Exhaust never comes out of key_from_mesh, so exhaust parts get no heuristic mesh
        let list = parts(&[("pipe", "Exhaust Pipe")]);
        let mut association = PartMeshAssociation::new();
        assert_eq!(bulk_assign(&index, &list, &MeshPartMappings::default(), &mut association), 0);
        assert!(association.is_empty());
    }

    #[test]
    fn test_bulk_assign_empty_parts_is_noop() {
        let mut association = PartMeshAssociation::new();
        assert_eq!(bulk_assign(&index(), &[], &MeshPartMappings::default(), &mut association), 0);
    }

    #[test]
    fn test_last_writer_sets_source() {
        let mut association = PartMeshAssociation::new();
        association.assign("a".into(), id("X"), MappingSource::Heuristic);
        let previous = association.assign("a".into(), id("Y"), MappingSource::Click);
        assert_eq!(previous, Some(id("X")));
        assert_eq!(association.mesh_for(&"a".into()), Some(&id("Y")));
        assert_eq!(association.source_for(&"a".into()), Some(MappingSource::Click));
        assert_eq!(association.source_for(&"b".into()), None);
    }

    #[test]
    fn test_parts_by_key_keeps_list_order() {
        let list = parts(&[("b", "Bash Guard"), ("a", "Frame Rail"), ("c", "Seat")]);
        let groups = parts_by_key(&list);
        assert_eq!(groups[&PartKey::Frame], vec![PartId::from("b"), PartId::from("a")]);
        assert_eq!(groups[&PartKey::Seat], vec![PartId::from("c")]);
    }
}
