//! Click resolution: turn a picked mesh into exactly one part id
//!
//! Cascade, in order:
//! 1. explicit mapping (own name, then parent name) to a known part,
//! 2. token-overlap score, +3 per shared token and +1 when the part's key
//!    equals the mesh's key; earliest part wins ties,
//! 3. when the best score is 1 or less, a hash of the mesh id picks among the
//!    parts sharing the mesh's key,
//! 4. otherwise the best-scoring part stands (the first part when nothing scored).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::mapping::{explicit_part_for, parts_by_key, MappingSource};
use crate::part::{MeshPartMappings, Part, PartId};
use crate::part_key::{classify, PartKey};
use crate::scene::MeshRecord;
use crate::text::{stable_hash, tokenize};
use crate::zone::key_from_mesh;

/// Points for each mesh-name token found in a part's tokens
pub const TOKEN_MATCH_SCORE: i32 = 3;
/// Bonus when the part's name key equals the mesh's spatial key
pub const KEY_MATCH_BONUS: i32 = 1;

/// Outcome of resolving a click
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub part_id: PartId,
    pub source: MappingSource,
    /// Best token score, absent for explicit hits
    pub score: Option<i32>,
    pub mesh_key: PartKey,
}

/// Developer-facing record of the last click
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshDebugInfo {
    pub mesh_name: String,
    pub parent_name: String,
    pub mesh_uuid: String,
    pub explicit_part_id: Option<PartId>,
    pub resolved_part_id: Option<PartId>,
}

impl MeshDebugInfo {
    pub fn new(
        record: &MeshRecord,
        explicit_part_id: Option<PartId>,
        resolved_part_id: Option<PartId>,
    ) -> Self {
        let mesh_name = if record.node.name.is_empty() {
            "(unnamed)".to_string()
        } else {
            record.node.name.clone()
        };
        let parent_name = record
            .node
            .parent_name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "(none)".to_string());
        Self {
            mesh_name,
            parent_name,
            mesh_uuid: record.node.id.to_string(),
            explicit_part_id,
            resolved_part_id,
        }
    }
}

/// Score one part against a mesh's tokens and key
pub fn score_part(mesh_tokens: &[String], mesh_key: PartKey, part: &Part) -> i32 {
    let part_tokens: HashSet<String> = tokenize(&part.match_text()).into_iter().collect();
    let overlap = mesh_tokens.iter().filter(|t| part_tokens.contains(*t)).count() as i32;
    let bonus = if classify(&part.name) == mesh_key {
        KEY_MATCH_BONUS
    } else {
        0
    };
    overlap * TOKEN_MATCH_SCORE + bonus
}

/// Resolve a mesh to a part. Pure: does not touch the association.
///
/// Returns the resolution (if any part could be chosen) together with the raw
/// explicit table hit for debugging.
pub fn resolve_click(
    record: &MeshRecord,
    parts: &[Part],
    mappings: &MeshPartMappings,
) -> (Option<Resolution>, Option<PartId>) {
    let explicit = explicit_part_for(&record.node, mappings).cloned();
    let mesh_key = key_from_mesh(Some(&record.annotation));

    if let Some(explicit_id) = &explicit {
        if parts.iter().any(|p| &p.id == explicit_id) {
            let resolution = Resolution {
                part_id: explicit_id.clone(),
                source: MappingSource::Explicit,
                score: None,
                mesh_key,
            };
            return (Some(resolution), explicit);
        }
    }

    let by_key = parts_by_key(parts);
    let candidates: &[PartId] = by_key.get(&mesh_key).map(Vec::as_slice).unwrap_or(&[]);

    let mesh_tokens = tokenize(&record.node.name);
    let mut best_id = candidates.first().or_else(|| parts.first().map(|p| &p.id));
    let mut best_score = -1;
    for part in parts {
        let score = score_part(&mesh_tokens, mesh_key, part);
        if score > best_score {
            best_score = score;
            best_id = Some(&part.id);
        }
    }

    // Generic mesh names: spread picks across same-key parts by mesh id
    if best_score <= KEY_MATCH_BONUS && !candidates.is_empty() {
        let idx = (stable_hash(record.node.id.as_str()) % candidates.len() as u64) as usize;
        best_id = Some(&candidates[idx]);
    }

    let resolution = best_id.map(|id| Resolution {
        part_id: id.clone(),
        source: MappingSource::Click,
        score: Some(best_score),
        mesh_key,
    });
    (resolution, explicit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MeshId;
    use crate::testing::{mesh_at, parts};
    use crate::zone::{MeshAnnotation, MeshHeight, MeshZone};
    use bevy_math::Vec3;

    fn record(name: &str, zone: MeshZone, height: MeshHeight) -> MeshRecord {
        MeshRecord {
            node: mesh_at(name, Vec3::ZERO),
            annotation: MeshAnnotation { zone, height },
        }
    }

    fn resolved(r: (Option<Resolution>, Option<PartId>)) -> Option<String> {
        r.0.map(|res| res.part_id.0)
    }

    #[test]
    fn test_explicit_mapping_beats_token_score() {
        let list = parts(&[("p1", "Seat Cover"), ("p2", "Front Fork Tube")]);
        let mesh = record("FrontForkTube", MeshZone::Front, MeshHeight::Mid);
        let mappings = MeshPartMappings::from_pairs([("FrontForkTube", "p1")]);
        let (res, explicit) = resolve_click(&mesh, &list, &mappings);
        let res = res.unwrap();
        assert_eq!(res.part_id, PartId::from("p1"));
        assert_eq!(res.source, MappingSource::Explicit);
        assert_eq!(explicit, Some(PartId::from("p1")));
    }

    #[test]
    fn test_explicit_to_unknown_part_falls_through() {
        let list = parts(&[("p2", "Front Fork Tube")]);
        let mesh = record("FrontForkTube", MeshZone::Front, MeshHeight::Mid);
        let mappings = MeshPartMappings::from_pairs([("FrontForkTube", "missing")]);
        let (res, explicit) = resolve_click(&mesh, &list, &mappings);
        let res = res.unwrap();
        assert_eq!(res.part_id, PartId::from("p2"));
        assert_eq!(res.source, MappingSource::Click);
        // The raw hit is still reported for debugging
        assert_eq!(explicit, Some(PartId::from("missing")));
    }

    #[test]
    fn test_token_score_overrides_geometric_key() {
        let list = parts(&[("p1", "Front Brake Caliper"), ("p2", "Handlebar Grip")]);
        let mesh = record("FrontCaliperMesh", MeshZone::Front, MeshHeight::Top);
        assert_eq!(key_from_mesh(Some(&mesh.annotation)), PartKey::Handlebar);
        let (res, _) = resolve_click(&mesh, &list, &MeshPartMappings::default());
        let res = res.unwrap();
        assert_eq!(res.part_id, PartId::from("p1"));
        assert_eq!(res.score, Some(6));
    }

    #[test]
    fn test_ties_go_to_earlier_part() {
        let list = parts(&[("a", "Chain Guide"), ("b", "Chain Slider")]);
        let mesh = record("Chain", MeshZone::Center, MeshHeight::Mid);
        assert_eq!(resolved(resolve_click(&mesh, &list, &MeshPartMappings::default())), Some("a".into()));

        let swapped = parts(&[("b", "Chain Slider"), ("a", "Chain Guide")]);
        assert_eq!(resolved(resolve_click(&mesh, &swapped, &MeshPartMappings::default())), Some("b".into()));
    }

    #[test]
    fn test_part_id_tokens_count() {
        let list = parts(&[("p1", "Widget"), ("gopro", "Camera Bracket")]);
        let mesh = record("gopro", MeshZone::Center, MeshHeight::Mid);
        let (res, _) = resolve_click(&mesh, &list, &MeshPartMappings::default());
        let res = res.unwrap();
        assert_eq!(res.part_id, PartId::from("gopro"));
        assert_eq!(res.score, Some(4));
    }

    #[test]
    fn test_generic_name_uses_hash_among_key_parts() {
        let list = parts(&[("f1", "Frame Rail"), ("f2", "Bash Guard"), ("s", "Seat")]);
        let mesh = record("Node003", MeshZone::Center, MeshHeight::Mid);
        let (res, _) = resolve_click(&mesh, &list, &MeshPartMappings::default());
        let res = res.unwrap();
        let expected = if stable_hash(mesh.node.id.as_str()) % 2 == 0 { "f1" } else { "f2" };
        assert_eq!(res.part_id, PartId::from(expected));
        assert_eq!(res.score, Some(1));
    }

    #[test]
    fn test_hash_fallback_distributes_across_meshes() {
        let list = parts(&[("f1", "Frame Rail"), ("f2", "Bash Guard")]);
        let mut seen = HashSet::new();
        for i in 0..16 {
            let mut mesh = record("Node003", MeshZone::Center, MeshHeight::Mid);
            mesh.node.id = MeshId::from_path(&format!("Scene/{}:Node003", i));
            let first = resolved(resolve_click(&mesh, &list, &MeshPartMappings::default()));
            let second = resolved(resolve_click(&mesh, &list, &MeshPartMappings::default()));
            assert_eq!(first, second);
            seen.extend(first);
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_no_key_candidates_falls_back_to_first_part() {
        let list = parts(&[("x", "Exhaust Pipe"), ("y", "Radiator")]);
        let mesh = record("Node003", MeshZone::Center, MeshHeight::Mid);
        let (res, _) = resolve_click(&mesh, &list, &MeshPartMappings::default());
        assert_eq!(res.unwrap().part_id, PartId::from("x"));
    }

    #[test]
    fn test_empty_parts_resolves_nothing() {
        let mesh = record("Node003", MeshZone::Center, MeshHeight::Mid);
        let (res, explicit) = resolve_click(&mesh, &[], &MeshPartMappings::default());
        assert!(res.is_none());
        assert!(explicit.is_none());
    }

    #[test]
    fn test_debug_info_placeholders() {
        let mesh = record("", MeshZone::Center, MeshHeight::Mid);
        let info = MeshDebugInfo::new(&mesh, None, Some("p".into()));
        assert_eq!(info.mesh_name, "(unnamed)");
        assert_eq!(info.parent_name, "(none)");
        assert_eq!(info.mesh_uuid, mesh.node.id.to_string());
    }
}
