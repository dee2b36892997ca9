//! Shared egui widgets for part and mesh display

use bevy_egui::egui;
use rally_core::{MappingSource, MeshDebugInfo, Part};

/// Render the details of a part (shared between panels)
pub fn render_part_details(ui: &mut egui::Ui, part: &Part, mapping: Option<MappingSource>) {
    ui.heading(&part.name);
    if let Some(number) = &part.part_number {
        ui.label(format!("Part number: {}", number));
    }
    ui.label(
        egui::RichText::new(format!("ID: {}", part.id))
            .small()
            .color(egui::Color32::GRAY),
    );

    match mapping {
        Some(MappingSource::Explicit) => {
            ui.label(egui::RichText::new("Mapped to a mesh").color(egui::Color32::from_rgb(50, 200, 50)));
        }
        Some(MappingSource::Heuristic) => {
            ui.label(egui::RichText::new("Matched to a mesh by position").color(egui::Color32::from_rgb(255, 200, 50)));
        }
        Some(MappingSource::Click) => {
            ui.label(egui::RichText::new("Matched to the clicked mesh").color(egui::Color32::from_rgb(120, 180, 255)));
        }
        None => {
            ui.label(egui::RichText::new("No mesh found, highlighting region").color(egui::Color32::GRAY));
        }
    }

    if !part.tags.is_empty() {
        ui.horizontal_wrapped(|ui| {
            for tag in &part.tags {
                ui.label(
                    egui::RichText::new(tag)
                        .small()
                        .background_color(egui::Color32::from_gray(60)),
                );
            }
        });
    }

    if let Some(notes) = &part.notes {
        ui.separator();
        ui.label(notes);
    }

    if !part.links.is_empty() {
        ui.separator();
        for link in &part.links {
            ui.hyperlink_to(&link.label, &link.url);
        }
    }

    if let Some(replacement) = &part.replacement {
        ui.separator();
        ui.label(egui::RichText::new("Replacement").strong());
        ui.label(&replacement.name);
        if let Some(number) = &replacement.part_number {
            ui.label(
                egui::RichText::new(number)
                    .small()
                    .color(egui::Color32::GRAY),
            );
        }
    }
}

/// Render the last click's debug record
pub fn render_debug_info(ui: &mut egui::Ui, info: &MeshDebugInfo) {
    egui::Grid::new("mesh_debug_grid")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui| {
            let none = "(none)".to_string();
            let rows = [
                ("Mesh", info.mesh_name.clone()),
                ("Parent", info.parent_name.clone()),
                ("Mesh ID", info.mesh_uuid.clone()),
                (
                    "Explicit part",
                    info.explicit_part_id.as_ref().map(|p| p.to_string()).unwrap_or_else(|| none.clone()),
                ),
                (
                    "Resolved part",
                    info.resolved_part_id.as_ref().map(|p| p.to_string()).unwrap_or(none),
                ),
            ];
            for (label, value) in rows {
                ui.label(label);
                ui.monospace(value);
                ui.end_row();
            }
        });

    if ui.button("Copy as JSON").clicked() {
        match serde_json::to_string_pretty(info) {
            Ok(json) => ui.ctx().copy_text(json),
            Err(err) => tracing::warn!("Failed to serialize debug info: {}", err),
        }
    }
}
