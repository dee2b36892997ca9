//! UI panels using bevy_egui

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use rally_core::{DiagramViewer, PartCommand};
use rally_scene::ui::{render_debug_info, render_part_details};
use rally_scene::{CatalogState, DebugMode, ExplorerState, ModelLoad, ModelStatus, PartCommandMessage};

const PANEL_WIDTH: f32 = 260.0;

/// Grouped system parameters for the main UI system
#[derive(SystemParam)]
pub struct UiParams<'w, 's> {
    pub contexts: EguiContexts<'w, 's>,
    pub explorer: Res<'w, ExplorerState>,
    pub catalog: Res<'w, CatalogState>,
    pub model: Res<'w, ModelLoad>,
    pub debug: ResMut<'w, DebugMode>,
    pub part_commands: MessageWriter<'w, PartCommandMessage>,
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(EguiPrimaryContextPass, ui_system);
    }
}

/// One-line description of the model load, if there is something to say
fn model_status_text(status: &ModelStatus) -> Option<String> {
    match status {
        ModelStatus::Idle | ModelStatus::Ready => None,
        ModelStatus::Loading => Some("Loading model...".to_string()),
        ModelStatus::Spawning => Some("Preparing model...".to_string()),
        ModelStatus::Failed(err) => Some(format!("Model failed to load: {}", err)),
    }
}

fn ui_system(mut params: UiParams) {
    let Ok(ctx) = params.contexts.ctx_mut() else { return };

    let session = &params.explorer.session;
    let selected_id = session.selection().part.clone();

    egui::SidePanel::left("parts_panel")
        .default_width(PANEL_WIDTH)
        .resizable(true)
        .show(ctx, |ui| {
            match &params.catalog.catalog {
                Some(catalog) => {
                    ui.heading(catalog.bike.title());
                    ui.label(egui::RichText::new(&catalog.diagram.label).color(egui::Color32::GRAY));
                    if catalog.diagram.viewer == DiagramViewer::Image {
                        ui.label(
                            egui::RichText::new("Only 3D diagrams can be explored in this viewer.")
                                .color(egui::Color32::from_rgb(255, 200, 50)),
                        );
                    }
                }
                None => {
                    ui.heading("Parts Explorer");
                }
            }

            if params.catalog.loading {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading catalog...");
                });
            }
            if let Some(err) = &params.catalog.error {
                ui.colored_label(egui::Color32::from_rgb(255, 100, 100), err);
            }
            if let Some(text) = model_status_text(&params.model.status) {
                ui.label(egui::RichText::new(text).small());
            }

            ui.separator();

            ui.horizontal(|ui| {
                ui.label(format!("Parts ({})", session.parts().len()));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let mut debug = params.debug.0;
                    if ui.checkbox(&mut debug, "Debug").changed() {
                        params.debug.0 = debug;
                    }
                });
            });

            if session.parts().is_empty() {
                ui.label(egui::RichText::new("No parts listed for this diagram").color(egui::Color32::GRAY));
            }

            egui::ScrollArea::vertical().show(ui, |ui| {
                for part in session.parts() {
                    let is_selected = selected_id.as_ref() == Some(&part.id);
                    let label = match &part.part_number {
                        Some(number) => format!("{}  {}", part.name, number),
                        None => part.name.clone(),
                    };
                    if ui.selectable_label(is_selected, label).clicked() {
                        let command = if is_selected {
                            PartCommand::ClearSelection
                        } else {
                            PartCommand::Select(part.id.clone())
                        };
                        params.part_commands.write(PartCommandMessage(command));
                    }
                }
            });
        });

    if let Some(part) = session.selected_part() {
        egui::SidePanel::right("details_panel")
            .default_width(PANEL_WIDTH)
            .resizable(true)
            .show(ctx, |ui| {
                render_part_details(ui, part, session.mapping_source(&part.id));
                ui.separator();
                if ui.button("Clear selection").clicked() {
                    params.part_commands.write(PartCommandMessage(PartCommand::ClearSelection));
                }
            });
    }

    if params.debug.0 {
        egui::Window::new("Mesh Debug")
            .collapsible(true)
            .resizable(false)
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -12.0))
            .show(ctx, |ui| match session.debug_info() {
                Some(info) => render_debug_info(ui, info),
                None => {
                    ui.label("Click a mesh to inspect it");
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_status_text() {
        assert_eq!(model_status_text(&ModelStatus::Ready), None);
        assert_eq!(model_status_text(&ModelStatus::Idle), None);
        assert_eq!(model_status_text(&ModelStatus::Loading).as_deref(), Some("Loading model..."));
        assert_eq!(
            model_status_text(&ModelStatus::Failed("404".to_string())).as_deref(),
            Some("Model failed to load: 404")
        );
    }
}
