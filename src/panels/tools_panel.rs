use crate::RedactApp;
use crate::components::ToolButton;
use crate::element::{
    parse_hex_color, to_hex_color, RedactionMode, StyleParams, MAX_ALPHA, MAX_BLOCK_SIZE, MAX_STROKE_WIDTH,
    MIN_ALPHA, MIN_BLOCK_SIZE, MIN_STROKE_WIDTH,
};
use crate::tools::ToolType;

pub fn tools_panel(app: &mut RedactApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Tools");
                ui.horizontal(|ui| {
                    let active = app.editor().tool();
                    for tool in ToolType::ALL {
                        if ToolButton::new(tool, active == tool).show(ui).clicked() {
                            log::info!("Tool selected from UI: {}", tool.name());
                            app.editor_mut().set_tool(tool);
                        }
                    }
                });
                ui.separator();

                style_section(app, ui);
                ui.separator();

                edit_section(app, ui);
                ui.separator();

                objects_section(app, ui);
                ui.separator();

                history_section(app, ui);
            });
        });
}

fn style_section(app: &mut RedactApp, ui: &mut egui::Ui) {
    ui.heading("Style");
    let before = app.editor().style().clone();
    let mut style = before.clone();

    ui.horizontal(|ui| {
        for mode in RedactionMode::ALL {
            ui.selectable_value(&mut style.mode, mode, mode.label());
        }
    });

    match style.mode {
        RedactionMode::Pixelate => {
            ui.add(egui::Slider::new(&mut style.pixelate.block_size, MIN_BLOCK_SIZE..=MAX_BLOCK_SIZE).text("Block size"));
            ui.add(egui::Slider::new(&mut style.pixelate.alpha, MIN_ALPHA..=MAX_ALPHA).text("Opacity"));
        }
        RedactionMode::Fill => {
            ui.horizontal(|ui| {
                ui.label("Color");
                color_edit(ui, &mut style.fill.color);
            });
        }
        RedactionMode::Mark => {
            ui.horizontal(|ui| {
                ui.label("Color");
                color_edit(ui, &mut style.mark.stroke_color);
            });
            ui.add(egui::Slider::new(&mut style.mark.stroke_width, MIN_STROKE_WIDTH..=MAX_STROKE_WIDTH).text("Stroke width"));
        }
    }
    ui.add(egui::Slider::new(&mut style.line_width, MIN_STROKE_WIDTH..=MAX_STROKE_WIDTH).text("Line width"));

    if style != before {
        app.editor_mut().set_style(style);
    }

    let has_selection = !app.editor().document().selected_ids.is_empty();
    if ui
        .add_enabled(has_selection, egui::Button::new("Apply to selection"))
        .on_hover_text("Ctrl+Enter")
        .clicked()
    {
        app.editor_mut().apply_style_to_selection();
    }
}

/// Hex string colour picker; invalid strings show the default colour
fn color_edit(ui: &mut egui::Ui, hex: &mut String) {
    let fallback = StyleParams::default().fill_color();
    let color = parse_hex_color(hex).unwrap_or(fallback);
    let mut rgb = [color.r(), color.g(), color.b()];
    if ui.color_edit_button_srgb(&mut rgb).changed() {
        *hex = to_hex_color(egui::Color32::from_rgb(rgb[0], rgb[1], rgb[2]));
    }
    ui.monospace(hex.as_str());
}

fn edit_section(app: &mut RedactApp, ui: &mut egui::Ui) {
    let can_undo = app.editor().can_undo();
    let can_redo = app.editor().can_redo();
    let has_selection = !app.editor().document().selected_ids.is_empty();
    let has_image = app.editor().document().has_image();

    ui.horizontal(|ui| {
        if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
            app.editor_mut().undo();
        }
        if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
            app.editor_mut().redo();
        }
    });

    ui.horizontal(|ui| {
        if ui.add_enabled(has_selection, egui::Button::new("Delete")).clicked() {
            app.editor_mut().delete_selected();
        }
        if ui.add_enabled(has_selection, egui::Button::new("Duplicate")).clicked() {
            app.editor_mut().duplicate_selection();
        }
    });

    if ui.add_enabled(has_image, egui::Button::new("Export PNG")).clicked() {
        app.export();
    }
    if let Some(status) = app.status() {
        ui.label(status);
    }
}

fn objects_section(app: &mut RedactApp, ui: &mut egui::Ui) {
    ui.heading("Objects");

    // Topmost first, like a layer list
    let rows: Vec<(String, String, bool, bool)> = app
        .editor()
        .objects()
        .iter()
        .rev()
        .map(|object| {
            (
                object.id.clone(),
                format!("{} ({})", object.shape.kind(), object.style.mode.label()),
                object.visible,
                app.editor().document().is_selected(&object.id),
            )
        })
        .collect();

    if rows.is_empty() {
        ui.weak("No redactions yet");
        return;
    }

    let shift = ui.input(|i| i.modifiers.shift);
    for (id, label, visible, selected) in rows {
        ui.horizontal(|ui| {
            let mut shown = visible;
            if ui.checkbox(&mut shown, "").on_hover_text("Visible").changed() {
                app.editor_mut().toggle_visibility(&id);
            }
            if ui.selectable_label(selected, label).clicked() {
                let editor = app.editor_mut();
                if shift {
                    let mut ids = editor.document().selected_ids.clone();
                    if !ids.remove(&id) {
                        ids.insert(id.clone());
                    }
                    editor.set_selection(ids);
                } else {
                    editor.set_selection([id.clone()]);
                }
            }
        });
    }
}

fn history_section(app: &mut RedactApp, ui: &mut egui::Ui) {
    let history = app.editor().history();
    ui.horizontal(|ui| {
        ui.label(format!("Undo stack size: {}", history.undo_stack().len()));
        ui.label(format!("Redo stack size: {}", history.redo_stack().len()));
    });

    egui::Grid::new("command_history_grid")
        .num_columns(2)
        .spacing([40.0, 4.0])
        .striped(true)
        .show(ui, |ui| {
            ui.strong("Undo Stack");
            ui.strong("Redo Stack");
            ui.end_row();

            let undo_stack = history.undo_stack();
            let redo_stack = history.redo_stack();
            let max_len = undo_stack.len().max(redo_stack.len());

            for i in 0..max_len {
                ui.label(undo_stack.get(i).map_or("", |command| command.kind.label()));
                ui.label(redo_stack.get(i).map_or("", |command| command.kind.label()));
                ui.end_row();
            }
        });
}
