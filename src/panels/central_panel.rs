use crate::RedactApp;

pub fn central_panel(app: &mut RedactApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::central_panel(&ctx.style()).inner_margin(0.0))
        .show(ctx, |ui| {
            let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let canvas_rect = response.rect;

            if !app.editor().document().has_image() {
                painter.text(
                    canvas_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "Drop an image here to start",
                    egui::FontId::proportional(20.0),
                    ui.visuals().weak_text_color(),
                );
                return;
            }

            app.handle_canvas_input(ctx, canvas_rect);
            app.render_surfaces();
            app.paint_canvas(ctx, &painter, canvas_rect);

            if response.hovered() || app.input().is_captured() {
                ctx.set_cursor_icon(app.editor().cursor());
            }
        });
}
