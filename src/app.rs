use std::path::PathBuf;

use egui::{Event, Key, KeyboardShortcut, Modifiers, Painter, Rect};
use log::{debug, info, warn};

use crate::clipboard_image;
use crate::error::ExportError;
use crate::file_handler::FileHandler;
use crate::input::{route_event, InputHandler};
use crate::panels::{central_panel, tools_panel};
use crate::renderer::{self, Compositor};
use crate::state::{EditorContext, PasteOutcome, Preferences};
use crate::texture_manager::TextureManager;

const UNDO: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Z);
const REDO: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND.plus(Modifiers::SHIFT), Key::Z);
const REDO_ALT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Y);
const DUPLICATE: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::D);
const APPLY_STYLE: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Enter);

/// Editor-level actions bound to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shortcut {
    Undo,
    Redo,
    Delete,
    Duplicate,
    ApplyStyle,
    Cancel,
}

pub struct RedactApp {
    editor: EditorContext,
    compositor: Compositor,
    textures: TextureManager,
    input: InputHandler,
    file_handler: FileHandler,
    /// Result of the last export, shown under the export button
    status: Option<String>,
}

impl Default for RedactApp {
    fn default() -> Self {
        Self::with_preferences(&Preferences::default())
    }
}

impl RedactApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let preferences = cc.storage.map(Preferences::load).unwrap_or_default();
        Self::with_preferences(&preferences)
    }

    pub fn with_preferences(preferences: &Preferences) -> Self {
        Self {
            editor: EditorContext::new(preferences),
            compositor: Compositor::new(),
            textures: TextureManager::default(),
            input: InputHandler::new(),
            file_handler: FileHandler::new(),
            status: None,
        }
    }

    pub fn editor(&self) -> &EditorContext {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut EditorContext {
        &mut self.editor
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    pub fn input(&self) -> &InputHandler {
        &self.input
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Routes this frame's pointer input on the canvas into the editor
    pub fn handle_canvas_input(&mut self, ctx: &egui::Context, canvas_rect: Rect) {
        self.editor.set_container_size(canvas_rect.size());
        for event in self.input.process_input(ctx, canvas_rect) {
            route_event(&mut self.editor, &event);
        }
    }

    /// Performs the pending render, if any, into the base surface
    pub fn render_surfaces(&mut self) {
        if let Some(kind) = self.editor.take_render_request() {
            self.compositor.render(kind, self.editor.document());
        }
    }

    /// Draws the base surface scaled into the image rect, then the selection
    /// and draft indicators on top
    pub fn paint_canvas(&mut self, ctx: &egui::Context, painter: &Painter, canvas_rect: Rect) {
        let Some(viewport) = self.editor.viewport() else {
            return;
        };
        let origin = canvas_rect.min.to_vec2();

        match self.textures.texture_for_surface(self.compositor.base(), ctx) {
            Ok(texture) => {
                let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                painter.image(texture, viewport.image_rect().translate(origin), uv, egui::Color32::WHITE);
            }
            Err(err) => debug!("Base surface not drawn: {}", err),
        }

        let document = self.editor.document();
        painter.extend(renderer::selection_shapes(&viewport, origin, &document.selected_objects()));
        if let Some(draft) = &document.pending_draft {
            painter.extend(renderer::draft_shapes(&viewport, origin, draft));
        }
    }

    /// Writes the redacted PNG next to the working directory
    pub fn export(&mut self) {
        self.status = match self.write_export() {
            Ok(Some(path)) => Some(format!("Saved {}", path.display())),
            Ok(None) => None,
            Err(err) => {
                warn!("Export failed: {}", err);
                Some(format!("Export failed: {err}"))
            }
        };
    }

    fn write_export(&self) -> Result<Option<PathBuf>, ExportError> {
        let (Some(bytes), Some(name)) = (self.editor.export_raster()?, self.editor.export_file_name()) else {
            return Ok(None);
        };
        let path = PathBuf::from(name);
        std::fs::write(&path, &bytes)?;
        info!("Exported {} ({} bytes)", path.display(), bytes.len());
        Ok(Some(path))
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        if !self.file_handler.check_for_dropped_files(ctx) {
            return;
        }
        if let Some(image) = self.file_handler.take_dropped_image() {
            self.textures.clear_cache();
            self.status = None;
            self.editor.set_image(image.into_ref());
        }
    }

    /// Copy and cut arrive as egui events. Paste is triggered by the paste event
    /// or, for a clipboard holding only an image, by the bare key press.
    fn handle_clipboard_events(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let events = ctx.input(|i| i.events.clone());
        let mut paste: Option<String> = None;

        for event in events {
            match event {
                Event::Copy => {
                    if let Some(text) = self.editor.copy_selection() {
                        ctx.copy_text(text);
                    }
                }
                Event::Cut => {
                    if let Some(text) = self.editor.copy_selection() {
                        ctx.copy_text(text);
                        self.editor.delete_selected();
                    }
                }
                Event::Paste(text) => paste = Some(text),
                Event::Key {
                    key: Key::V,
                    pressed: true,
                    repeat: false,
                    modifiers,
                    ..
                } if modifiers.command && paste.is_none() => paste = Some(String::new()),
                _ => {}
            }
        }

        if let Some(text) = paste {
            self.paste(&text);
        }
    }

    fn paste(&mut self, text: &str) {
        let image = clipboard_image::read_image().unwrap_or_else(|err| {
            warn!("Clipboard image unavailable: {err}");
            None
        });
        match self.editor.paste(image, text) {
            PasteOutcome::Image => {
                self.textures.clear_cache();
                self.status = None;
            }
            PasteOutcome::Shapes => {}
            PasteOutcome::Nothing => debug!("Clipboard held nothing to paste"),
        }
    }

    fn consume_shortcut(ctx: &egui::Context) -> Option<Shortcut> {
        ctx.input_mut(|i| {
            // Shifted redo first: consume_shortcut ignores extra shift on the plain undo
            if i.consume_shortcut(&REDO) || i.consume_shortcut(&REDO_ALT) {
                Some(Shortcut::Redo)
            } else if i.consume_shortcut(&UNDO) {
                Some(Shortcut::Undo)
            } else if i.consume_shortcut(&DUPLICATE) {
                Some(Shortcut::Duplicate)
            } else if i.consume_shortcut(&APPLY_STYLE) {
                Some(Shortcut::ApplyStyle)
            } else if i.consume_key(Modifiers::NONE, Key::Delete) || i.consume_key(Modifiers::NONE, Key::Backspace) {
                Some(Shortcut::Delete)
            } else if i.consume_key(Modifiers::NONE, Key::Escape) {
                Some(Shortcut::Cancel)
            } else {
                None
            }
        })
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let Some(shortcut) = Self::consume_shortcut(ctx) else {
            return;
        };
        debug!("Shortcut {:?}", shortcut);
        match shortcut {
            Shortcut::Undo => {
                self.editor.undo();
            }
            Shortcut::Redo => {
                self.editor.redo();
            }
            Shortcut::Delete => {
                self.editor.delete_selected();
            }
            Shortcut::Duplicate => {
                self.editor.duplicate_selection();
            }
            Shortcut::ApplyStyle => {
                self.editor.apply_style_to_selection();
            }
            Shortcut::Cancel => self.editor.cancel(),
        }
    }
}

impl eframe::App for RedactApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.editor.preferences().save(storage);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.handle_clipboard_events(ctx);
        self.handle_shortcuts(ctx);

        tools_panel(self, ctx);
        central_panel(self, ctx);

        self.file_handler.preview_files_being_dropped(ctx);
    }
}
