//! The editor controller.
//!
//! `EditorContext` owns the document, the history, the active tool and style,
//! the shape clipboard and the gesture state machine. Every change to the
//! object list goes through it, so history always matches what is displayed
//! and exported. Pointer positions arrive in container coordinates and are
//! mapped to image pixels with the current viewport transform.

use std::collections::BTreeSet;

use egui::{CursorIcon, Modifiers, Pos2, Vec2};
use log::{debug, info};

use super::{EditorState, Preferences};
use crate::clipboard::{self, ShapeClipboardPayload, DEFAULT_PASTE_OFFSET};
use crate::command::{CommandHistory, CommandType};
use crate::document::Document;
use crate::element::{factory, RedactionObject, Shape, StyleParams};
use crate::error::{ExportError, TransitionError};
use crate::geometry::hit_testing::RESIZE_HANDLE_RADIUS;
use crate::geometry::{create_freehand, create_from_drag, hit_test_handles, hit_test_objects, move_shape, resize_by_handle};
use crate::image_model::{ImageModel, ImageRef};
use crate::renderer::{self, RenderKind, RenderScheduler};
use crate::tools::ToolType;
use crate::viewport::ViewportTransform;

/// What a paste ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteOutcome {
    /// A clipboard image replaced the document
    Image,
    /// Shapes were added from clipboard text or the last copy
    Shapes,
    Nothing,
}

/// Minimum distance between consecutive freehand points, in image pixels
const FREEHAND_MIN_STEP: f32 = 1.0;

#[derive(Debug)]
pub struct EditorContext {
    state: EditorState,
    document: Document,
    history: CommandHistory,
    tool: ToolType,
    style: StyleParams,
    clipboard: Option<ShapeClipboardPayload>,
    /// Freshly pasted or duplicated objects awaiting repositioning
    placing_ids: BTreeSet<String>,
    container: Option<Vec2>,
    cursor: CursorIcon,
    scheduler: RenderScheduler,
}

impl Default for EditorContext {
    fn default() -> Self {
        Self::new(&Preferences::default())
    }
}

impl EditorContext {
    pub fn new(preferences: &Preferences) -> Self {
        Self {
            state: EditorState::Idle,
            document: Document::new(),
            history: CommandHistory::default(),
            tool: preferences.default_tool,
            style: preferences.default_style.normalized(),
            clipboard: None,
            placing_ids: BTreeSet::new(),
            container: None,
            cursor: preferences.default_tool.idle_cursor(),
            scheduler: RenderScheduler::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// An owned copy of the current document for UI binding
    pub fn snapshot(&self) -> Document {
        self.document.clone()
    }

    pub fn objects(&self) -> &[RedactionObject] {
        &self.document.objects
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn tool(&self) -> ToolType {
        self.tool
    }

    pub fn style(&self) -> &StyleParams {
        &self.style
    }

    pub fn clipboard(&self) -> Option<&ShapeClipboardPayload> {
        self.clipboard.as_ref()
    }

    pub fn placing_ids(&self) -> &BTreeSet<String> {
        &self.placing_ids
    }

    pub fn cursor(&self) -> CursorIcon {
        self.cursor
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn preferences(&self) -> Preferences {
        Preferences::new(self.tool, self.style.clone())
    }

    /// Canvas size last reported by the view
    pub fn container_size(&self) -> Option<Vec2> {
        self.container
    }

    /// Contain-fit transform for the current image and container, if both exist
    pub fn viewport(&self) -> Option<ViewportTransform> {
        let image = self.document.image.as_ref()?;
        let container = self.container?;
        Some(ViewportTransform::compute(container.x, container.y, image.width(), image.height()))
    }

    pub fn request_render(&mut self, kind: RenderKind) {
        self.scheduler.request(kind);
    }

    /// The render to perform on this paint, if any
    pub fn take_render_request(&mut self) -> Option<RenderKind> {
        self.scheduler.take()
    }

    // ---- Document-level mutators ----

    /// Replaces the image and resets objects, selection, draft and history
    pub fn set_image(&mut self, image: ImageRef) {
        info!("Loaded image {} ({}x{})", image.name(), image.width(), image.height());
        self.document = Document::with_image(image);
        self.history.clear();
        self.placing_ids.clear();
        self.state = EditorState::Idle;
        self.request_render(RenderKind::Full);
    }

    pub fn set_container_size(&mut self, size: Vec2) {
        if self.container == Some(size) {
            return;
        }
        self.container = Some(size);
        self.request_render(RenderKind::OverlayOnly);
    }

    pub fn set_tool(&mut self, tool: ToolType) {
        if self.tool == tool {
            return;
        }
        debug!("Tool changed to {}", tool.name());
        self.tool = tool;
        self.cursor = tool.idle_cursor();
    }

    pub fn set_style(&mut self, style: StyleParams) {
        self.style = style.normalized();
    }

    /// Selects the given ids, ignoring ids that name no object
    pub fn set_selection<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        let document = &self.document;
        let selected: BTreeSet<String> = ids.into_iter().filter(|id| document.contains(id)).collect();
        if selected != self.document.selected_ids {
            self.document.selected_ids = selected;
            self.request_render(RenderKind::OverlayOnly);
        }
    }

    pub fn clear_selection(&mut self) {
        self.set_selection(std::iter::empty());
    }

    /// Creates or updates the draft with the active style. The draft keeps its
    /// id while it is being reshaped. `None` clears it.
    pub fn set_pending_shape(&mut self, shape: Option<Shape>) {
        let Some(shape) = shape else {
            self.cancel_pending();
            return;
        };

        let draft = match &self.document.pending_draft {
            Some(current) => current.with_shape(shape).with_style(self.style.clone()),
            None => factory::create_object(shape, self.style.clone()),
        };
        self.document.pending_draft = Some(draft);
        self.request_render(RenderKind::OverlayOnly);
    }

    pub fn cancel_pending(&mut self) {
        if self.document.pending_draft.take().is_some() {
            self.request_render(RenderKind::OverlayOnly);
        }
    }

    /// Adds the draft to the object list as one `add` command and selects it
    pub fn confirm_pending_draft(&mut self) -> bool {
        let Some(draft) = self.document.pending_draft.take() else {
            return false;
        };
        let before = self.document.objects.clone();
        let mut after = before.clone();
        after.push(draft.clone());

        self.commit_objects(CommandType::Add, &before, after);
        self.document.selected_ids = BTreeSet::from([draft.id]);
        true
    }

    /// Shows an object list without recording history; used while dragging
    pub fn set_objects_transient(&mut self, objects: Vec<RedactionObject>) {
        self.document.objects = objects;
        self.request_render(RenderKind::Full);
    }

    /// Makes `after` the current object list and records `before -> after` as one
    /// command. Returns false when the lists were identical and nothing was recorded.
    pub fn commit_objects(&mut self, kind: CommandType, before: &[RedactionObject], after: Vec<RedactionObject>) -> bool {
        let recorded = self.history.commit(kind, before, &after);
        if recorded {
            info!("{} committed ({} objects)", kind.label(), after.len());
        }
        self.document.objects = after;
        self.document.retain_valid_selection();
        self.request_render(RenderKind::Full);
        recorded
    }

    pub fn delete_selected(&mut self) -> bool {
        if self.document.selected_ids.is_empty() {
            return false;
        }
        let before = self.document.objects.clone();
        let after: Vec<RedactionObject> = before
            .iter()
            .filter(|object| !self.document.selected_ids.contains(&object.id))
            .cloned()
            .collect();

        self.document.selected_ids.clear();
        self.placing_ids.clear();
        self.commit_objects(CommandType::Delete, &before, after)
    }

    pub fn undo(&mut self) -> bool {
        let Some(objects) = self.history.undo() else {
            return false;
        };
        info!("Undo ({} steps left)", self.history.undo_stack().len());
        self.restore_objects(objects);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(objects) = self.history.redo() else {
            return false;
        };
        info!("Redo ({} steps left)", self.history.redo_stack().len());
        self.restore_objects(objects);
        true
    }

    fn restore_objects(&mut self, objects: Vec<RedactionObject>) {
        self.state = EditorState::Idle;
        self.document.objects = objects;
        self.document.retain_valid_selection();
        self.document.pending_draft = None;
        self.placing_ids.clear();
        self.request_render(RenderKind::Full);
    }

    /// Gives every selected object the active style, as one `update` command
    pub fn apply_style_to_selection(&mut self) -> bool {
        if self.document.selected_ids.is_empty() {
            return false;
        }
        let before = self.document.objects.clone();
        let after = before
            .iter()
            .map(|object| {
                if self.document.selected_ids.contains(&object.id) {
                    object.with_style(self.style.clone())
                } else {
                    object.clone()
                }
            })
            .collect();
        self.commit_objects(CommandType::Update, &before, after)
    }

    pub fn toggle_visibility(&mut self, id: &str) -> bool {
        let Some(index) = self.document.objects.iter().position(|object| object.id == id) else {
            return false;
        };
        let before = self.document.objects.clone();
        let mut after = before.clone();
        after[index] = before[index].with_visibility(!before[index].visible);
        self.commit_objects(CommandType::Update, &before, after)
    }

    // ---- Clipboard ----

    pub fn set_clipboard(&mut self, payload: Option<ShapeClipboardPayload>) {
        self.clipboard = payload;
    }

    /// Stores the selection as the shape clipboard and returns its text form
    pub fn copy_selection(&mut self) -> Option<String> {
        let selected: Vec<RedactionObject> = self.document.selected_objects().into_iter().cloned().collect();
        if selected.is_empty() {
            return None;
        }
        let payload = ShapeClipboardPayload::new(&selected);
        let text = clipboard::serialize_payload(&payload);
        debug!("Copied {} objects", selected.len());
        self.clipboard = Some(payload);
        Some(text)
    }

    /// Adds offset copies of `objects` as one `add` command and marks them as placing
    pub fn paste_objects(&mut self, objects: &[RedactionObject]) -> Vec<RedactionObject> {
        if objects.is_empty() || !self.document.has_image() {
            return Vec::new();
        }
        let duplicated = clipboard::duplicate_with_offset(objects, DEFAULT_PASTE_OFFSET);
        let before = self.document.objects.clone();
        let mut after = before.clone();
        after.extend(duplicated.iter().cloned());

        self.commit_objects(CommandType::Add, &before, after);
        self.set_placing_ids(duplicated.iter().map(|object| object.id.clone()));
        duplicated
    }

    /// Pastes clipboard text if it carries a shape payload, otherwise the last
    /// copied payload. Returns false when there was nothing to paste.
    pub fn paste_text(&mut self, text: &str) -> bool {
        let payload = match clipboard::parse(text) {
            Some(payload) => payload,
            None => match &self.clipboard {
                Some(fallback) => fallback.clone(),
                None => return false,
            },
        };
        !self.paste_objects(&payload.objects).is_empty()
    }

    /// Pastes in priority order: a clipboard image replaces the document, then a
    /// shape payload carried by `text`, then the last copied payload.
    pub fn paste(&mut self, image: Option<ImageModel>, text: &str) -> PasteOutcome {
        if let Some(image) = image {
            self.set_image(image.into_ref());
            return PasteOutcome::Image;
        }
        if self.paste_text(text) {
            PasteOutcome::Shapes
        } else {
            PasteOutcome::Nothing
        }
    }

    /// Pastes the current selection next to itself
    pub fn duplicate_selection(&mut self) -> Vec<RedactionObject> {
        let selected: Vec<RedactionObject> = self.document.selected_objects().into_iter().cloned().collect();
        self.paste_objects(&selected)
    }

    pub fn set_placing_ids<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.placing_ids = ids.into_iter().collect();
        self.set_selection(self.placing_ids.clone());
    }

    pub fn clear_placing_ids(&mut self) {
        self.placing_ids.clear();
    }

    // ---- Export ----

    /// PNG of the composited image at native size, or `None` without an image
    pub fn export_raster(&self) -> Result<Option<Vec<u8>>, ExportError> {
        let Some(image) = self.document.image.as_deref() else {
            return Ok(None);
        };
        renderer::export_raster(image, &self.document.objects).map(Some)
    }

    /// `<stem>-redacted.png` for the loaded image
    pub fn export_file_name(&self) -> Option<String> {
        let image = self.document.image.as_ref()?;
        let name = image.name();
        let stem = match name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => name,
        };
        let stem = if stem.is_empty() { "image" } else { stem };
        Some(format!("{stem}-redacted.png"))
    }

    // ---- Pointer gestures ----

    fn image_point(&self, screen: Pos2) -> Option<Pos2> {
        self.viewport().map(|transform| transform.to_image_point(screen))
    }

    pub fn on_pointer_down(&mut self, screen: Pos2, modifiers: Modifiers) -> Result<(), TransitionError> {
        let point = self.image_point(screen).ok_or(TransitionError::NoImage)?;
        if !self.state.is_idle() {
            return Err(TransitionError::InvalidStateTransition {
                from: self.state.name(),
                to: if self.tool.is_drawing() { "drawing" } else { "moving" },
            });
        }

        if self.tool.is_drawing() {
            return self.begin_drawing(point);
        }

        let selected = self.document.selected_objects();
        if let Some(hit) = hit_test_handles(point, &selected, RESIZE_HANDLE_RADIUS) {
            let Some(handle) = hit.handle() else {
                return Ok(());
            };
            self.state.transition_to(EditorState::Resizing {
                before: self.document.objects.clone(),
                object_id: hit.object_id.clone(),
                handle,
            })?;
            debug!("Resizing {} by {}", hit.object_id, handle.as_str());
            self.cursor = handle.cursor_icon();
            self.set_selection([hit.object_id]);
            return Ok(());
        }

        let Some(hit) = hit_test_objects(point, &self.document.objects) else {
            self.clear_selection();
            self.cursor = CursorIcon::Default;
            return Ok(());
        };

        if modifiers.shift {
            let mut selected = self.document.selected_ids.clone();
            if !selected.remove(&hit.object_id) {
                selected.insert(hit.object_id);
            }
            self.set_selection(selected);
            return Ok(());
        }

        let target_ids = if self.document.is_selected(&hit.object_id) {
            self.document.selected_ids.clone()
        } else {
            BTreeSet::from([hit.object_id])
        };
        self.state.transition_to(EditorState::Moving {
            start: point,
            before: self.document.objects.clone(),
            target_ids: target_ids.clone(),
        })?;
        debug!("Moving {} objects", target_ids.len());
        self.set_selection(target_ids);
        self.cursor = CursorIcon::Grabbing;
        Ok(())
    }

    fn begin_drawing(&mut self, point: Pos2) -> Result<(), TransitionError> {
        let (points, shape) = if self.tool == ToolType::Freehand {
            (vec![point], Some(create_freehand(&[point, point])))
        } else {
            (Vec::new(), create_from_drag(self.tool, point, point, self.style.line_width as f32))
        };

        self.state.transition_to(EditorState::Drawing {
            tool: self.tool,
            start: point,
            points,
            before: self.document.objects.clone(),
        })?;
        debug!("Drawing {}", self.tool.name());

        self.clear_selection();
        self.document.pending_draft = None;
        self.set_pending_shape(shape);
        self.cursor = CursorIcon::Crosshair;
        Ok(())
    }

    pub fn on_pointer_move(&mut self, screen: Pos2) {
        let Some(point) = self.image_point(screen) else {
            return;
        };
        let line_width = self.style.line_width as f32;

        match &mut self.state {
            EditorState::Idle => self.cursor = self.hover_cursor(point),
            EditorState::Drawing { tool, start, points, .. } => {
                let shape = if *tool == ToolType::Freehand {
                    if points.last().is_none_or(|last| last.distance(point) >= FREEHAND_MIN_STEP) {
                        points.push(point);
                    }
                    Some(create_freehand(points))
                } else {
                    create_from_drag(*tool, *start, point, line_width)
                };
                self.set_pending_shape(shape);
            }
            EditorState::Moving { start, before, target_ids } => {
                let delta = point - *start;
                let next = before
                    .iter()
                    .map(|object| {
                        if delta != Vec2::ZERO && target_ids.contains(&object.id) {
                            object.with_shape(move_shape(&object.shape, delta))
                        } else {
                            object.clone()
                        }
                    })
                    .collect();
                self.set_objects_transient(next);
            }
            EditorState::Resizing { before, object_id, handle } => {
                let handle = *handle;
                let next = before
                    .iter()
                    .map(|object| {
                        if &object.id == object_id {
                            object.with_shape(resize_by_handle(&object.shape, handle, point))
                        } else {
                            object.clone()
                        }
                    })
                    .collect();
                self.set_objects_transient(next);
            }
        }
    }

    /// Ends the active gesture. Moves and resizes commit one `update`; drawing
    /// commits the draft as one `add` and selects it.
    pub fn on_pointer_up(&mut self) {
        match self.state.finish() {
            EditorState::Idle => {}
            EditorState::Moving { before, .. } | EditorState::Resizing { before, .. } => {
                let after = self.document.objects.clone();
                self.commit_objects(CommandType::Update, &before, after);
                self.clear_placing_ids();
            }
            EditorState::Drawing { before, .. } => {
                if let Some(draft) = self.document.pending_draft.take() {
                    let mut after = before.clone();
                    after.push(draft.clone());
                    self.commit_objects(CommandType::Add, &before, after);
                    self.set_selection([draft.id]);
                }
            }
        }
        self.cursor = self.tool.idle_cursor();
    }

    /// Gestures survive the pointer leaving the canvas; they end on release
    pub fn on_pointer_leave(&mut self) {
        if self.state.is_idle() {
            self.cursor = self.tool.idle_cursor();
        }
    }

    /// Abandons the active gesture without recording it, drops the draft and
    /// clears the selection
    pub fn cancel(&mut self) {
        if let Some(before) = self.state.finish().before() {
            self.document.objects = before.to_vec();
            self.request_render(RenderKind::Full);
        }
        self.cancel_pending();
        self.clear_selection();
        self.clear_placing_ids();
        self.cursor = self.tool.idle_cursor();
    }

    fn hover_cursor(&self, point: Pos2) -> CursorIcon {
        if self.tool.is_drawing() {
            return CursorIcon::Crosshair;
        }
        let selected = self.document.selected_objects();
        if let Some(handle) = hit_test_handles(point, &selected, RESIZE_HANDLE_RADIUS).and_then(|hit| hit.handle()) {
            return handle.cursor_icon();
        }
        if hit_test_objects(point, &self.document.objects).is_some() {
            CursorIcon::Move
        } else {
            CursorIcon::Default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};
    use image::RgbaImage;

    fn context_with_image() -> EditorContext {
        let mut context = EditorContext::default();
        let image = ImageModel::from_image(RgbaImage::new(200, 100), "photo.jpg").unwrap();
        context.set_image(image.into_ref());
        // Same size as the image, so container and image coordinates coincide
        context.set_container_size(vec2(200.0, 100.0));
        context
    }

    fn drag(context: &mut EditorContext, from: Pos2, to: Pos2) {
        context.on_pointer_down(from, Modifiers::NONE).unwrap();
        context.on_pointer_move(to);
        context.on_pointer_up();
    }

    #[test]
    fn test_drawing_commits_one_add_and_selects() {
        let mut context = context_with_image();
        context.set_tool(ToolType::Rect);
        context.on_pointer_down(pos2(10.0, 10.0), Modifiers::NONE).unwrap();
        context.on_pointer_move(pos2(30.0, 20.0));
        context.on_pointer_move(pos2(50.0, 40.0));
        assert!(context.document().pending_draft.is_some());
        assert!(context.objects().is_empty());

        context.on_pointer_up();
        assert_eq!(context.objects().len(), 1);
        assert_eq!(context.objects()[0].shape, Shape::rect(10.0, 10.0, 40.0, 30.0));
        assert!(context.document().pending_draft.is_none());
        assert!(context.document().is_selected(&context.objects()[0].id));
        assert_eq!(context.history().undo_stack().len(), 1);
    }

    #[test]
    fn test_move_commits_once_from_snapshot() {
        let mut context = context_with_image();
        context.set_tool(ToolType::Rect);
        drag(&mut context, pos2(10.0, 10.0), pos2(50.0, 50.0));
        context.set_tool(ToolType::Select);

        context.on_pointer_down(pos2(30.0, 30.0), Modifiers::NONE).unwrap();
        context.on_pointer_move(pos2(35.0, 30.0));
        context.on_pointer_move(pos2(40.0, 35.0));
        assert!(context.history().undo_stack().len() == 1);
        context.on_pointer_up();

        assert_eq!(context.objects()[0].shape, Shape::rect(20.0, 15.0, 40.0, 40.0));
        assert_eq!(context.history().undo_stack().len(), 2);
        assert!(context.undo());
        assert_eq!(context.objects()[0].shape, Shape::rect(10.0, 10.0, 40.0, 40.0));
    }

    #[test]
    fn test_click_without_move_records_nothing() {
        let mut context = context_with_image();
        context.set_tool(ToolType::Rect);
        drag(&mut context, pos2(10.0, 10.0), pos2(50.0, 50.0));
        context.set_tool(ToolType::Select);

        context.on_pointer_down(pos2(30.0, 30.0), Modifiers::NONE).unwrap();
        context.on_pointer_up();
        assert_eq!(context.history().undo_stack().len(), 1);
    }

    #[test]
    fn test_resize_through_handle() {
        let mut context = context_with_image();
        context.set_tool(ToolType::Rect);
        drag(&mut context, pos2(10.0, 10.0), pos2(50.0, 50.0));
        context.set_tool(ToolType::Select);

        // South-east handle of the selected rect
        context.on_pointer_down(pos2(51.0, 51.0), Modifiers::NONE).unwrap();
        assert!(context.state().is_resizing());
        context.on_pointer_move(pos2(80.0, 70.0));
        context.on_pointer_up();
        assert_eq!(context.objects()[0].shape, Shape::rect(10.0, 10.0, 70.0, 60.0));
    }

    #[test]
    fn test_shift_click_toggles_selection() {
        let mut context = context_with_image();
        context.set_tool(ToolType::Rect);
        drag(&mut context, pos2(10.0, 10.0), pos2(30.0, 30.0));
        drag(&mut context, pos2(100.0, 10.0), pos2(130.0, 30.0));
        context.set_tool(ToolType::Select);

        context.on_pointer_down(pos2(20.0, 20.0), Modifiers::SHIFT).unwrap();
        assert!(context.state().is_idle());
        assert_eq!(context.document().selected_ids.len(), 2);

        context.on_pointer_down(pos2(20.0, 20.0), Modifiers::SHIFT).unwrap();
        assert_eq!(context.document().selected_ids.len(), 1);
    }

    #[test]
    fn test_click_on_empty_space_clears_selection() {
        let mut context = context_with_image();
        context.set_tool(ToolType::Rect);
        drag(&mut context, pos2(10.0, 10.0), pos2(30.0, 30.0));
        context.set_tool(ToolType::Select);

        context.on_pointer_down(pos2(150.0, 80.0), Modifiers::NONE).unwrap();
        assert!(context.document().selected_ids.is_empty());
    }

    #[test]
    fn test_freehand_skips_tiny_steps() {
        let mut context = context_with_image();
        context.set_tool(ToolType::Freehand);
        context.on_pointer_down(pos2(10.0, 10.0), Modifiers::NONE).unwrap();
        context.on_pointer_move(pos2(10.5, 10.0));
        context.on_pointer_move(pos2(20.0, 10.0));
        context.on_pointer_move(pos2(20.0, 20.0));

        let EditorState::Drawing { points, .. } = context.state() else { panic!() };
        assert_eq!(points.len(), 3);
        context.on_pointer_up();
        assert_eq!(context.objects()[0].shape.kind(), "freehand");
    }

    #[test]
    fn test_pointer_events_need_an_image() {
        let mut context = EditorContext::default();
        context.set_container_size(vec2(100.0, 100.0));
        assert_eq!(context.on_pointer_down(pos2(1.0, 1.0), Modifiers::NONE), Err(TransitionError::NoImage));
        context.on_pointer_move(pos2(2.0, 2.0));
        assert!(context.state().is_idle());
    }

    #[test]
    fn test_second_pointer_down_is_rejected() {
        let mut context = context_with_image();
        context.set_tool(ToolType::Rect);
        context.on_pointer_down(pos2(10.0, 10.0), Modifiers::NONE).unwrap();
        assert!(context.on_pointer_down(pos2(20.0, 20.0), Modifiers::NONE).is_err());
        assert!(context.state().is_drawing());
    }

    #[test]
    fn test_pointer_leave_keeps_gesture() {
        let mut context = context_with_image();
        context.set_tool(ToolType::Rect);
        context.on_pointer_down(pos2(10.0, 10.0), Modifiers::NONE).unwrap();
        context.on_pointer_leave();
        assert!(context.state().is_drawing());
    }

    #[test]
    fn test_cancel_restores_snapshot() {
        let mut context = context_with_image();
        context.set_tool(ToolType::Rect);
        drag(&mut context, pos2(10.0, 10.0), pos2(50.0, 50.0));
        context.set_tool(ToolType::Select);

        context.on_pointer_down(pos2(30.0, 30.0), Modifiers::NONE).unwrap();
        context.on_pointer_move(pos2(90.0, 60.0));
        context.cancel();
        assert_eq!(context.objects()[0].shape, Shape::rect(10.0, 10.0, 40.0, 40.0));
        assert_eq!(context.history().undo_stack().len(), 1);
        assert!(context.document().selected_ids.is_empty());
    }

    #[test]
    fn test_delete_and_undo() {
        let mut context = context_with_image();
        context.set_tool(ToolType::Ellipse);
        drag(&mut context, pos2(10.0, 10.0), pos2(50.0, 50.0));
        assert!(context.delete_selected());
        assert!(context.objects().is_empty());
        assert!(context.undo());
        assert_eq!(context.objects().len(), 1);
        // The selection was cleared on delete and stays empty
        assert!(context.document().selected_ids.is_empty());
    }

    #[test]
    fn test_apply_style_to_selection() {
        let mut context = context_with_image();
        context.set_tool(ToolType::Rect);
        drag(&mut context, pos2(10.0, 10.0), pos2(50.0, 50.0));

        let mut style = StyleParams::default();
        style.mode = crate::element::RedactionMode::Fill;
        context.set_style(style.clone());
        assert!(context.apply_style_to_selection());
        assert_eq!(context.objects()[0].style, style);
        assert!(context.undo());
        assert_eq!(context.objects()[0].style, StyleParams::default());
    }

    #[test]
    fn test_toggle_visibility_is_undoable() {
        let mut context = context_with_image();
        context.set_tool(ToolType::Rect);
        drag(&mut context, pos2(10.0, 10.0), pos2(50.0, 50.0));
        let id = context.objects()[0].id.clone();

        assert!(context.toggle_visibility(&id));
        assert!(!context.objects()[0].visible);
        context.undo();
        assert!(context.objects()[0].visible);
    }

    #[test]
    fn test_set_image_resets_everything() {
        let mut context = context_with_image();
        context.set_tool(ToolType::Rect);
        drag(&mut context, pos2(10.0, 10.0), pos2(50.0, 50.0));

        let image = ImageModel::from_image(RgbaImage::new(10, 10), "other.png").unwrap();
        context.set_image(image.into_ref());
        assert!(context.objects().is_empty());
        assert!(!context.can_undo());
        assert!(context.document().selected_ids.is_empty());
    }

    #[test]
    fn test_export_file_name() {
        let context = context_with_image();
        assert_eq!(context.export_file_name().as_deref(), Some("photo-redacted.png"));
        assert!(EditorContext::default().export_file_name().is_none());
        assert!(EditorContext::default().export_raster().unwrap().is_none());
    }

    #[test]
    fn test_paste_prefers_clipboard_image() {
        let mut context = context_with_image();
        context.set_tool(ToolType::Rect);
        drag(&mut context, pos2(10.0, 10.0), pos2(50.0, 50.0));
        let text = context.copy_selection().unwrap();

        let image = ImageModel::from_rgba(4, 3, vec![255; 4 * 3 * 4], "image.png").unwrap();
        assert_eq!(context.paste(Some(image), &text), PasteOutcome::Image);
        assert_eq!(context.document().image.as_ref().map(|image| image.width()), Some(4));
        assert!(context.objects().is_empty());
        assert!(!context.can_undo());
    }

    #[test]
    fn test_paste_falls_back_to_text_then_last_copy() {
        let mut context = context_with_image();
        context.set_tool(ToolType::Rect);
        drag(&mut context, pos2(10.0, 10.0), pos2(50.0, 50.0));
        let text = context.copy_selection().unwrap();

        assert_eq!(context.paste(None, &text), PasteOutcome::Shapes);
        assert_eq!(context.objects().len(), 2);

        // Foreign text: the stored copy is pasted instead
        assert_eq!(context.paste(None, "shopping list"), PasteOutcome::Shapes);
        assert_eq!(context.objects().len(), 3);

        let mut empty = context_with_image();
        assert_eq!(empty.paste(None, "shopping list"), PasteOutcome::Nothing);
    }

    #[test]
    fn test_render_requests_are_coalesced() {
        let mut context = context_with_image();
        assert_eq!(context.take_render_request(), Some(RenderKind::Full));
        assert_eq!(context.take_render_request(), None);

        context.set_tool(ToolType::Rect);
        context.on_pointer_down(pos2(10.0, 10.0), Modifiers::NONE).unwrap();
        assert_eq!(context.take_render_request(), Some(RenderKind::OverlayOnly));
        context.on_pointer_up();
        assert_eq!(context.take_render_request(), Some(RenderKind::Full));
    }
}
