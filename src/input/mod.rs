use egui::{Context, Modifiers, PointerButton, Pos2, Rect};
use log::debug;

use crate::state::EditorContext;

/// Pointer input on the canvas, in canvas-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasEvent {
    /// Primary button pressed inside the canvas
    PointerDown { position: Pos2, modifiers: Modifiers },
    /// Pointer moved over the canvas, or anywhere while a press is held
    PointerMove { position: Pos2 },
    /// Primary button released after a press that started on the canvas
    PointerUp { position: Pos2 },
    /// Pointer left the canvas with no button held
    PointerLeave,
}

/// The parts of one frame's pointer state the canvas cares about
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSnapshot {
    pub position: Option<Pos2>,
    pub pressed: bool,
    pub released: bool,
    pub modifiers: Modifiers,
}

impl PointerSnapshot {
    pub fn from_context(ctx: &Context) -> Self {
        ctx.input(|input| Self {
            position: input.pointer.latest_pos(),
            pressed: input.pointer.button_pressed(PointerButton::Primary),
            released: input.pointer.button_released(PointerButton::Primary),
            modifiers: input.modifiers,
        })
    }
}

/// Converts raw egui pointer input into canvas events.
///
/// A press that starts on the canvas captures the pointer until release, so a
/// drag can leave the canvas and still end normally.
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    captured: bool,
    hovering: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Process this frame's egui input for the canvas occupying `canvas`
    pub fn process_input(&mut self, ctx: &Context, canvas: Rect) -> Vec<CanvasEvent> {
        self.translate(PointerSnapshot::from_context(ctx), canvas)
    }

    pub fn translate(&mut self, pointer: PointerSnapshot, canvas: Rect) -> Vec<CanvasEvent> {
        let mut events = Vec::new();
        let inside = pointer.position.is_some_and(|pos| canvas.contains(pos));
        let local = |pos: Pos2| (pos - canvas.min).to_pos2();

        if let Some(pos) = pointer.position {
            if Some(pos) != self.last_pointer_pos && (inside || self.captured) {
                events.push(CanvasEvent::PointerMove { position: local(pos) });
            }
        }

        if pointer.pressed && inside && !self.captured {
            if let Some(pos) = pointer.position {
                self.captured = true;
                events.push(CanvasEvent::PointerDown {
                    position: local(pos),
                    modifiers: pointer.modifiers,
                });
            }
        }

        if pointer.released && self.captured {
            self.captured = false;
            let pos = pointer.position.or(self.last_pointer_pos).unwrap_or(canvas.min);
            events.push(CanvasEvent::PointerUp { position: local(pos) });
        }

        if self.hovering && !inside && !self.captured {
            events.push(CanvasEvent::PointerLeave);
        }

        self.hovering = inside;
        if pointer.position.is_some() {
            self.last_pointer_pos = pointer.position;
        }
        events
    }
}

/// Feed a canvas event into the editor
pub fn route_event(context: &mut EditorContext, event: &CanvasEvent) {
    match *event {
        CanvasEvent::PointerDown { position, modifiers } => {
            if let Err(err) = context.on_pointer_down(position, modifiers) {
                debug!("Ignoring pointer down: {}", err);
            }
        }
        CanvasEvent::PointerMove { position } => context.on_pointer_move(position),
        CanvasEvent::PointerUp { position } => {
            context.on_pointer_move(position);
            context.on_pointer_up();
        }
        CanvasEvent::PointerLeave => context.on_pointer_leave(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    fn canvas() -> Rect {
        Rect::from_min_size(pos2(100.0, 50.0), vec2(200.0, 100.0))
    }

    fn at(x: f32, y: f32) -> PointerSnapshot {
        PointerSnapshot {
            position: Some(pos2(x, y)),
            ..Default::default()
        }
    }

    #[test]
    fn test_positions_are_canvas_local() {
        let mut handler = InputHandler::new();
        let events = handler.translate(at(110.0, 60.0), canvas());
        assert_eq!(events, vec![CanvasEvent::PointerMove { position: pos2(10.0, 10.0) }]);
    }

    #[test]
    fn test_press_outside_canvas_is_ignored() {
        let mut handler = InputHandler::new();
        let events = handler.translate(PointerSnapshot { pressed: true, ..at(10.0, 10.0) }, canvas());
        assert!(events.is_empty());
        assert!(!handler.is_captured());
    }

    #[test]
    fn test_drag_keeps_capture_outside_canvas() {
        let mut handler = InputHandler::new();
        let down = handler.translate(PointerSnapshot { pressed: true, ..at(150.0, 100.0) }, canvas());
        assert!(matches!(down.last(), Some(CanvasEvent::PointerDown { .. })));

        let moved = handler.translate(at(400.0, 100.0), canvas());
        assert_eq!(moved, vec![CanvasEvent::PointerMove { position: pos2(300.0, 50.0) }]);

        let up = handler.translate(PointerSnapshot { released: true, ..at(400.0, 100.0) }, canvas());
        assert_eq!(up, vec![CanvasEvent::PointerUp { position: pos2(300.0, 50.0) }]);
        assert!(!handler.is_captured());
    }

    #[test]
    fn test_leave_is_reported_once() {
        let mut handler = InputHandler::new();
        handler.translate(at(150.0, 100.0), canvas());
        assert_eq!(handler.translate(at(10.0, 10.0), canvas()), vec![CanvasEvent::PointerLeave]);
        assert!(handler.translate(at(20.0, 10.0), canvas()).is_empty());
    }
}
