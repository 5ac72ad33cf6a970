//! Text codec for copying redaction objects between documents and sessions.
//!
//! The payload is `IMAGE_CENSOR_SHAPES_V1:` followed by `{"version":1,"objects":[...]}`.
//! The prefix lets paste handling tell our payloads apart from arbitrary text.

use egui::Vec2;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::element::{factory, RedactionObject};
use crate::geometry::move_shape;

pub const SHAPE_CLIPBOARD_PREFIX: &str = "IMAGE_CENSOR_SHAPES_V1:";
pub const SHAPE_CLIPBOARD_VERSION: u32 = 1;
pub const DEFAULT_PASTE_OFFSET: Vec2 = Vec2::new(20.0, 20.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeClipboardPayload {
    pub version: u32,
    pub objects: Vec<RedactionObject>,
}

impl ShapeClipboardPayload {
    pub fn new(objects: &[RedactionObject]) -> Self {
        Self {
            version: SHAPE_CLIPBOARD_VERSION,
            objects: objects.to_vec(),
        }
    }
}

pub fn serialize(objects: &[RedactionObject]) -> String {
    serialize_payload(&ShapeClipboardPayload::new(objects))
}

pub fn serialize_payload(payload: &ShapeClipboardPayload) -> String {
    // A payload of plain data types cannot fail to serialize
    let json = serde_json::to_string(payload).unwrap_or_default();
    format!("{SHAPE_CLIPBOARD_PREFIX}{json}")
}

/// Parses clipboard text. `None` means "not ours", and callers fall back to
/// other paste handling. The prefix must open the text.
pub fn parse(text: &str) -> Option<ShapeClipboardPayload> {
    let json = text.strip_prefix(SHAPE_CLIPBOARD_PREFIX)?;

    let value: serde_json::Value = match serde_json::from_str(json) {
        Ok(value) => value,
        Err(err) => {
            debug!("Ignoring malformed shape payload: {err}");
            return None;
        }
    };

    if value.get("version").and_then(serde_json::Value::as_u64) != Some(SHAPE_CLIPBOARD_VERSION as u64) {
        debug!("Ignoring shape payload with unsupported version");
        return None;
    }
    if !value.get("objects").is_some_and(serde_json::Value::is_array) {
        return None;
    }

    serde_json::from_value(value)
        .inspect_err(|err| debug!("Ignoring shape payload with invalid objects: {err}"))
        .ok()
}

/// Fresh copies of `objects` with new ids and timestamps, translated by `offset`.
/// Shape kind and style are preserved.
pub fn duplicate_with_offset(objects: &[RedactionObject], offset: Vec2) -> Vec<RedactionObject> {
    objects
        .iter()
        .map(|object| {
            let mut copy = factory::create_object(move_shape(&object.shape, offset), object.style.clone());
            copy.visible = object.visible;
            copy
        })
        .collect()
}
