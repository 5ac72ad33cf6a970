use std::collections::BTreeSet;

use crate::element::RedactionObject;
use crate::image_model::ImageRef;

/// The editable state: source image, redaction objects in back-to-front order,
/// the current selection and the shape being drawn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub image: Option<ImageRef>,
    /// Index order is z-order, the last object is drawn on top
    pub objects: Vec<RedactionObject>,
    pub selected_ids: BTreeSet<String>,
    /// Exists only while a shape is being drawn; never part of `objects`
    pub pending_draft: Option<RedactionObject>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh document for a newly imported image
    pub fn with_image(image: ImageRef) -> Self {
        Self {
            image: Some(image),
            ..Self::default()
        }
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn object(&self, id: &str) -> Option<&RedactionObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.object(id).is_some()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_ids.contains(id)
    }

    /// Selected objects in z-order
    pub fn selected_objects(&self) -> Vec<&RedactionObject> {
        self.objects
            .iter()
            .filter(|object| self.selected_ids.contains(&object.id))
            .collect()
    }

    /// Drop selection ids that no longer name an object
    pub fn retain_valid_selection(&mut self) {
        let objects = &self.objects;
        self.selected_ids
            .retain(|id| objects.iter().any(|object| &object.id == id));
    }
}
