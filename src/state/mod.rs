mod context;
mod editor_state;
mod preferences;

pub use context::{EditorContext, PasteOutcome};
pub use editor_state::EditorState;
pub use preferences::{Preferences, PREFERENCES_KEY, PREFERENCES_VERSION};
