mod commands;
mod history;

pub use commands::{CommandType, HistoryCommand};
pub use history::{CommandHistory, DEFAULT_HISTORY_LIMIT};
