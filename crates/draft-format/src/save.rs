use serde::Serialize;

use draft_engine::{ActionHistory, HistoryNode};

/// Format identifier carried by every saved file.
pub const FORMAT_NAME: &str = "drafting-table";
/// Current file format version.
pub const FORMAT_VERSION: u32 = 1;

/// The top-level file structure: the action-history tree is the document.
#[derive(Debug, Clone, Serialize)]
pub struct DraftFile<'a> {
    pub format: &'a str,
    pub version: u32,
    pub history: Option<&'a HistoryNode>,
}

/// Serialize a drawing's action history to a pretty-printed JSON string.
pub fn save_drawing(history: &ActionHistory) -> String {
    let file = DraftFile {
        format: FORMAT_NAME,
        version: FORMAT_VERSION,
        history: history.root(),
    };
    serde_json::to_string_pretty(&file).expect("history serialization should never fail")
}
