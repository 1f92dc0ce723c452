use serde::Deserialize;

use draft_engine::execute::execute_data_action;
use draft_engine::{ActionHistory, DataState, Drawing, HistoryNode};
use draft_types::bump_id_counter_past;

use crate::errors::LoadError;
use crate::save::{FORMAT_NAME, FORMAT_VERSION};

/// The top-level file structure for deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct DraftFileRaw {
    pub format: String,
    pub version: u32,
    pub history: Option<HistoryNode>,
}

/// Deserialize a drawing from a JSON string.
///
/// Validates the format identifier and version, then replays the history
/// tree through the data executor, following first children only: the tree
/// is treated as a linear log, and branches beyond the first are ignored.
/// Replay applies each action exactly as live dispatch does, so an entry the
/// executor skips (a schema-violating action that was recorded but never
/// mutated anything) is skipped here too and stays in the history. The
/// returned drawing has a fresh tool state apart from the restored history.
pub fn load_drawing(json: &str) -> Result<Drawing, LoadError> {
    let raw: DraftFileRaw =
        serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;

    if raw.format != FORMAT_NAME {
        return Err(LoadError::UnknownFormat(raw.format));
    }
    if raw.version > FORMAT_VERSION {
        return Err(LoadError::FutureVersion {
            file_version: raw.version,
            supported_version: FORMAT_VERSION,
        });
    }

    let mut data_state = DataState::new();
    let mut history = ActionHistory::new();

    let mut cur = raw.history.as_ref();
    while let Some(node) = cur {
        execute_data_action(&mut data_state, &node.action);
        history.append(node.action.clone());
        cur = node.children.first();
    }

    // Fresh allocations must never collide with restored ids.
    if let Some(max) = data_state.objects.iter().map(|(id, _)| id.as_u64()).max() {
        bump_id_counter_past(max);
    }

    Ok(Drawing::restore(data_state, history))
}
