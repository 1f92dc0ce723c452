pub mod action;
pub mod drawing;
pub mod event;
pub mod execute;
pub mod history;
pub mod tool;
pub mod translate;
pub mod view;

pub use action::{DataAction, ToolAction};
pub use drawing::{Drawing, ListenerToken};
pub use event::{Event, MouseButton};
pub use history::{ActionHistory, HistoryNode};
pub use tool::{PanState, Tool, ToolKind, ToolState};
pub use view::{DataOrigin, ViewBox};

use draft_types::{Constraint, ObjectMap};
use serde::{Deserialize, Serialize};

/// The durable record: committed objects and the constraints over them.
/// Mutated only by data actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataState {
    pub objects: ObjectMap,
    pub constraints: Vec<Constraint>,
}

impl DataState {
    pub fn new() -> Self {
        Self::default()
    }
}
