use serde::{Deserialize, Serialize};

use draft_types::{Constraint, ObjectId, ObjectMap, Vec2};

use crate::tool::ToolKind;

/// Mutation of the durable data state. These are what the history tree
/// records and what persistence replays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DataAction {
    /// Merge a batch of committed objects into the object map.
    AddObject { objects: ObjectMap },
    /// Append a constraint and re-solve the whole system.
    AddConstraint { constraint: Constraint },
}

/// Mutation of the transient tool state. Produced by the translator with
/// all coordinates already in their target frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolAction {
    /// Track the pointer (viewport coordinates). First action of every move.
    UpdateMousePoint { p: Vec2 },
    /// Switch the active tool, seeding fresh scratch state. Same-tool
    /// switches are no-ops.
    SwitchTool { tool: ToolKind },

    // -- Pen --
    /// Move the rubber-band tail of the live sub-path (data coordinates).
    PenRubberBand { p: Vec2 },
    /// Pin the rubber-band point and extend the live sub-path with a fresh
    /// node at `p` (data coordinates).
    PenAddNode { p: Vec2 },

    // -- Text --
    /// Move the scratch anchor to `p`; replace the body when given.
    UpdateNextText { p: Vec2, body: Option<String> },

    // -- Selection --
    SelectObject { id: ObjectId },
    DeselectObject { id: ObjectId },
    ClearSelection,

    // -- Pan & view --
    BeginPan { start: Vec2 },
    EndPan,
    SetViewBoxOffset { offset: Vec2 },
    SetViewBoxSize { width: f64, height: f64 },
    SetScale { scale: f64 },

    /// Record an executed data action in the history tree.
    AddHistory { action: DataAction },
}
