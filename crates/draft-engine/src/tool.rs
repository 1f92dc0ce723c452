//! Transient tool state: the active tool with its scratch geometry, the
//! mouse position, the view, and the orthogonal pan sub-state.

use std::collections::BTreeSet;

use draft_types::{CanvasObject, ObjectId, ObjectMap, Vec2};

use crate::history::ActionHistory;
use crate::view::{DataOrigin, ViewBox};

/// Which tool is active, without payload. Used by tool-switch actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Selector,
    Pen,
    Text,
}

/// The active tool and its transient working set.
#[derive(Debug, Clone, PartialEq)]
pub enum Tool {
    Selector {
        selected: BTreeSet<ObjectId>,
    },
    /// An in-flight polyline. `root_path` accumulates committed points and
    /// lines; `live_sub_path` additionally holds the rubber-band tail that
    /// tracks the mouse until the next click.
    Pen {
        temp: ObjectMap,
        root_path: ObjectId,
        live_sub_path: ObjectId,
    },
    /// An in-flight annotation: a scratch anchor node following the mouse
    /// and the text body being edited.
    Text {
        temp: ObjectMap,
        live_text: ObjectId,
    },
}

impl Tool {
    pub fn kind(&self) -> ToolKind {
        match self {
            Tool::Selector { .. } => ToolKind::Selector,
            Tool::Pen { .. } => ToolKind::Pen,
            Tool::Text { .. } => ToolKind::Text,
        }
    }

    pub fn selector() -> Self {
        Tool::Selector {
            selected: BTreeSet::new(),
        }
    }

    /// Fresh Pen scratch: an empty committing path plus a one-point live
    /// sub-path seeded at `mouse` (data coordinates).
    pub fn pen_at(mouse: Vec2) -> Self {
        let mut temp = ObjectMap::new();
        let root_path = ObjectId::next();
        temp.insert(CanvasObject::Path {
            id: root_path,
            guide: false,
            points: Vec::new(),
            lines: Vec::new(),
        });

        let seed = ObjectId::next();
        temp.insert(CanvasObject::Node {
            id: seed,
            guide: false,
            point: mouse,
        });
        let live_sub_path = ObjectId::next();
        temp.insert(CanvasObject::Path {
            id: live_sub_path,
            guide: false,
            points: vec![seed],
            lines: Vec::new(),
        });

        Tool::Pen {
            temp,
            root_path,
            live_sub_path,
        }
    }

    /// Fresh Text scratch: an anchor node at `mouse` and an empty body.
    pub fn text_at(mouse: Vec2) -> Self {
        let mut temp = ObjectMap::new();
        let anchor = ObjectId::next();
        temp.insert(CanvasObject::Node {
            id: anchor,
            guide: false,
            point: mouse,
        });
        let live_text = ObjectId::next();
        temp.insert(CanvasObject::Text {
            id: live_text,
            guide: false,
            anchor,
            body: String::new(),
        });

        Tool::Text { temp, live_text }
    }
}

/// Pan is orthogonal to the active tool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanState {
    Idle,
    /// `start` is the SVG point the pointer grabbed.
    Panning { start: Vec2 },
}

/// The transient half of the kernel's state. Only `history` survives
/// persistence; everything else is reset on load.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolState {
    pub tool: Tool,
    pub history: ActionHistory,
    /// Last known pointer position, viewport coordinates.
    pub mouse_point: Vec2,
    pub view_box: ViewBox,
    pub data_origin: DataOrigin,
    pub scale: f64,
    pub pan: PanState,
}

impl ToolState {
    pub fn new() -> Self {
        Self {
            tool: Tool::selector(),
            history: ActionHistory::new(),
            mouse_point: Vec2::ZERO,
            view_box: ViewBox::new(),
            data_origin: DataOrigin::default(),
            scale: 1.0,
            pan: PanState::Idle,
        }
    }

    pub fn viewport_to_data(&self, p: Vec2) -> Vec2 {
        self.data_origin.svg_to_data(self.view_box.viewport_to_svg(p))
    }

    /// The mouse position in data coordinates.
    pub fn mouse_data_point(&self) -> Vec2 {
        self.viewport_to_data(self.mouse_point)
    }
}

impl Default for ToolState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pen_scratch_seeds_one_live_point() {
        let tool = Tool::pen_at(Vec2::new(3.0, 4.0));
        let Tool::Pen {
            temp,
            root_path,
            live_sub_path,
        } = &tool
        else {
            panic!("expected pen");
        };

        match temp.get(*root_path) {
            Some(CanvasObject::Path { points, lines, .. }) => {
                assert!(points.is_empty() && lines.is_empty());
            }
            other => panic!("bad root path: {other:?}"),
        }
        match temp.get(*live_sub_path) {
            Some(CanvasObject::Path { points, lines, .. }) => {
                assert_eq!(points.len(), 1);
                assert!(lines.is_empty());
                assert_eq!(temp.point_of(points[0]), Some(Vec2::new(3.0, 4.0)));
            }
            other => panic!("bad live sub-path: {other:?}"),
        }
    }

    #[test]
    fn text_scratch_anchors_an_empty_body() {
        let tool = Tool::text_at(Vec2::new(-1.0, 2.0));
        let Tool::Text { temp, live_text } = &tool else {
            panic!("expected text");
        };
        match temp.get(*live_text) {
            Some(CanvasObject::Text { anchor, body, .. }) => {
                assert!(body.is_empty());
                assert_eq!(temp.point_of(*anchor), Some(Vec2::new(-1.0, 2.0)));
            }
            other => panic!("bad text: {other:?}"),
        }
    }
}
