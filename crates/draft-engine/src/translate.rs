//! The event -> action translator.
//!
//! A pure function from the current states and one incoming event to the
//! lists of tool and data actions to execute. All coordinate conversion
//! happens here, so the executors only ever apply values.

use tracing::warn;

use draft_types::{hit_node, hit_segment, CanvasObject, Constraint, ObjectId, ObjectMap, Vec2};

use crate::action::{DataAction, ToolAction};
use crate::event::{Event, MouseButton};
use crate::tool::{PanState, Tool, ToolKind, ToolState};
use crate::DataState;

/// Pick radius around point objects, in data units.
const NODE_HIT_RADIUS: f64 = 15.0;
/// Pick tolerance around line segments, in data units.
const SEGMENT_HIT_TOL: f64 = 10.0;

/// Translate `event` into actions. Emits `UpdateMousePoint` first on every
/// mouse move; appends one trailing `AddHistory` per data action so every
/// durable mutation is recorded.
pub fn generate_actions(
    tool_state: &ToolState,
    data_state: &DataState,
    event: &Event,
) -> (Vec<ToolAction>, Vec<DataAction>) {
    let mut tool_actions = Vec::new();
    let mut data_actions = Vec::new();

    match event {
        Event::MouseMove { p } => {
            tool_actions.push(ToolAction::UpdateMousePoint { p: *p });
            match &tool_state.tool {
                Tool::Pen { .. } => tool_actions.push(ToolAction::PenRubberBand {
                    p: tool_state.viewport_to_data(*p),
                }),
                Tool::Text { .. } => tool_actions.push(ToolAction::UpdateNextText {
                    p: tool_state.viewport_to_data(*p),
                    body: None,
                }),
                Tool::Selector { .. } => {}
            }
            if let PanState::Panning { start } = tool_state.pan {
                tool_actions.push(ToolAction::SetViewBoxOffset { offset: start - *p });
            }
        }

        Event::MouseDown {
            button: MouseButton::Primary,
            ctrl,
            p,
        } => match &tool_state.tool {
            Tool::Selector { .. } => {
                let q = tool_state.viewport_to_data(*p);
                let hit = first_hit(&data_state.objects, q);
                match (hit, ctrl) {
                    (Some(id), true) => tool_actions.push(ToolAction::DeselectObject { id }),
                    (Some(id), false) => tool_actions.push(ToolAction::SelectObject { id }),
                    (None, true) => {}
                    (None, false) => tool_actions.push(ToolAction::ClearSelection),
                }
            }
            Tool::Pen { .. } => tool_actions.push(ToolAction::PenAddNode {
                p: tool_state.viewport_to_data(*p),
            }),
            Tool::Text { temp, .. } => {
                data_actions.push(DataAction::AddObject {
                    objects: temp.clone(),
                });
                tool_actions.push(ToolAction::SwitchTool {
                    tool: ToolKind::Selector,
                });
            }
        },

        Event::MouseDown {
            button: MouseButton::Secondary,
            p,
            ..
        } => {
            if matches!(tool_state.pan, PanState::Idle) {
                tool_actions.push(ToolAction::BeginPan {
                    start: tool_state.view_box.viewport_to_svg(*p),
                });
            }
        }

        Event::MouseUp {
            button: MouseButton::Secondary,
            ..
        } => {
            if matches!(tool_state.pan, PanState::Panning { .. }) {
                tool_actions.push(ToolAction::EndPan);
            }
        }

        Event::MouseDown { .. } | Event::MouseUp { .. } => {}

        Event::KeyDown { key } => match key.as_str() {
            "p" => tool_actions.push(ToolAction::SwitchTool {
                tool: ToolKind::Pen,
            }),
            "s" => tool_actions.push(ToolAction::SwitchTool {
                tool: ToolKind::Selector,
            }),
            "Enter" => {
                if let Tool::Pen {
                    temp, root_path, ..
                } = &tool_state.tool
                {
                    // Drop the rubber-band tail: only the committing path
                    // and its members survive.
                    let mut pruned = temp.clone();
                    pruned.retain_reachable(&[*root_path]);
                    data_actions.push(DataAction::AddObject { objects: pruned });
                    tool_actions.push(ToolAction::SwitchTool {
                        tool: ToolKind::Selector,
                    });
                }
            }
            _ => {}
        },

        Event::KeyUp { .. } => {}

        Event::ResizeView { width, height } => {
            tool_actions.push(ToolAction::SetViewBoxSize {
                width: width / tool_state.scale,
                height: height / tool_state.scale,
            });
        }
        Event::ScaleView { scale } => {
            tool_actions.push(ToolAction::SetScale { scale: *scale });
        }
        Event::SetViewOffset { offset } => {
            tool_actions.push(ToolAction::SetViewBoxOffset { offset: *offset });
        }

        Event::AddPerpendicularConstraint => {
            if let Some([line1, line2]) = selected_pair(tool_state, "perpendicular") {
                data_actions.push(DataAction::AddConstraint {
                    constraint: Constraint::Perpendicular { line1, line2 },
                });
            }
        }
        Event::AddCoincidentConstraint => {
            if let Some([object1, object2]) = selected_pair(tool_state, "coincident") {
                data_actions.push(DataAction::AddConstraint {
                    constraint: Constraint::Coincident { object1, object2 },
                });
            }
        }
        Event::AddHorizontalConstraint => {
            if let Some(line) = selected_single(tool_state, "horizontal") {
                data_actions.push(DataAction::AddConstraint {
                    constraint: Constraint::Horizontal { line },
                });
            }
        }
        Event::AddVerticalConstraint => {
            if let Some(line) = selected_single(tool_state, "vertical") {
                data_actions.push(DataAction::AddConstraint {
                    constraint: Constraint::Vertical { line },
                });
            }
        }
        Event::AddDistanceConstraint { d } => {
            let selected = selected_ids(tool_state);
            match selected.as_slice() {
                [object1] => data_actions.push(DataAction::AddConstraint {
                    constraint: Constraint::Distance {
                        object1: *object1,
                        object2: None,
                        d: *d,
                    },
                }),
                [object1, object2] => data_actions.push(DataAction::AddConstraint {
                    constraint: Constraint::Distance {
                        object1: *object1,
                        object2: Some(*object2),
                        d: *d,
                    },
                }),
                other => warn!(
                    selected = other.len(),
                    "distance constraint needs 1 or 2 selected objects"
                ),
            }
        }

        Event::SelectTextTool => tool_actions.push(ToolAction::SwitchTool {
            tool: ToolKind::Text,
        }),
        Event::SetTextValue { text } => {
            if matches!(tool_state.tool, Tool::Text { .. }) {
                tool_actions.push(ToolAction::UpdateNextText {
                    p: tool_state.mouse_data_point(),
                    body: Some(text.clone()),
                });
            }
        }

        Event::AddObject { guide, object } => {
            let mut object = object.clone();
            object.set_guide(*guide);
            let mut objects = ObjectMap::new();
            objects.insert(object);
            data_actions.push(DataAction::AddObject { objects });
        }
    }

    for action in &data_actions {
        tool_actions.push(ToolAction::AddHistory {
            action: action.clone(),
        });
    }
    (tool_actions, data_actions)
}

/// Scan the object map in iteration order; the first object under the probe
/// wins. Only point-likes and lines are hit-testable.
fn first_hit(objects: &ObjectMap, q: Vec2) -> Option<ObjectId> {
    for (id, object) in objects.iter() {
        match object {
            CanvasObject::Node { point, .. } | CanvasObject::FixedNode { point, .. } => {
                if hit_node(*point, NODE_HIT_RADIUS, q) {
                    return Some(*id);
                }
            }
            CanvasObject::Line { point1, point2, .. } => {
                if let (Some(a), Some(b)) = (objects.point_of(*point1), objects.point_of(*point2)) {
                    if hit_segment(a, b, SEGMENT_HIT_TOL, q) {
                        return Some(*id);
                    }
                }
            }
            _ => {}
        }
    }
    None
}

/// The current selection in its iteration order; empty outside the selector.
fn selected_ids(tool_state: &ToolState) -> Vec<ObjectId> {
    match &tool_state.tool {
        Tool::Selector { selected } => selected.iter().copied().collect(),
        _ => Vec::new(),
    }
}

fn selected_pair(tool_state: &ToolState, kind: &str) -> Option<[ObjectId; 2]> {
    let selected = selected_ids(tool_state);
    if let [a, b] = selected.as_slice() {
        Some([*a, *b])
    } else {
        warn!(
            constraint = kind,
            selected = selected.len(),
            "constraint needs exactly 2 selected objects"
        );
        None
    }
}

fn selected_single(tool_state: &ToolState, kind: &str) -> Option<ObjectId> {
    let selected = selected_ids(tool_state);
    if let [only] = selected.as_slice() {
        Some(*only)
    } else {
        warn!(
            constraint = kind,
            selected = selected.len(),
            "constraint needs exactly 1 selected object"
        );
        None
    }
}
