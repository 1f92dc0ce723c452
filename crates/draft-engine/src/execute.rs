//! The two action executors.
//!
//! Both return a "changed" flag; the facade ORs these to decide whether to
//! notify listeners. Malformed data actions are skipped without mutating
//! anything.

use tracing::debug;

use draft_types::{CanvasObject, Constraint, ObjectId, ObjectMap, Vec2};

use crate::action::{DataAction, ToolAction};
use crate::tool::{PanState, Tool, ToolKind, ToolState};
use crate::DataState;

/// Apply one tool action to the transient state.
pub fn execute_tool_action(state: &mut ToolState, action: &ToolAction) -> bool {
    match action {
        ToolAction::UpdateMousePoint { p } => {
            if state.mouse_point == *p {
                return false;
            }
            state.mouse_point = *p;
            true
        }

        ToolAction::SwitchTool { tool } => {
            if state.tool.kind() == *tool {
                return false;
            }
            let mouse = state.mouse_data_point();
            state.tool = match tool {
                ToolKind::Selector => Tool::selector(),
                ToolKind::Pen => Tool::pen_at(mouse),
                ToolKind::Text => Tool::text_at(mouse),
            };
            true
        }

        ToolAction::PenRubberBand { p } => {
            let Tool::Pen {
                temp,
                live_sub_path,
                ..
            } = &mut state.tool
            else {
                return false;
            };
            let last = match temp.get(*live_sub_path) {
                Some(CanvasObject::Path { points, .. }) => points.last().copied(),
                _ => None,
            };
            match last {
                Some(id) if temp.point_of(id) != Some(*p) => temp.set_node_point(id, *p),
                _ => false,
            }
        }

        ToolAction::PenAddNode { p } => {
            let Tool::Pen {
                temp,
                root_path,
                live_sub_path,
            } = &mut state.tool
            else {
                return false;
            };
            pen_add_node(temp, *root_path, *live_sub_path, *p)
        }

        ToolAction::UpdateNextText { p, body } => {
            let Tool::Text { temp, live_text } = &mut state.tool else {
                return false;
            };
            let Some(CanvasObject::Text {
                anchor,
                body: current,
                ..
            }) = temp.get_mut(*live_text)
            else {
                return false;
            };
            let anchor = *anchor;
            let mut changed = false;
            if let Some(text) = body {
                if *current != *text {
                    *current = text.clone();
                    changed = true;
                }
            }
            if temp.point_of(anchor) != Some(*p) {
                changed |= temp.set_node_point(anchor, *p);
            }
            changed
        }

        ToolAction::SelectObject { id } => match &mut state.tool {
            Tool::Selector { selected } => selected.insert(*id),
            _ => false,
        },
        ToolAction::DeselectObject { id } => match &mut state.tool {
            Tool::Selector { selected } => selected.remove(id),
            _ => false,
        },
        ToolAction::ClearSelection => match &mut state.tool {
            Tool::Selector { selected } if !selected.is_empty() => {
                selected.clear();
                true
            }
            _ => false,
        },

        ToolAction::BeginPan { start } => match state.pan {
            PanState::Idle => {
                state.pan = PanState::Panning { start: *start };
                true
            }
            PanState::Panning { .. } => false,
        },
        ToolAction::EndPan => match state.pan {
            PanState::Panning { .. } => {
                state.pan = PanState::Idle;
                true
            }
            PanState::Idle => false,
        },

        ToolAction::SetViewBoxOffset { offset } => {
            if state.view_box.offset == *offset {
                return false;
            }
            state.view_box.offset = *offset;
            true
        }
        ToolAction::SetViewBoxSize { width, height } => {
            if state.view_box.width == *width && state.view_box.height == *height {
                return false;
            }
            state.view_box.width = *width;
            state.view_box.height = *height;
            true
        }
        ToolAction::SetScale { scale } => {
            if state.scale == *scale || *scale <= 0.0 {
                return false;
            }
            let ratio = state.scale / scale;
            state.view_box.width *= ratio;
            state.view_box.height *= ratio;
            state.scale = *scale;
            true
        }

        ToolAction::AddHistory { action } => {
            state.history.append(action.clone());
            true
        }
    }
}

/// Pin the live sub-path's tail into the committing path, then grow the tail
/// with a fresh node at `p` and a line back to the pinned point.
fn pen_add_node(
    temp: &mut ObjectMap,
    root_path: ObjectId,
    live_sub_path: ObjectId,
    p: Vec2,
) -> bool {
    let (last_point, last_line) = match temp.get(live_sub_path) {
        Some(CanvasObject::Path { points, lines, .. }) => {
            (points.last().copied(), lines.last().copied())
        }
        _ => (None, None),
    };
    let Some(last_point) = last_point else {
        return false;
    };

    if let Some(CanvasObject::Path { points, lines, .. }) = temp.get_mut(root_path) {
        points.push(last_point);
        if let Some(line) = last_line {
            lines.push(line);
        }
    }

    let node = ObjectId::next();
    temp.insert(CanvasObject::Node {
        id: node,
        guide: false,
        point: p,
    });
    let line = ObjectId::next();
    temp.insert(CanvasObject::Line {
        id: line,
        guide: false,
        point1: last_point,
        point2: node,
    });
    if let Some(CanvasObject::Path { points, lines, .. }) = temp.get_mut(live_sub_path) {
        points.push(node);
        lines.push(line);
    }
    true
}

/// Apply one data action to the durable state. Adding a constraint re-solves
/// the whole system in place.
pub fn execute_data_action(state: &mut DataState, action: &DataAction) -> bool {
    match action {
        DataAction::AddObject { objects } => {
            if objects.is_empty() {
                return false;
            }
            let mut merged = state.objects.clone();
            merged.merge(objects.clone());
            if let Err(problem) = merged.validate() {
                debug!(%problem, "skipping AddObject with dangling references");
                return false;
            }
            state.objects = merged;
            true
        }

        DataAction::AddConstraint { constraint } => {
            if !constraint_is_well_formed(&state.objects, constraint) {
                debug!(?constraint, "skipping constraint with bad referents");
                return false;
            }
            state.constraints.push(constraint.clone());
            draft_solver::solve(&mut state.objects, &state.constraints);
            true
        }
    }
}

/// Operand shape check: referents must exist and have the kind the
/// constraint expects.
fn constraint_is_well_formed(objects: &ObjectMap, constraint: &Constraint) -> bool {
    let is_line = |id: ObjectId| matches!(objects.get(id), Some(CanvasObject::Line { .. }));
    let is_point = |id: ObjectId| objects.get(id).is_some_and(|o| o.is_point_like());

    match constraint {
        Constraint::Perpendicular { line1, line2 } | Constraint::Parallel { line1, line2 } => {
            is_line(*line1) && is_line(*line2)
        }
        Constraint::Coincident { object1, object2 } => {
            (is_point(*object1) && is_point(*object2))
                || (is_point(*object1) && is_line(*object2))
                || (is_line(*object1) && is_point(*object2))
        }
        Constraint::Horizontal { line } | Constraint::Vertical { line } => is_line(*line),
        Constraint::Distance {
            object1, object2, ..
        } => match object2 {
            Some(second) => is_point(*object1) && is_point(*second),
            None => is_line(*object1),
        },
    }
}
