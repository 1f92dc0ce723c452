use serde::{Deserialize, Serialize};

use crate::id::ObjectId;

/// A geometric constraint between canvas objects.
///
/// Constraints are stored in insertion order; the order carries no meaning
/// but is preserved for reproducibility of the solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Constraint {
    /// The two lines meet at a right angle.
    Perpendicular { line1: ObjectId, line2: ObjectId },
    /// The two lines share a direction. The solver currently emits no
    /// equation for this kind; it is stored and round-trips only.
    Parallel { line1: ObjectId, line2: ObjectId },
    /// Two points share a location, or a point lies on a line.
    Coincident { object1: ObjectId, object2: ObjectId },
    /// The line's endpoints share a y coordinate.
    Horizontal { line: ObjectId },
    /// The line's endpoints share an x coordinate.
    Vertical { line: ObjectId },
    /// Fixed distance `d` between two points, or between the endpoints of a
    /// single line when `object2` is absent.
    Distance {
        object1: ObjectId,
        object2: Option<ObjectId>,
        d: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraints_round_trip_through_json() {
        let all = vec![
            Constraint::Perpendicular {
                line1: ObjectId(1),
                line2: ObjectId(2),
            },
            Constraint::Parallel {
                line1: ObjectId(1),
                line2: ObjectId(2),
            },
            Constraint::Coincident {
                object1: ObjectId(3),
                object2: ObjectId(4),
            },
            Constraint::Horizontal { line: ObjectId(1) },
            Constraint::Vertical { line: ObjectId(2) },
            Constraint::Distance {
                object1: ObjectId(3),
                object2: None,
                d: 10.0,
            },
        ];
        let json = serde_json::to_string(&all).unwrap();
        let back: Vec<Constraint> = serde_json::from_str(&json).unwrap();
        assert_eq!(all, back);
    }
}
