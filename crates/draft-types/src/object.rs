use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::ObjectId;
use crate::vec2::Vec2;

/// Serde helper for `BTreeMap<ObjectId, CanvasObject>`.
/// JSON only supports string keys, so ids round-trip through strings.
mod id_key_map {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::id::ObjectId;
    use crate::object::CanvasObject;

    pub fn serialize<S>(
        map: &BTreeMap<ObjectId, CanvasObject>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let string_map: BTreeMap<String, &CanvasObject> =
            map.iter().map(|(k, v)| (k.as_u64().to_string(), v)).collect();
        string_map.serialize(serializer)
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<BTreeMap<ObjectId, CanvasObject>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string_map: BTreeMap<String, CanvasObject> = BTreeMap::deserialize(deserializer)?;
        string_map
            .into_iter()
            .map(|(k, v)| {
                k.parse::<u64>()
                    .map(|key| (ObjectId(key), v))
                    .map_err(serde::de::Error::custom)
            })
            .collect()
    }
}

/// A geometric or annotation object on the canvas.
///
/// Every variant carries the common header `{id, guide}`. Guide objects are
/// rendered in a light stroke and excluded from export but otherwise behave
/// identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CanvasObject {
    /// A free point; its coordinates are variables of the constraint solver.
    Node {
        id: ObjectId,
        guide: bool,
        point: Vec2,
    },
    /// A point the solver treats as a constant (e.g. the origin guide).
    FixedNode {
        id: ObjectId,
        guide: bool,
        point: Vec2,
    },
    /// A straight segment between two point objects; no coordinates of its own.
    Line {
        id: ObjectId,
        guide: bool,
        point1: ObjectId,
        point2: ObjectId,
    },
    /// An ordered polyline: `lines[i]` connects `points[i]` to `points[i+1]`.
    Path {
        id: ObjectId,
        guide: bool,
        points: Vec<ObjectId>,
        lines: Vec<ObjectId>,
    },
    /// A mathematical expression anchored to a point object.
    Text {
        id: ObjectId,
        guide: bool,
        anchor: ObjectId,
        body: String,
    },
}

impl CanvasObject {
    pub fn id(&self) -> ObjectId {
        match self {
            CanvasObject::Node { id, .. }
            | CanvasObject::FixedNode { id, .. }
            | CanvasObject::Line { id, .. }
            | CanvasObject::Path { id, .. }
            | CanvasObject::Text { id, .. } => *id,
        }
    }

    pub fn is_guide(&self) -> bool {
        match self {
            CanvasObject::Node { guide, .. }
            | CanvasObject::FixedNode { guide, .. }
            | CanvasObject::Line { guide, .. }
            | CanvasObject::Path { guide, .. }
            | CanvasObject::Text { guide, .. } => *guide,
        }
    }

    pub fn set_guide(&mut self, value: bool) {
        match self {
            CanvasObject::Node { guide, .. }
            | CanvasObject::FixedNode { guide, .. }
            | CanvasObject::Line { guide, .. }
            | CanvasObject::Path { guide, .. }
            | CanvasObject::Text { guide, .. } => *guide = value,
        }
    }

    /// The coordinates of a point-like object.
    pub fn point(&self) -> Option<Vec2> {
        match self {
            CanvasObject::Node { point, .. } | CanvasObject::FixedNode { point, .. } => {
                Some(*point)
            }
            _ => None,
        }
    }

    pub fn is_point_like(&self) -> bool {
        matches!(
            self,
            CanvasObject::Node { .. } | CanvasObject::FixedNode { .. }
        )
    }

    /// Ids of the objects this object directly references.
    pub fn children(&self) -> Vec<ObjectId> {
        match self {
            CanvasObject::Node { .. } | CanvasObject::FixedNode { .. } => Vec::new(),
            CanvasObject::Line { point1, point2, .. } => vec![*point1, *point2],
            CanvasObject::Path { points, lines, .. } => {
                points.iter().chain(lines.iter()).copied().collect()
            }
            CanvasObject::Text { anchor, .. } => vec![*anchor],
        }
    }
}

/// The object graph: every live object keyed by id.
///
/// Backed by a `BTreeMap`, so iteration is in ascending id order, which is
/// creation order since ids are monotonic. Hit scans and selection walks
/// rely on this being reproducible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectMap {
    #[serde(with = "id_key_map")]
    objects: BTreeMap<ObjectId, CanvasObject>,
}

impl ObjectMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object under its own id, returning any displaced object.
    pub fn insert(&mut self, object: CanvasObject) -> Option<CanvasObject> {
        self.objects.insert(object.id(), object)
    }

    pub fn get(&self, id: ObjectId) -> Option<&CanvasObject> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut CanvasObject> {
        self.objects.get_mut(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ObjectId, &CanvasObject)> {
        self.objects.iter()
    }

    /// Merge `other` into this map, right-biased on id collision.
    pub fn merge(&mut self, other: ObjectMap) {
        self.objects.extend(other.objects);
    }

    /// Coordinates of a point-like object, free or fixed.
    pub fn point_of(&self, id: ObjectId) -> Option<Vec2> {
        self.get(id).and_then(|o| o.point())
    }

    /// Rewrite the coordinates of a free `Node`. Fixed nodes are left alone.
    pub fn set_node_point(&mut self, id: ObjectId, p: Vec2) -> bool {
        match self.get_mut(id) {
            Some(CanvasObject::Node { point, .. }) => {
                *point = p;
                true
            }
            _ => false,
        }
    }

    /// The endpoint ids of a `Line`.
    pub fn line_endpoints(&self, id: ObjectId) -> Option<(ObjectId, ObjectId)> {
        match self.get(id) {
            Some(CanvasObject::Line { point1, point2, .. }) => Some((*point1, *point2)),
            _ => None,
        }
    }

    /// Retain only `roots` and the transitive closure of their children,
    /// deleting everything else. Used to prune a tool's scratch map down to
    /// the committed objects. Idempotent.
    pub fn retain_reachable(&mut self, roots: &[ObjectId]) {
        let mut keep: Vec<ObjectId> = Vec::new();
        let mut work: Vec<ObjectId> = roots.to_vec();
        while let Some(id) = work.pop() {
            if keep.contains(&id) {
                continue;
            }
            keep.push(id);
            if let Some(obj) = self.objects.get(&id) {
                work.extend(obj.children());
            }
        }
        self.objects.retain(|id, _| keep.contains(id));
    }

    /// Check the referential invariants: every referenced id resolves, line
    /// endpoints are point-like, and path lines connect consecutive path
    /// points.
    pub fn validate(&self) -> Result<(), String> {
        for (id, obj) in &self.objects {
            for child in obj.children() {
                if !self.contains(child) {
                    return Err(format!("{id} references missing object {child}"));
                }
            }
            match obj {
                CanvasObject::Line { point1, point2, .. } => {
                    for end in [point1, point2] {
                        if !self.get(*end).is_some_and(|o| o.is_point_like()) {
                            return Err(format!("line {id} endpoint {end} is not a point"));
                        }
                    }
                }
                CanvasObject::Path { points, lines, .. } => {
                    if points.is_empty() {
                        if !lines.is_empty() {
                            return Err(format!("empty path {id} has lines"));
                        }
                    } else if lines.len() + 1 != points.len() {
                        return Err(format!(
                            "path {id} has {} points but {} lines",
                            points.len(),
                            lines.len()
                        ));
                    } else {
                        for (i, line) in lines.iter().enumerate() {
                            match self.line_endpoints(*line) {
                                Some((a, b)) if a == points[i] && b == points[i + 1] => {}
                                _ => {
                                    return Err(format!(
                                        "path {id} line {line} does not join points {} and {}",
                                        points[i],
                                        points[i + 1]
                                    ))
                                }
                            }
                        }
                    }
                }
                CanvasObject::Text { anchor, .. } => {
                    if !self.get(*anchor).is_some_and(|o| o.is_point_like()) {
                        return Err(format!("text {id} anchor {anchor} is not a point"));
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}
