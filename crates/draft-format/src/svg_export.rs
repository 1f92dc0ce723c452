//! SVG rendering of the committed object map.
//!
//! Non-guide paths become one `<line>` element per sub-segment; text
//! annotations become `<foreignObject>` wrappers around their raw body (the
//! host's math typesetter takes it from there). Guide objects are omitted.

use std::fmt::Write;

use draft_engine::{DataOrigin, ViewBox};
use draft_types::{CanvasObject, ObjectMap};

/// Placeholder extent for text wrappers; the embedded content lays itself
/// out inside this box.
const TEXT_BOX_WIDTH: f64 = 200.0;
const TEXT_BOX_HEIGHT: f64 = 50.0;

/// Render `objects` to a standalone SVG document.
pub fn export_svg(objects: &ObjectMap, origin: DataOrigin, view_box: ViewBox) -> String {
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
        view_box.offset.x, view_box.offset.y, view_box.width, view_box.height
    );

    for (_, object) in objects.iter() {
        if object.is_guide() {
            continue;
        }
        match object {
            CanvasObject::Path { lines, .. } => {
                for line in lines {
                    let Some((a, b)) = objects.line_endpoints(*line) else {
                        continue;
                    };
                    let (Some(a), Some(b)) = (objects.point_of(a), objects.point_of(b)) else {
                        continue;
                    };
                    let a = origin.data_to_svg(a);
                    let b = origin.data_to_svg(b);
                    let _ = writeln!(
                        svg,
                        r#"  <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="black" stroke-width="1"/>"#,
                        a.x, a.y, b.x, b.y
                    );
                }
            }
            CanvasObject::Text { anchor, body, .. } => {
                let Some(p) = objects.point_of(*anchor) else {
                    continue;
                };
                let p = origin.data_to_svg(p);
                let _ = writeln!(
                    svg,
                    r#"  <foreignObject x="{}" y="{}" width="{}" height="{}"><div xmlns="http://www.w3.org/1999/xhtml" class="math">{}</div></foreignObject>"#,
                    p.x,
                    p.y,
                    TEXT_BOX_WIDTH,
                    TEXT_BOX_HEIGHT,
                    escape_xml(body)
                );
            }
            _ => {}
        }
    }

    svg.push_str("</svg>\n");
    svg
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use draft_types::{ObjectId, Vec2};

    fn sample_map() -> ObjectMap {
        let mut map = ObjectMap::new();
        map.insert(CanvasObject::Node {
            id: ObjectId(1),
            guide: false,
            point: Vec2::new(0.0, 0.0),
        });
        map.insert(CanvasObject::Node {
            id: ObjectId(2),
            guide: false,
            point: Vec2::new(10.0, 20.0),
        });
        map.insert(CanvasObject::Line {
            id: ObjectId(3),
            guide: false,
            point1: ObjectId(1),
            point2: ObjectId(2),
        });
        map.insert(CanvasObject::Path {
            id: ObjectId(4),
            guide: false,
            points: vec![ObjectId(1), ObjectId(2)],
            lines: vec![ObjectId(3)],
        });
        map
    }

    #[test]
    fn paths_render_one_line_per_segment() {
        let svg = export_svg(&sample_map(), DataOrigin::default(), ViewBox::new());
        assert_eq!(svg.matches("<line ").count(), 1);
        // Data y flips into SVG y.
        assert!(svg.contains(r#"x2="10" y2="-20""#), "{svg}");
    }

    #[test]
    fn guide_paths_are_omitted() {
        let mut map = sample_map();
        if let Some(CanvasObject::Path { guide, .. }) = map.get_mut(ObjectId(4)) {
            *guide = true;
        }
        let svg = export_svg(&map, DataOrigin::default(), ViewBox::new());
        assert_eq!(svg.matches("<line ").count(), 0);
    }

    #[test]
    fn text_bodies_are_escaped_inside_the_wrapper() {
        let mut map = sample_map();
        map.insert(CanvasObject::Text {
            id: ObjectId(5),
            guide: false,
            anchor: ObjectId(1),
            body: "a < b & c".to_string(),
        });
        let svg = export_svg(&map, DataOrigin::default(), ViewBox::new());
        assert!(svg.contains("<foreignObject "));
        assert!(svg.contains("a &lt; b &amp; c"));
    }
}
