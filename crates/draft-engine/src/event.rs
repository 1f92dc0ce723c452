use draft_types::{CanvasObject, Vec2};

/// Pointer button, as reported by the host input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Primary,
    Auxiliary,
    Secondary,
}

/// Everything the kernel consumes. The host windowing layer converts raw
/// pointer and keyboard input into these; constraint and tool events come
/// from the surrounding UI. Pointer coordinates are in viewport space.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    MouseMove {
        p: Vec2,
    },
    MouseDown {
        button: MouseButton,
        ctrl: bool,
        p: Vec2,
    },
    MouseUp {
        button: MouseButton,
        ctrl: bool,
        p: Vec2,
    },
    KeyDown {
        key: String,
    },
    KeyUp {
        key: String,
    },
    /// The drawing surface was resized to `width` x `height` device pixels.
    ResizeView {
        width: f64,
        height: f64,
    },
    ScaleView {
        scale: f64,
    },
    SetViewOffset {
        offset: Vec2,
    },

    // -- Constraint creation over the current selection --
    AddPerpendicularConstraint,
    AddCoincidentConstraint,
    AddHorizontalConstraint,
    AddVerticalConstraint,
    AddDistanceConstraint {
        d: f64,
    },

    // -- Text tool --
    SelectTextTool,
    SetTextValue {
        text: String,
    },

    /// Direct object ingress, e.g. seeding the origin guide.
    AddObject {
        guide: bool,
        object: CanvasObject,
    },
}
