//! Pointer-driven stroke session

use glam::{DVec2, Vec3};

/// Pointer input as seen by the editor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// Button pressed; only the primary button starts drawing
    Down { primary: bool },
    /// Pointer moved; `pick` is the ground hit point in world space, if any
    Move { pick: Option<Vec3> },
    /// Button released
    Up,
}

/// Tracks one drag from pointer down to pointer up.
#[derive(Debug, Clone, Default)]
pub struct StrokeSession {
    /// Primary button is held
    drawing: bool,
    /// At least one move happened while drawing
    moved: bool,
    /// Strokes finished since creation
    strokes: u64,
}

impl StrokeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm drawing on a primary press
    pub fn press(&mut self, primary: bool) {
        if primary {
            self.drawing = true;
        }
    }

    /// Register a pointer move. Returns true if it should apply a stroke-step.
    pub fn record_move(&mut self) -> bool {
        if self.drawing {
            self.moved = true;
        }
        self.drawing
    }

    /// End the drag. Returns true if any step was recorded since the press.
    pub fn release(&mut self) -> bool {
        let finished = self.moved;
        self.drawing = false;
        self.moved = false;
        if finished {
            self.strokes += 1;
        }
        finished
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn strokes(&self) -> u64 {
        self.strokes
    }
}

/// Convert a world-space pick point on the ground mesh to canvas texels.
///
/// The mesh is centered on the origin with `+z` at canvas row 0.
pub fn pick_to_canvas(point: Vec3, map_size: f32, resolution: [u32; 2]) -> DVec2 {
    let size = map_size as f64;
    DVec2::new(
        (point.x as f64 / size + 0.5) * resolution[0] as f64,
        (-point.z as f64 / size + 0.5) * resolution[1] as f64,
    )
}
