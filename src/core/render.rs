//! Frame composition
//!
//! Builds everything one animation tick draws, already mapped to canvas
//! pixels: background grid, pivot, arms, bobs and trails. Painting the
//! result is left to the front end, so composition is testable without a
//! display surface.

use super::geometry::Point2D;
use super::snapshot::{Snapshot, BOB_COUNT};
use super::trail::TrailBuffer;
use super::viewport::Viewport;

/// Upper bound on grid lines per axis (guards against tiny grid pitches)
const MAX_GRID_LINES: usize = 1000;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: Point2D,
    pub to: Point2D,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Disc {
    pub center: Point2D,
    pub radius: f64,
}

/// One composed frame, in canvas pixels
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub grid: Vec<Segment>,
    pub pivot: Point2D,
    /// Pivot to bob 1, bob 1 to bob 2. Empty without a snapshot.
    pub arms: Vec<Segment>,
    pub bobs: Vec<Disc>,
    /// One polyline per bob; empty when the trail has fewer than 2 points
    pub trails: [Vec<Point2D>; BOB_COUNT],
}

/// Inputs of a frame, borrowed from the owning state.
pub struct Scene<'a> {
    pub viewport: &'a Viewport,
    /// World position of the pivot
    pub pivot: Point2D,
    pub snapshot: Option<&'a Snapshot>,
    pub trails: &'a [TrailBuffer; BOB_COUNT],
    pub grid_size: f64,
}

pub fn compose_frame(scene: &Scene<'_>, canvas_size: Point2D) -> Frame {
    let vp = scene.viewport;

    let mut frame = Frame {
        grid: grid_lines(vp, canvas_size, scene.grid_size),
        pivot: vp.to_canvas(scene.pivot),
        ..Frame::default()
    };

    if let Some(snapshot) = scene.snapshot {
        let bob1 = vp.to_canvas(scene.pivot + snapshot.bobs[0]);
        let bob2 = vp.to_canvas(scene.pivot + snapshot.bobs[1]);

        frame.arms = vec![
            Segment {
                from: frame.pivot,
                to: bob1,
            },
            Segment { from: bob1, to: bob2 },
        ];
        frame.bobs = vec![
            Disc {
                center: bob1,
                radius: snapshot.radii.m1 * vp.zoom(),
            },
            Disc {
                center: bob2,
                radius: snapshot.radii.m2 * vp.zoom(),
            },
        ];
    }

    for (out, trail) in frame.trails.iter_mut().zip(scene.trails.iter()) {
        if trail.len() >= 2 {
            *out = trail.points().map(|p| vp.to_canvas(p)).collect();
        }
    }

    frame
}

/// Grid lines at multiples of `grid_size` in world space, covering the
/// visible canvas. Mapped through the same transform as the geometry so the
/// two stay aligned at any zoom or pan.
fn grid_lines(vp: &Viewport, canvas_size: Point2D, grid_size: f64) -> Vec<Segment> {
    if grid_size <= 0.0 || canvas_size.x <= 0.0 || canvas_size.y <= 0.0 {
        return Vec::new();
    }

    let top_left = vp.to_world(Point2D::ZERO);
    let bottom_right = vp.to_world(canvas_size);

    let mut lines = Vec::new();

    for x in grid_positions(top_left.x, bottom_right.x, grid_size) {
        let px = vp.to_canvas(Point2D::new(x, 0.0)).x;
        lines.push(Segment {
            from: Point2D::new(px, 0.0),
            to: Point2D::new(px, canvas_size.y),
        });
    }
    for y in grid_positions(top_left.y, bottom_right.y, grid_size) {
        let py = vp.to_canvas(Point2D::new(0.0, y)).y;
        lines.push(Segment {
            from: Point2D::new(0.0, py),
            to: Point2D::new(canvas_size.x, py),
        });
    }

    lines
}

fn grid_positions(min: f64, max: f64, step: f64) -> impl Iterator<Item = f64> {
    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    let count = (last - first + 1).clamp(0, MAX_GRID_LINES as i64);
    (0..count).map(move |i| (first + i) as f64 * step)
}
