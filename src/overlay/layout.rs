//! Edge dot placement.
//!
//! Coordinates are in a y-up surface space: `(0, 0)` is the bottom-left
//! corner and the top edge sits at `y = height`. The painter flips to screen
//! space.

pub const SIDE_PADDING: f64 = 28.0;
pub const BOTTOM_PADDING: f64 = 30.0;
/// Larger than the bottom inset to clear a menu bar.
pub const TOP_PADDING: f64 = 56.0;
/// Surfaces must exceed this on both axes to get dots at all.
pub const MIN_SURFACE_EXTENT: f64 = 100.0;

const HORIZONTAL_MIN_DOTS: usize = 6;
const HORIZONTAL_DOT_SPACING: f64 = 96.0;
const VERTICAL_MIN_DOTS: usize = 5;
const VERTICAL_DOT_SPACING: f64 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

/// One dot: a fixed anchor plus the state the last tick rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotDescriptor {
    pub edge: Edge,
    pub base: Point,
    pub position: Point,
    pub opacity: f64,
}

impl DotDescriptor {
    fn anchored(edge: Edge, base: Point) -> Self {
        Self {
            edge,
            base,
            position: base,
            opacity: 0.0,
        }
    }
}

/// Dots on each of the top and bottom edges.
pub fn horizontal_dot_count(width: f64) -> usize {
    HORIZONTAL_MIN_DOTS.max((width / HORIZONTAL_DOT_SPACING).floor() as usize)
}

/// Dots on each of the left and right edges.
pub fn vertical_dot_count(height: f64) -> usize {
    VERTICAL_MIN_DOTS.max((height / VERTICAL_DOT_SPACING).floor() as usize)
}

fn evenly_spaced(index: usize, count: usize, extent: f64) -> f64 {
    (index + 1) as f64 * extent / (count + 1) as f64
}

/// Anchors for a `width` x `height` surface, ordered top, bottom, left,
/// right. Small surfaces get no dots.
pub fn layout_dots(width: f64, height: f64) -> Vec<DotDescriptor> {
    if !(width > MIN_SURFACE_EXTENT && height > MIN_SURFACE_EXTENT) {
        return Vec::new();
    }

    let across = horizontal_dot_count(width);
    let down = vertical_dot_count(height);
    let mut dots = Vec::with_capacity(across * 2 + down * 2);

    for index in 0..across {
        let x = evenly_spaced(index, across, width);
        dots.push(DotDescriptor::anchored(
            Edge::Top,
            Point::new(x, height - TOP_PADDING),
        ));
    }
    for index in 0..across {
        let x = evenly_spaced(index, across, width);
        dots.push(DotDescriptor::anchored(
            Edge::Bottom,
            Point::new(x, BOTTOM_PADDING),
        ));
    }
    for index in 0..down {
        let y = evenly_spaced(index, down, height);
        dots.push(DotDescriptor::anchored(Edge::Left, Point::new(SIDE_PADDING, y)));
    }
    for index in 0..down {
        let y = evenly_spaced(index, down, height);
        dots.push(DotDescriptor::anchored(
            Edge::Right,
            Point::new(width - SIDE_PADDING, y),
        ));
    }
    dots
}
