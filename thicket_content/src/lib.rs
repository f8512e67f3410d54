// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=thicket_content --heading-base-level=0

//! Thicket Content: leaf content descriptors and their local envelopes.
//!
//! This crate defines the renderable content a scene node can carry, as a
//! small, plain‑old‑data (POD) friendly closed sum type, together with the
//! per-kind computation of an *envelope*: the untransformed axis-aligned
//! bounding box of the content in the node's own coordinate space.
//!
//! It sits below the scene tree (`thicket_scene`), which composes envelopes
//! across the hierarchy, and above concrete renderers, which consume the
//! same descriptors to produce pixels. Nothing here performs rasterization,
//! resource loading, or text shaping; content state is assumed to be already
//! resolved by upstream collaborators, and unresolved state (an unbound
//! texture frame, unmeasured text) simply contributes no envelope yet.
//!
//! # Content kinds
//!
//! - [`Content::Container`]: grouping node with no geometry of its own.
//! - [`Content::Quad`]: a textured quad ([`Quad`]) sized by its bound
//!   texture [`Frame`], or by an explicit mesh vertex override.
//! - [`Content::Shapes`]: retained vector shapes ([`ShapeSet`]), an ordered
//!   list of filled and stroked paths, each carrying its paint.
//! - [`Content::Text`]: a text block ([`TextBlock`]) whose extent comes from
//!   externally resolved layout metrics ([`TextMetrics`]).
//! - [`Content::Raster`]: a pre-rendered snapshot ([`Raster`]) whose extents
//!   were captured at rasterization time and stay frozen.
//!
//! # Envelope semantics
//!
//! [`Content::envelope`] returns `Option<kurbo::Rect>`; `None` means the
//! content contributes nothing to a bounds union. Degenerate state maps to
//! `None` rather than a `{0,0,0,0}` box so that aggregation treats it as a
//! true identity element: an unbound or zero-size frame, an empty shape
//! list, and unmeasured text are all empty, never origin-pinned points.
//! Non-finite geometry is dropped from unions so NaN/∞ can never leak into
//! an ancestor aggregate.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::{BezPath, Point, Rect, Shape, Stroke};
use peniko::{Brush, Fill};
use smallvec::SmallVec;

/// Flattening tolerance used when converting shapes into retained paths.
const PATH_TOLERANCE: f64 = 0.1;

/// Dimensions of the texture frame currently bound to a [`Quad`].
///
/// A frame describes the already-loaded pixel source; the quad's envelope is
/// `[0, 0] .. [width, height]`. Resource loading is an upstream concern: a
/// quad whose texture has not resolved yet simply has no frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frame {
    /// Frame width in local units.
    pub width: f64,
    /// Frame height in local units.
    pub height: f64,
}

impl Frame {
    /// Create a frame from width and height.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A textured quad: a sprite, or a mesh plane with explicit vertices.
///
/// The envelope is normally the bound [`Frame`] at the local origin. For
/// non-rectangular meshes, an explicit vertex override takes precedence and
/// the envelope is the union of the vertex positions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Quad {
    /// Currently bound texture frame, if the resource has resolved.
    pub frame: Option<Frame>,
    /// Explicit mesh geometry override. When present, the envelope is the
    /// union of these positions and `frame` only describes the pixel source.
    pub vertices: Option<Vec<Point>>,
}

impl Quad {
    /// Create a quad with no bound frame yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a quad bound to a `width` × `height` frame.
    pub fn with_frame(width: f64, height: f64) -> Self {
        Self {
            frame: Some(Frame::new(width, height)),
            vertices: None,
        }
    }

    /// Bind a new texture frame.
    pub fn set_frame(&mut self, width: f64, height: f64) {
        self.frame = Some(Frame::new(width, height));
    }

    /// Unbind the texture frame (e.g. the resource was evicted).
    pub fn clear_frame(&mut self) {
        self.frame = None;
    }

    /// Replace the mesh vertex override.
    pub fn set_vertices(&mut self, vertices: Vec<Point>) {
        self.vertices = Some(vertices);
    }

    fn envelope(&self) -> Option<Rect> {
        if let Some(vertices) = &self.vertices {
            let mut points = vertices.iter().copied().filter(|p| p.is_finite());
            let first = points.next()?;
            let mut rect = Rect::from_points(first, first);
            for p in points {
                rect = rect.union_pt(p);
            }
            return Some(rect);
        }
        let frame = self.frame?;
        if !(frame.width > 0.0 && frame.height > 0.0) {
            return None;
        }
        Some(Rect::new(0.0, 0.0, frame.width, frame.height))
    }
}

/// How a [`DrawnShape`] is rendered, which also determines its envelope.
#[derive(Clone, Debug)]
pub enum ShapeStyle {
    /// Fill the path interior with the given fill rule.
    Fill(Fill),
    /// Stroke the path outline. The envelope inflates the path's bounding
    /// box by half the stroke width on each side.
    Stroke(Stroke),
}

/// One retained shape: a path, its paint, and how it is drawn.
#[derive(Clone, Debug)]
pub struct DrawnShape {
    /// Path geometry in local coordinates.
    pub path: BezPath,
    /// Paint used when rendering. Does not affect the envelope.
    pub brush: Brush,
    /// Fill or stroke style.
    pub style: ShapeStyle,
}

impl DrawnShape {
    fn envelope(&self) -> Option<Rect> {
        let bbox = self.path.bounding_box();
        if !bbox.is_finite() {
            return None;
        }
        match &self.style {
            ShapeStyle::Fill(_) => Some(bbox),
            ShapeStyle::Stroke(stroke) => {
                let hw = stroke.width * 0.5;
                Some(bbox.inflate(hw, hw))
            }
        }
    }
}

/// Retained vector shapes: an ordered list of filled and stroked paths.
///
/// Shapes accumulate in draw order. [`ShapeSet::clear`] empties the list;
/// shapes drawn afterwards define the envelope on their own, never unioned
/// with pre-clear state.
#[derive(Clone, Debug, Default)]
pub struct ShapeSet {
    shapes: SmallVec<[DrawnShape; 2]>,
}

impl ShapeSet {
    /// Create an empty shape set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filled shape using the non-zero fill rule.
    pub fn fill(&mut self, shape: impl Shape, brush: Brush) {
        self.fill_with_rule(shape, Fill::NonZero, brush);
    }

    /// Append a filled shape with an explicit fill rule.
    pub fn fill_with_rule(&mut self, shape: impl Shape, rule: Fill, brush: Brush) {
        self.shapes.push(DrawnShape {
            path: shape.to_path(PATH_TOLERANCE),
            brush,
            style: ShapeStyle::Fill(rule),
        });
    }

    /// Append a stroked shape.
    pub fn stroke(&mut self, shape: impl Shape, stroke: Stroke, brush: Brush) {
        self.shapes.push(DrawnShape {
            path: shape.to_path(PATH_TOLERANCE),
            brush,
            style: ShapeStyle::Stroke(stroke),
        });
    }

    /// Remove every shape. The envelope becomes empty until new shapes are
    /// drawn.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Returns true if no shapes are retained.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Number of retained shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Iterate the retained shapes in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &DrawnShape> {
        self.shapes.iter()
    }

    fn envelope(&self) -> Option<Rect> {
        let mut acc: Option<Rect> = None;
        for shape in &self.shapes {
            let Some(e) = shape.envelope() else {
                continue;
            };
            acc = Some(match acc {
                Some(r) => r.union(e),
                None => e,
            });
        }
        acc
    }
}

/// Resolved text layout extents, produced by an external layout engine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TextMetrics {
    /// Measured width of the laid-out text.
    pub width: f64,
    /// Measured height of the laid-out text.
    pub height: f64,
}

impl TextMetrics {
    /// Create metrics from measured width and height.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A text block with externally resolved metrics.
///
/// This crate performs no shaping or font resolution; an upstream text
/// engine measures the block and installs [`TextMetrics`]. Until then the
/// block has no envelope.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextBlock {
    /// Text content. Changing it resets the metrics (they describe the old
    /// layout).
    text: String,
    /// Resolved layout metrics, if measurement has happened.
    pub metrics: Option<TextMetrics>,
}

impl TextBlock {
    /// Create an unmeasured text block.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metrics: None,
        }
    }

    /// Current text content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text, discarding metrics from the previous layout.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.metrics = None;
    }

    /// Install metrics resolved by the external layout engine.
    pub fn resolve_metrics(&mut self, metrics: TextMetrics) {
        self.metrics = Some(metrics);
    }

    fn envelope(&self) -> Option<Rect> {
        let m = self.metrics?;
        if !(m.width > 0.0 && m.height > 0.0) {
            return None;
        }
        Some(Rect::new(0.0, 0.0, m.width, m.height))
    }
}

/// A pre-rendered snapshot of a subtree with frozen extents.
///
/// The extents are captured at rasterization time and are the content's
/// envelope from then on, regardless of what happens to the state the
/// snapshot was rendered from.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Raster {
    /// Extents captured when the snapshot was taken.
    pub extents: Rect,
}

impl Raster {
    /// Create a raster snapshot with the given frozen extents.
    #[inline]
    pub const fn new(extents: Rect) -> Self {
        Self { extents }
    }
}

/// Renderable content carried by a scene node.
///
/// This is a closed set: every kind a node can carry is a variant here, and
/// envelope computation is exhaustive over it. The choice of kind fully
/// determines how the envelope is derived; how a tree aggregates envelopes
/// is the scene layer's concern.
#[derive(Clone, Debug)]
pub enum Content {
    /// Grouping node with no geometry of its own; only descendants
    /// contribute to its bounds.
    Container,
    /// Textured quad (sprite or mesh plane).
    Quad(Quad),
    /// Retained vector shapes.
    Shapes(ShapeSet),
    /// Text block with external layout metrics.
    Text(TextBlock),
    /// Pre-rendered snapshot with frozen extents.
    Raster(Raster),
}

impl Content {
    /// The untransformed local bounding box of this content, or `None` if it
    /// contributes nothing.
    ///
    /// The result is independent of how the scene layer aggregates or which
    /// query mode it runs under, and is always finite.
    pub fn envelope(&self) -> Option<Rect> {
        match self {
            Self::Container => None,
            Self::Quad(quad) => quad.envelope(),
            Self::Shapes(shapes) => shapes.envelope(),
            Self::Text(text) => text.envelope(),
            Self::Raster(raster) => Some(raster.extents),
        }
    }

    /// Borrow the quad state, if this is quad content.
    pub fn as_quad(&self) -> Option<&Quad> {
        match self {
            Self::Quad(q) => Some(q),
            _ => None,
        }
    }

    /// Mutably borrow the quad state, if this is quad content.
    pub fn as_quad_mut(&mut self) -> Option<&mut Quad> {
        match self {
            Self::Quad(q) => Some(q),
            _ => None,
        }
    }

    /// Borrow the shape set, if this is shape content.
    pub fn as_shapes(&self) -> Option<&ShapeSet> {
        match self {
            Self::Shapes(s) => Some(s),
            _ => None,
        }
    }

    /// Mutably borrow the shape set, if this is shape content.
    pub fn as_shapes_mut(&mut self) -> Option<&mut ShapeSet> {
        match self {
            Self::Shapes(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the text block, if this is text content.
    pub fn as_text(&self) -> Option<&TextBlock> {
        match self {
            Self::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Mutably borrow the text block, if this is text content.
    pub fn as_text_mut(&mut self) -> Option<&mut TextBlock> {
        match self {
            Self::Text(t) => Some(t),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use kurbo::Circle;
    use peniko::Color;

    fn red() -> Brush {
        Brush::Solid(Color::from_rgba8(255, 0, 0, 255))
    }

    #[test]
    fn container_has_no_envelope() {
        assert_eq!(Content::Container.envelope(), None);
    }

    #[test]
    fn quad_envelope_is_frame_at_origin() {
        let quad = Content::Quad(Quad::with_frame(10.0, 10.0));
        assert_eq!(quad.envelope(), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn unbound_or_zero_frame_is_empty() {
        assert_eq!(Content::Quad(Quad::new()).envelope(), None);
        assert_eq!(Content::Quad(Quad::with_frame(0.0, 10.0)).envelope(), None);
        assert_eq!(Content::Quad(Quad::with_frame(10.0, 0.0)).envelope(), None);
    }

    #[test]
    fn vertex_override_unions_positions() {
        let mut quad = Quad::with_frame(10.0, 10.0);
        quad.set_vertices(vec![
            Point::new(-5.0, 0.0),
            Point::new(25.0, 3.0),
            Point::new(4.0, 17.0),
        ]);
        assert_eq!(
            Content::Quad(quad).envelope(),
            Some(Rect::new(-5.0, 0.0, 25.0, 17.0))
        );
    }

    #[test]
    fn vertex_override_skips_non_finite_points() {
        let mut quad = Quad::new();
        quad.set_vertices(vec![
            Point::new(f64::NAN, 0.0),
            Point::new(1.0, 2.0),
            Point::new(3.0, 4.0),
        ]);
        assert_eq!(
            Content::Quad(quad).envelope(),
            Some(Rect::new(1.0, 2.0, 3.0, 4.0))
        );
    }

    #[test]
    fn filled_circle_envelope() {
        let mut shapes = ShapeSet::new();
        shapes.fill(Circle::new((0.0, 0.0), 10.0), red());
        let e = Content::Shapes(shapes).envelope().unwrap();
        assert!((e.x0 - -10.0).abs() < 1e-9);
        assert!((e.y0 - -10.0).abs() < 1e-9);
        assert!((e.x1 - 10.0).abs() < 1e-9);
        assert!((e.y1 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn stroke_inflates_by_half_width() {
        let mut shapes = ShapeSet::new();
        shapes.stroke(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Stroke::new(4.0),
            red(),
        );
        assert_eq!(
            Content::Shapes(shapes).envelope(),
            Some(Rect::new(-2.0, -2.0, 12.0, 12.0))
        );
    }

    #[test]
    fn clear_resets_envelope_instead_of_unioning() {
        let mut shapes = ShapeSet::new();
        shapes.fill(Rect::new(0.0, 0.0, 20.0, 20.0), red());
        assert_eq!(
            shapes.envelope(),
            Some(Rect::new(0.0, 0.0, 20.0, 20.0))
        );

        shapes.clear();
        assert!(shapes.is_empty());
        assert_eq!(shapes.envelope(), None);

        shapes.fill(Rect::new(0.0, 0.0, 10.0, 10.0), red());
        assert_eq!(
            shapes.envelope(),
            Some(Rect::new(0.0, 0.0, 10.0, 10.0))
        );
    }

    #[test]
    fn multiple_shapes_union() {
        let mut shapes = ShapeSet::new();
        shapes.fill(Rect::new(0.0, 0.0, 10.0, 10.0), red());
        shapes.fill(Rect::new(30.0, -5.0, 40.0, 5.0), red());
        assert_eq!(
            shapes.envelope(),
            Some(Rect::new(0.0, -5.0, 40.0, 10.0))
        );
        assert_eq!(shapes.len(), 2);
    }

    #[test]
    fn text_envelope_needs_resolved_metrics() {
        let mut text = TextBlock::new("hello");
        assert_eq!(Content::Text(text.clone()).envelope(), None);

        text.resolve_metrics(TextMetrics::new(42.0, 16.0));
        assert_eq!(
            Content::Text(text.clone()).envelope(),
            Some(Rect::new(0.0, 0.0, 42.0, 16.0))
        );

        // Editing the text discards stale metrics.
        text.set_text("goodbye");
        assert_eq!(Content::Text(text).envelope(), None);
    }

    #[test]
    fn raster_extents_are_fixed() {
        let raster = Content::Raster(Raster::new(Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert_eq!(
            raster.envelope(),
            Some(Rect::new(0.0, 0.0, 100.0, 100.0))
        );
    }
}
