//! The capability seam to a provider map SDK, and the binding that manages
//! one surface's lifecycle.
//!
//! Both providers expose the same capability set (instance creation, marker
//! replacement, one polyline, viewport fitting), so the controller depends on
//! these traits, never on a provider-specific API shape. A [`SurfaceBinding`]
//! owns at most one live instance per container lifetime; reusing an instance
//! against a newly created container is undefined behavior in most map SDKs,
//! so a binding is released and rebuilt across unmounts, never recycled.

use placecheck_core::{Coordinate, Verdict};

/// Default zoom for a freshly centered surface.
pub const DEFAULT_ZOOM: u8 = 17;

/// Zoom ceiling applied after a bounds fit, so near-identical points do not
/// over-zoom the viewport.
pub const MAX_FIT_ZOOM: u8 = 18;

/// Viewport padding for bounds fitting, in pixels.
pub const FIT_PADDING_PX: u32 = 64;

/// Visual style for a point marker. A small closed set: the three-way
/// verdict styling of the primary point, the corrected estimate, and the
/// secondary surface's verified-vs-fallback distinction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    /// Primary point, verdict `confirmed`.
    PrimaryOk,
    /// Primary point, verdict `uncertain`.
    PrimaryWarn,
    /// Primary point, verdict `likely-gone`.
    PrimaryBad,
    /// Primary point with no verdict available.
    Neutral,
    /// Secondary point backed by a genuine secondary-provider reading.
    Verified,
    /// Secondary point showing a fallback coordinate. Visually distinct from
    /// [`MarkerStyle::Verified`] so a fallback is never presented as
    /// provider-corroborated.
    Fallback,
    /// The corrected best-estimate point on the primary surface.
    Corrected,
}

impl MarkerStyle {
    /// Three-way primary-point style for a verdict; neutral when absent.
    #[must_use]
    pub fn for_verdict(verdict: Option<Verdict>) -> Self {
        match verdict {
            Some(Verdict::Confirmed) => Self::PrimaryOk,
            Some(Verdict::Uncertain) => Self::PrimaryWarn,
            Some(Verdict::LikelyGone) => Self::PrimaryBad,
            None => Self::Neutral,
        }
    }

    /// The stable tag a renderer keys its styling off.
    #[must_use]
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::PrimaryOk => "primary-ok",
            Self::PrimaryWarn => "primary-warn",
            Self::PrimaryBad => "primary-bad",
            Self::Neutral => "neutral",
            Self::Verified => "verified",
            Self::Fallback => "fallback",
            Self::Corrected => "corrected",
        }
    }
}

/// One point marker on a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub position: Coordinate,
    pub style: MarkerStyle,
}

/// Capability surface of one live map instance.
pub trait MapSurface: Send {
    /// Re-center the viewport, optionally resetting zoom.
    fn recenter(&mut self, center: Coordinate, zoom: Option<u8>);

    fn zoom(&self) -> u8;

    fn set_zoom(&mut self, zoom: u8);

    /// Replace the full marker set atomically: all previous markers are
    /// removed before any new one is added.
    fn set_markers(&mut self, markers: &[Marker]);

    /// Draw the single directional path, replacing any existing one.
    fn set_path(&mut self, from: Coordinate, to: Coordinate);

    fn clear_path(&mut self);

    /// Adjust the viewport to contain all points with padding. May change
    /// zoom arbitrarily; the binding clamps afterwards.
    fn fit_bounds(&mut self, points: &[Coordinate], padding_px: u32);
}

/// Creates map instances bound to whatever container is currently mounted.
pub trait SurfaceFactory: Send {
    fn create(&self, center: Coordinate, zoom: u8) -> Box<dyn MapSurface>;
}

/// Owns one provider surface across its container lifetime.
///
/// Every operation except [`SurfaceBinding::ensure_created`] is a no-op
/// until a surface exists; callers are expected to check readiness first.
pub struct SurfaceBinding {
    factory: Box<dyn SurfaceFactory>,
    surface: Option<Box<dyn MapSurface>>,
}

impl SurfaceBinding {
    #[must_use]
    pub fn new(factory: Box<dyn SurfaceFactory>) -> Self {
        Self {
            factory,
            surface: None,
        }
    }

    /// Create the underlying map instance at most once per container
    /// lifetime; subsequent calls re-center and re-zoom the existing
    /// instance instead of recreating it.
    pub fn ensure_created(&mut self, center: Coordinate, zoom: u8) {
        match self.surface.as_mut() {
            Some(surface) => surface.recenter(center, Some(zoom)),
            None => self.surface = Some(self.factory.create(center, zoom)),
        }
    }

    /// Replace any existing markers with exactly one. Idempotent.
    pub fn set_single_point(&mut self, position: Coordinate, style: MarkerStyle) {
        if let Some(surface) = self.surface.as_mut() {
            surface.set_markers(&[Marker { position, style }]);
        }
    }

    /// Replace the full marker set atomically.
    pub fn set_marker_set(&mut self, markers: &[Marker]) {
        if let Some(surface) = self.surface.as_mut() {
            surface.set_markers(markers);
        }
    }

    /// Draw the one directional path between two points.
    pub fn set_connecting_path(&mut self, from: Coordinate, to: Coordinate) {
        if let Some(surface) = self.surface.as_mut() {
            surface.set_path(from, to);
        }
    }

    pub fn clear_connecting_path(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.clear_path();
        }
    }

    /// Fit the viewport to contain all points, then clamp zoom to
    /// [`MAX_FIT_ZOOM`]. The clamp is applied once after the fit settles,
    /// not continuously.
    pub fn fit_to_points(&mut self, points: &[Coordinate], padding_px: u32) {
        if let Some(surface) = self.surface.as_mut() {
            surface.fit_bounds(points, padding_px);
            if surface.zoom() > MAX_FIT_ZOOM {
                surface.set_zoom(MAX_FIT_ZOOM);
            }
        }
    }

    /// Discard the in-memory instance so the next mount builds a fresh one.
    pub fn release(&mut self) {
        self.surface = None;
    }

    #[must_use]
    pub fn is_created(&self) -> bool {
        self.surface.is_some()
    }
}
