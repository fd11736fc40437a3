//! A console-backed map surface.
//!
//! Stands in for a provider SDK in a terminal: every surface operation the
//! controller issues is printed as one line, which makes the render plan for
//! a session directly inspectable. Zoom is modelled faithfully enough for
//! the fit-then-clamp flow to behave as it would against a real SDK.

use placecheck_core::Coordinate;
use placecheck_reconcile::{MapSurface, Marker, ProviderSide, SurfaceFactory, MAX_FIT_ZOOM};

pub(crate) struct ConsoleSurface {
    side: ProviderSide,
    zoom: u8,
}

impl ConsoleSurface {
    fn line(&self, message: &str) {
        println!("  [{}] {message}", self.side);
    }
}

impl MapSurface for ConsoleSurface {
    fn recenter(&mut self, center: Coordinate, zoom: Option<u8>) {
        if let Some(z) = zoom {
            self.zoom = z;
        }
        self.line(&format!("center {center} zoom {}", self.zoom));
    }

    fn zoom(&self) -> u8 {
        self.zoom
    }

    fn set_zoom(&mut self, zoom: u8) {
        self.zoom = zoom;
        self.line(&format!("zoom {zoom}"));
    }

    fn set_markers(&mut self, markers: &[Marker]) {
        for marker in markers {
            self.line(&format!(
                "marker {} @ {}",
                marker.style.as_tag(),
                marker.position
            ));
        }
    }

    fn set_path(&mut self, from: Coordinate, to: Coordinate) {
        self.line(&format!("path {from} -> {to}"));
    }

    fn clear_path(&mut self) {
        self.line("path cleared");
    }

    fn fit_bounds(&mut self, points: &[Coordinate], padding_px: u32) {
        // A real SDK can over-zoom when the points nearly coincide; model
        // that so the binding's clamp is exercised end to end.
        self.zoom = MAX_FIT_ZOOM + 3;
        self.line(&format!(
            "fit {} points, padding {padding_px}px",
            points.len()
        ));
    }
}

pub(crate) struct ConsoleFactory {
    side: ProviderSide,
}

impl ConsoleFactory {
    pub(crate) fn new(side: ProviderSide) -> Self {
        Self { side }
    }
}

impl SurfaceFactory for ConsoleFactory {
    fn create(&self, center: Coordinate, zoom: u8) -> Box<dyn MapSurface> {
        println!("  [{}] map created @ {center} zoom {zoom}", self.side);
        Box::new(ConsoleSurface {
            side: self.side,
            zoom,
        })
    }
}
