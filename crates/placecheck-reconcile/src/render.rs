//! Deterministic per-side render rules.
//!
//! Each function is a pure mapping from (place, view flag) to surface
//! operations on one binding. The session evaluates the sides independently
//! over the readiness product; neither provider ever blocks the other.

use placecheck_core::Place;

use crate::surface::{Marker, MarkerStyle, SurfaceBinding, DEFAULT_ZOOM, FIT_PADDING_PX};

/// Render the primary-provider surface: the possibly stale coordinate,
/// always styled by the verdict, plus the correction overlay when revealed.
pub fn render_primary(binding: &mut SurfaceBinding, place: &Place, correction_revealed: bool) {
    binding.ensure_created(place.primary, DEFAULT_ZOOM);

    let verdict_style = MarkerStyle::for_verdict(place.verdict);
    if correction_revealed {
        binding.set_marker_set(&[
            Marker {
                position: place.primary,
                style: verdict_style,
            },
            Marker {
                position: place.corrected,
                style: MarkerStyle::Corrected,
            },
        ]);
        binding.set_connecting_path(place.primary, place.corrected);
        binding.fit_to_points(&[place.primary, place.corrected], FIT_PADDING_PX);
    } else {
        // ensure_created above already re-centered on the primary point at
        // the default zoom, undoing any earlier bounds fit.
        binding.set_single_point(place.primary, verdict_style);
        binding.clear_connecting_path();
    }
}

/// Render the secondary-provider surface: its best available coordinate,
/// with no toggle-dependent behavior. A missing secondary reading falls back
/// to the corrected estimate, visibly styled as a fallback rather than a
/// provider-verified point.
pub fn render_secondary(binding: &mut SurfaceBinding, place: &Place) {
    let (position, from_provider) = place.secondary_display();
    binding.ensure_created(position, DEFAULT_ZOOM);

    let style = if from_provider {
        MarkerStyle::Verified
    } else {
        MarkerStyle::Fallback
    };
    binding.set_single_point(position, style);
}
