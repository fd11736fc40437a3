//! External navigation deep link for a verified place.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::place::Place;

const DIRECTIONS_BASE: &str = "https://www.google.com/maps/dir/?api=1";

/// Build an external directions URL for a place.
///
/// The destination is always the **corrected** coordinate, never the raw
/// primary reading.
#[must_use]
pub fn directions_url(place: &Place) -> String {
    let place_id = utf8_percent_encode(&place.id, NON_ALPHANUMERIC);
    format!(
        "{DIRECTIONS_BASE}&destination={:.7}%2C{:.7}&destination_place_id={place_id}",
        place.corrected.lat, place.corrected.lng,
    )
}
