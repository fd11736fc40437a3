//! The single source of truth for the displayed place.

use placecheck_core::Place;

/// Holds the currently selected place and the user-toggled "show correction"
/// view flag. The place is only ever replaced wholesale, never patched, so
/// there is no partial-update visibility hazard; consumers read both values
/// through [`PlaceSelection::view`] as one tuple so renders are atomic with
/// respect to both.
#[derive(Debug, Default)]
pub struct PlaceSelection {
    place: Option<Place>,
    correction_revealed: bool,
}

impl PlaceSelection {
    /// Replace the held place. Always resets the correction reveal: a new
    /// search result starts from the unrevealed view.
    pub fn set(&mut self, place: Place) {
        self.place = Some(place);
        self.correction_revealed = false;
    }

    pub fn clear(&mut self) {
        self.place = None;
        self.correction_revealed = false;
    }

    /// Flip the correction reveal. No-op while nothing is selected.
    pub fn toggle_correction(&mut self) {
        if self.place.is_some() {
            self.correction_revealed = !self.correction_revealed;
        }
    }

    /// The combined view state: the place and whether the correction overlay
    /// is revealed.
    #[must_use]
    pub fn view(&self) -> Option<(&Place, bool)> {
        self.place
            .as_ref()
            .map(|place| (place, self.correction_revealed))
    }

    #[must_use]
    pub fn place(&self) -> Option<&Place> {
        self.place.as_ref()
    }

    #[must_use]
    pub fn correction_revealed(&self) -> bool {
        self.correction_revealed
    }
}
