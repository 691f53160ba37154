use serde::Serialize;
use statemap_core::Coordinate;

/// Axis-aligned lat/lng box used to fit the initial view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl Bounds {
    pub fn from_coordinates<'a>(coords: impl IntoIterator<Item = &'a Coordinate>) -> Option<Self> {
        let mut coords = coords.into_iter();
        let first = *coords.next()?;
        let mut bounds = Self {
            south_west: first,
            north_east: first,
        };
        for coord in coords {
            bounds.extend(coord);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, coord: &Coordinate) {
        self.south_west.lat = self.south_west.lat.min(coord.lat);
        self.south_west.lng = self.south_west.lng.min(coord.lng);
        self.north_east.lat = self.north_east.lat.max(coord.lat);
        self.north_east.lng = self.north_east.lng.max(coord.lng);
    }

    /// Finite corners in the right order.
    pub fn is_valid(&self) -> bool {
        let finite = [
            self.south_west.lat,
            self.south_west.lng,
            self.north_east.lat,
            self.north_east.lng,
        ]
        .iter()
        .all(|v| v.is_finite());
        finite
            && self.south_west.lat <= self.north_east.lat
            && self.south_west.lng <= self.north_east.lng
    }
}
