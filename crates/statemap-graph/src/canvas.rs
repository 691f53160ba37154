//! Rendering seams.
//!
//! The visibility controller and the app only talk to the map through these
//! traits. `RecordingCanvas` keeps an ordered call log and is what the CLI and
//! the tests drive.

use crate::bounds::Bounds;
use crate::index::ConnectionLayer;
use indexmap::IndexSet;
use serde::Serialize;
use statemap_core::{ConnectionId, Coordinate, Location, LocationIndex};
use std::time::Duration;

/// Attaching and detaching connection layers.
pub trait Renderable {
    fn attach(&mut self, id: &ConnectionId, layer: &ConnectionLayer);
    fn detach(&mut self, id: &ConnectionId);
    fn is_attached(&self, id: &ConnectionId) -> bool;
    /// Push the layer's current element opacities to the surface.
    fn set_opacity(&mut self, id: &ConnectionId, layer: &ConnectionLayer);
}

/// Camera movement.
pub trait Pannable {
    fn set_view(&mut self, center: Coordinate, zoom: u8);
    fn set_zoom_limits(&mut self, min_zoom: u8, max_zoom: u8);
    fn fly_to(&mut self, target: Coordinate, zoom: u8, duration: Duration);
    fn fit_bounds(&mut self, bounds: &Bounds, padding: u32, max_zoom: u8);
}

/// Statement markers and their temporary pulse emphasis.
pub trait MarkerSurface {
    /// Replace all markers; markers within `cluster_radius` pixels are clustered.
    fn place_markers(&mut self, locations: &[Location], cluster_radius: u32);
    fn emphasize_marker(&mut self, location: LocationIndex);
    fn clear_marker_emphasis(&mut self, location: LocationIndex);
}

pub trait MapSurface: Renderable + Pannable + MarkerSurface {}

impl<T: Renderable + Pannable + MarkerSurface> MapSurface for T {}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CanvasCall {
    Attach(ConnectionId),
    Detach(ConnectionId),
    SetOpacity {
        id: ConnectionId,
        line: f32,
        label: f32,
    },
    SetView {
        center: Coordinate,
        zoom: u8,
    },
    SetZoomLimits {
        min_zoom: u8,
        max_zoom: u8,
    },
    FlyTo {
        target: Coordinate,
        zoom: u8,
        duration: Duration,
    },
    FitBounds {
        bounds: Bounds,
        padding: u32,
        max_zoom: u8,
    },
    PlaceMarkers {
        count: usize,
        cluster_radius: u32,
    },
    EmphasizeMarker(LocationIndex),
    ClearMarkerEmphasis(LocationIndex),
}

#[derive(Debug, Default)]
pub struct RecordingCanvas {
    attached: IndexSet<ConnectionId>,
    emphasized: IndexSet<LocationIndex>,
    calls: Vec<CanvasCall>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attached layers in attach order.
    pub fn attached(&self) -> impl Iterator<Item = &ConnectionId> {
        self.attached.iter()
    }

    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }

    pub fn is_emphasized(&self, location: LocationIndex) -> bool {
        self.emphasized.contains(&location)
    }

    pub fn calls(&self) -> &[CanvasCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<CanvasCall> {
        std::mem::take(&mut self.calls)
    }
}

impl Renderable for RecordingCanvas {
    fn attach(&mut self, id: &ConnectionId, _layer: &ConnectionLayer) {
        if self.attached.insert(id.clone()) {
            self.calls.push(CanvasCall::Attach(id.clone()));
        }
    }

    fn detach(&mut self, id: &ConnectionId) {
        if self.attached.shift_remove(id) {
            self.calls.push(CanvasCall::Detach(id.clone()));
        }
    }

    fn is_attached(&self, id: &ConnectionId) -> bool {
        self.attached.contains(id)
    }

    fn set_opacity(&mut self, id: &ConnectionId, layer: &ConnectionLayer) {
        let line = layer.lines.first().map(|l| l.opacity).unwrap_or_default();
        let label = layer.labels.first().map(|l| l.opacity).unwrap_or_default();
        self.calls.push(CanvasCall::SetOpacity {
            id: id.clone(),
            line,
            label,
        });
    }
}

impl Pannable for RecordingCanvas {
    fn set_view(&mut self, center: Coordinate, zoom: u8) {
        self.calls.push(CanvasCall::SetView { center, zoom });
    }

    fn set_zoom_limits(&mut self, min_zoom: u8, max_zoom: u8) {
        self.calls
            .push(CanvasCall::SetZoomLimits { min_zoom, max_zoom });
    }

    fn fly_to(&mut self, target: Coordinate, zoom: u8, duration: Duration) {
        self.calls.push(CanvasCall::FlyTo {
            target,
            zoom,
            duration,
        });
    }

    fn fit_bounds(&mut self, bounds: &Bounds, padding: u32, max_zoom: u8) {
        self.calls.push(CanvasCall::FitBounds {
            bounds: *bounds,
            padding,
            max_zoom,
        });
    }
}

impl MarkerSurface for RecordingCanvas {
    fn place_markers(&mut self, locations: &[Location], cluster_radius: u32) {
        self.calls.push(CanvasCall::PlaceMarkers {
            count: locations.len(),
            cluster_radius,
        });
    }

    fn emphasize_marker(&mut self, location: LocationIndex) {
        self.emphasized.insert(location);
        self.calls.push(CanvasCall::EmphasizeMarker(location));
    }

    fn clear_marker_emphasis(&mut self, location: LocationIndex) {
        if self.emphasized.shift_remove(&location) {
            self.calls.push(CanvasCall::ClearMarkerEmphasis(location));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_layer() -> ConnectionLayer {
        ConnectionLayer {
            connection: statemap_core::ConnectionRef(0),
            lines: Vec::new(),
            labels: Vec::new(),
        }
    }

    #[test]
    fn test_attach_is_idempotent() {
        let mut canvas = RecordingCanvas::new();
        let id = ConnectionId::from("c1");
        canvas.attach(&id, &empty_layer());
        canvas.attach(&id, &empty_layer());
        assert_eq!(canvas.attached_count(), 1);
        assert_eq!(canvas.calls(), &[CanvasCall::Attach(id.clone())]);

        canvas.detach(&id);
        canvas.detach(&id);
        assert!(!canvas.is_attached(&id));
        assert_eq!(canvas.calls().len(), 2);
    }

    #[test]
    fn test_marker_emphasis() {
        let mut canvas = RecordingCanvas::new();
        canvas.emphasize_marker(LocationIndex(4));
        assert!(canvas.is_emphasized(LocationIndex(4)));
        canvas.clear_marker_emphasis(LocationIndex(4));
        assert!(!canvas.is_emphasized(LocationIndex(4)));
        assert_eq!(canvas.take_calls().len(), 2);
        assert!(canvas.calls().is_empty());
    }
}
