//! Connection highlighting.
//!
//! A layer is attached to the surface exactly when its id is in the
//! highlighted set, and every attached layer is shown at highlight opacity.

use crate::canvas::Renderable;
use crate::index::ConnectionIndex;
use indexmap::IndexSet;
use statemap_core::{ConnectionId, StatementId};

#[derive(Debug, Default, Clone)]
pub struct VisibilityController {
    highlighted: IndexSet<ConnectionId>,
}

impl VisibilityController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Detach every attached layer and reset every layer to invisible.
    pub fn clear_all<R: Renderable + ?Sized>(&mut self, index: &mut ConnectionIndex, canvas: &mut R) {
        for (id, layer) in index.layers_mut() {
            if canvas.is_attached(id) {
                canvas.detach(id);
            }
            if layer.hide() {
                canvas.set_opacity(id, layer);
            }
        }
        self.highlighted.clear();
    }

    /// Attach and show one connection. Returns false when it has no layer.
    pub fn highlight_one<R: Renderable + ?Sized>(
        &mut self,
        id: &ConnectionId,
        index: &mut ConnectionIndex,
        canvas: &mut R,
    ) -> bool {
        let Some(layer) = index.layer_mut(id) else {
            tracing::debug!("No layer for connection {}", id);
            return false;
        };
        canvas.attach(id, layer);
        layer.show();
        canvas.set_opacity(id, layer);
        self.highlighted.insert(id.clone());
        true
    }

    /// Replace the current highlights with every connection touching
    /// `statement`, in dataset order. Returns how many were shown.
    pub fn highlight_all_for_statement<R: Renderable + ?Sized>(
        &mut self,
        statement: &StatementId,
        index: &mut ConnectionIndex,
        canvas: &mut R,
    ) -> usize {
        self.clear_all(index, canvas);
        let ids = index.connections_touching(statement).to_vec();
        let shown = ids
            .iter()
            .filter(|id| self.highlight_one(id, index, canvas))
            .count();
        tracing::debug!(statement = %statement, shown, "Highlighted statement connections");
        shown
    }

    /// Highlighted ids in the order they were shown.
    pub fn highlighted(&self) -> impl Iterator<Item = &ConnectionId> {
        self.highlighted.iter()
    }

    pub fn highlighted_count(&self) -> usize {
        self.highlighted.len()
    }

    pub fn has_highlights(&self) -> bool {
        !self.highlighted.is_empty()
    }

    pub fn is_highlighted(&self, id: &ConnectionId) -> bool {
        self.highlighted.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{CanvasCall, RecordingCanvas};
    use statemap_core::{
        Connection, ConnectionType, Coordinate, Location, LocationIndex, LocationProperties,
    };

    fn fixture() -> ConnectionIndex {
        let locations: Vec<Location> = [("MAG-001", 50.0), ("MAG-002", 51.0), ("MAG-003", 52.0)]
            .iter()
            .enumerate()
            .map(|(i, (statement, lat))| {
                let mut loc =
                    Location::new(Coordinate::new(*lat, 0.0), LocationProperties::new(*statement));
                loc.index = LocationIndex(i);
                loc
            })
            .collect();
        let connections = vec![
            Connection::new("c1", "MAG-001", "MAG-002", ConnectionType::Entity),
            Connection::new("c2", "MAG-002", "MAG-003", ConnectionType::Artifact),
            Connection::new("c3", "MAG-003", "MAG-001", ConnectionType::Timeline),
        ];
        ConnectionIndex::build(&locations, &connections)
    }

    #[test]
    fn test_highlight_all_for_statement() {
        let mut index = fixture();
        let mut canvas = RecordingCanvas::new();
        let mut visibility = VisibilityController::new();

        let shown =
            visibility.highlight_all_for_statement(&"MAG-001".into(), &mut index, &mut canvas);
        assert_eq!(shown, 2);
        let ids: Vec<&str> = visibility.highlighted().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c3"]);
        assert!(index.layer(&"c1".into()).unwrap().is_visible());
        assert!(!index.layer(&"c2".into()).unwrap().is_visible());
        assert_eq!(canvas.attached_count(), 2);
    }

    #[test]
    fn test_switching_statement_replaces_highlights() {
        let mut index = fixture();
        let mut canvas = RecordingCanvas::new();
        let mut visibility = VisibilityController::new();

        visibility.highlight_all_for_statement(&"MAG-001".into(), &mut index, &mut canvas);
        visibility.highlight_all_for_statement(&"MAG-002".into(), &mut index, &mut canvas);

        let ids: Vec<&str> = visibility.highlighted().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2"]);
        assert!(!canvas.is_attached(&"c3".into()));
        assert!(!index.layer(&"c3".into()).unwrap().is_visible());
    }

    #[test]
    fn test_clear_all_detaches_and_hides() {
        let mut index = fixture();
        let mut canvas = RecordingCanvas::new();
        let mut visibility = VisibilityController::new();

        visibility.highlight_one(&"c2".into(), &mut index, &mut canvas);
        canvas.take_calls();
        visibility.clear_all(&mut index, &mut canvas);

        assert!(!visibility.has_highlights());
        assert_eq!(canvas.attached_count(), 0);
        assert!(index.layers().all(|(_, layer)| !layer.is_visible()));
        assert_eq!(
            canvas.calls(),
            &[
                CanvasCall::Detach("c2".into()),
                CanvasCall::SetOpacity {
                    id: "c2".into(),
                    line: 0.0,
                    label: 0.0,
                },
            ]
        );
    }

    #[test]
    fn test_highlight_unknown_id_is_noop() {
        let mut index = fixture();
        let mut canvas = RecordingCanvas::new();
        let mut visibility = VisibilityController::new();

        assert!(!visibility.highlight_one(&"nope".into(), &mut index, &mut canvas));
        assert!(!visibility.has_highlights());
        assert!(canvas.calls().is_empty());
    }

    #[test]
    fn test_highlight_one_twice_keeps_single_entry() {
        let mut index = fixture();
        let mut canvas = RecordingCanvas::new();
        let mut visibility = VisibilityController::new();

        visibility.highlight_one(&"c1".into(), &mut index, &mut canvas);
        visibility.highlight_one(&"c1".into(), &mut index, &mut canvas);
        assert_eq!(visibility.highlighted_count(), 1);
        assert_eq!(canvas.attached_count(), 1);
    }

    #[test]
    fn test_statement_without_connections_only_clears() {
        let mut index = fixture();
        let mut canvas = RecordingCanvas::new();
        let mut visibility = VisibilityController::new();

        visibility.highlight_one(&"c1".into(), &mut index, &mut canvas);
        let shown =
            visibility.highlight_all_for_statement(&"MAG-404".into(), &mut index, &mut canvas);
        assert_eq!(shown, 0);
        assert!(!visibility.has_highlights());
        assert_eq!(canvas.attached_count(), 0);
    }
}
