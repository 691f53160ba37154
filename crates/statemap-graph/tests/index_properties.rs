use proptest::prelude::*;
use statemap_core::{
    Connection, ConnectionType, Coordinate, Location, LocationIndex, LocationProperties,
};
use statemap_graph::{ConnectionIndex, RecordingCanvas, Renderable, VisibilityController};

fn locations_for(counts: &[usize]) -> Vec<Location> {
    let mut locations = Vec::new();
    for (statement, count) in counts.iter().enumerate() {
        for k in 0..*count {
            let mut location = Location::new(
                Coordinate::new(50.0 + k as f64, statement as f64),
                LocationProperties::new(format!("MAG-{:03}", statement + 1)),
            );
            location.index = LocationIndex(locations.len());
            locations.push(location);
        }
    }
    locations
}

proptest! {
    /// A connection between statements with `a` and `b` locations draws
    /// `a * b` lines, minus the `a` self-pairs when both ends are the same statement.
    #[test]
    fn prop_line_count_is_product_minus_self_pairs(
        counts in prop::collection::vec(1usize..5, 1..5),
        from in 0usize..5,
        to in 0usize..5,
    ) {
        let from = from % counts.len();
        let to = to % counts.len();
        let locations = locations_for(&counts);
        let kind = if from == to { ConnectionType::SameStatement } else { ConnectionType::Entity };
        let connection = Connection::new(
            "c",
            format!("MAG-{:03}", from + 1),
            format!("MAG-{:03}", to + 1),
            kind,
        )
        .with_label("label");

        let index = ConnectionIndex::build(&locations, &[connection]);
        let layer = index.layer(&"c".into()).unwrap();

        let expected = if from == to {
            counts[from] * counts[from] - counts[from]
        } else {
            counts[from] * counts[to]
        };
        prop_assert_eq!(layer.line_count(), expected);
        prop_assert_eq!(layer.label_count(), expected);
        prop_assert!(layer.lines.iter().all(|line| line.from != line.to));
    }

    /// After any sequence of highlight requests, the attached layers are
    /// exactly the highlighted ones and only they are visible.
    #[test]
    fn prop_attached_matches_highlighted(
        ops in prop::collection::vec((0usize..4, 0usize..6), 0..20),
    ) {
        let locations = locations_for(&[2, 1, 3, 1]);
        let connections = vec![
            Connection::new("a", "MAG-001", "MAG-002", ConnectionType::Entity),
            Connection::new("b", "MAG-002", "MAG-003", ConnectionType::Character),
            Connection::new("c", "MAG-003", "MAG-003", ConnectionType::SameStatement),
            Connection::new("d", "MAG-004", "MAG-001", ConnectionType::Timeline),
            Connection::new("e", "MAG-001", "MAG-999", ConnectionType::Location),
        ];
        let ids = ["a", "b", "c", "d", "e", "missing"];
        let mut index = ConnectionIndex::build(&locations, &connections);
        let mut canvas = RecordingCanvas::new();
        let mut visibility = VisibilityController::new();

        for (op, arg) in ops {
            match op {
                0 => visibility.clear_all(&mut index, &mut canvas),
                1 => {
                    visibility.highlight_one(&ids[arg].into(), &mut index, &mut canvas);
                }
                _ => {
                    let statement = format!("MAG-{:03}", arg % 4 + 1);
                    visibility.highlight_all_for_statement(&statement.into(), &mut index, &mut canvas);
                }
            }

            for (id, layer) in index.layers() {
                let highlighted = visibility.is_highlighted(id);
                prop_assert_eq!(canvas.is_attached(id), highlighted);
                prop_assert_eq!(layer.is_visible(), highlighted && layer.line_count() > 0);
            }
            prop_assert_eq!(canvas.attached_count(), visibility.highlighted_count());
        }
    }
}
