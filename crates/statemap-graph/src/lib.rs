pub mod bounds;
pub mod canvas;
pub mod index;
pub mod style;
pub mod visibility;

pub use bounds::Bounds;
pub use canvas::{CanvasCall, MapSurface, MarkerSurface, Pannable, RecordingCanvas, Renderable};
pub use index::{BuildWarning, ConnectionIndex, ConnectionLabel, ConnectionLayer, ConnectionLine};
pub use style::{
    ClusterSize, Color, LineStyle, MarkerStack, get_connection_color, get_dash_pattern,
    get_entity_color, get_line_style, get_line_weight, get_type_color, stack_markers,
};
pub use visibility::VisibilityController;
