//! Interaction layer for the statement map: selection rules, search box,
//! detail panel, deferred effects and dataset loading.

pub mod controller;
pub mod loader;
pub mod panel;
pub mod search_box;
pub mod selection;
pub mod settings;
pub mod timeline;

pub use controller::{AtlasController, LoadState};
pub use loader::load_datasets;
pub use panel::{PanelAction, PanelContent, PanelView};
pub use search_box::{Availability, ResultChoice, ResultsContent, SearchBox};
pub use selection::{SelectionState, ToggleOutcome};
pub use settings::{AtlasSettings, SettingsError};
pub use timeline::{Effect, Timeline};
