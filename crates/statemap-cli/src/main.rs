use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use statemap_app::search_box::NO_RESULTS_MESSAGE;
use statemap_app::{AtlasController, AtlasSettings, PanelContent, load_datasets};
use statemap_core::{ConnectionId, Dataset, LocationIndex, StatementId};
use statemap_graph::{RecordingCanvas, stack_markers};
use statemap_search::normalize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "statemap", author, version, about, long_about = None)]
struct Args {
    /// GeoJSON file of statement locations (overrides settings)
    #[arg(long, global = true)]
    locations: Option<PathBuf>,

    /// JSON file of connections (overrides settings)
    #[arg(long, global = true)]
    connections: Option<PathBuf>,

    /// Settings file; defaults to the per-user config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print dataset counts and connection index warnings
    Summary,
    /// Run a search query
    Search { query: String },
    /// Click the first marker of a statement and print the panel
    Statement { id: String },
    /// Click a connection and print the panel
    Connection { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let args = Args::parse();

    let mut settings =
        AtlasSettings::resolve(args.config.as_deref()).context("Failed to load settings")?;
    if let Some(path) = args.locations {
        settings.data.locations = path;
    }
    if let Some(path) = args.connections {
        settings.data.connections = path;
    }

    info!(
        locations = %settings.data.locations.display(),
        connections = %settings.data.connections.display(),
        "Loading datasets"
    );
    let dataset = load_datasets(&settings.data.locations, &settings.data.connections)
        .await
        .context("Unable to load statement data")?;
    let mut controller = AtlasController::new(settings, RecordingCanvas::new());
    controller.finish_loading(Ok(dataset));

    match args.command {
        Command::Summary => summary(&controller),
        Command::Search { query } => search(&mut controller, &query),
        Command::Statement { id } => statement(&mut controller, &id)?,
        Command::Connection { id } => connection(&mut controller, &id)?,
    }
    Ok(())
}

fn summary(controller: &AtlasController<RecordingCanvas>) {
    if let Some(info) = controller.map_info() {
        println!("{info}");
    }
    let index = controller.index();
    println!(
        "{} connection layers, {} lines",
        index.len(),
        index.total_lines()
    );
    for stack in stack_markers(controller.dataset().locations()) {
        println!(
            "stacked: {}, {} x{} ({})",
            stack.coordinate.lat,
            stack.coordinate.lng,
            stack.count,
            stack.size.css_class()
        );
    }
    for warning in index.warnings() {
        println!("warning: {warning}");
    }
}

fn search(controller: &mut AtlasController<RecordingCanvas>, query: &str) {
    controller.search_input(query);
    let results = controller.search_box().results();
    if results.is_empty() {
        println!("{NO_RESULTS_MESSAGE}");
        return;
    }
    for result in results {
        println!(
            "{}\t{}\t{}\t{} location(s)",
            result.statement,
            result.place,
            result.entity,
            result.locations.len()
        );
    }
}

fn statement(controller: &mut AtlasController<RecordingCanvas>, raw: &str) -> Result<()> {
    if raw.trim().is_empty() {
        bail!("Statement id must not be empty");
    }
    let location = first_location_matching(controller.dataset(), raw)
        .with_context(|| format!("No location for statement {}", raw.trim()))?;

    controller.click_marker(location);
    print_panel(controller.panel());

    let highlighted: Vec<&str> = controller.highlighted().map(|id| id.as_str()).collect();
    println!("highlighted: {}", highlighted.join(", "));
    Ok(())
}

/// Ids are matched as written first, then in canonical padded form.
fn first_location_matching(dataset: &Dataset, raw: &str) -> Option<LocationIndex> {
    let query = normalize(raw)?;
    [StatementId::new(raw.trim()), StatementId::new(query.term)]
        .iter()
        .find_map(|statement| dataset.first_location_for(statement))
        .map(|l| l.index)
}

fn connection(controller: &mut AtlasController<RecordingCanvas>, raw: &str) -> Result<()> {
    let id = ConnectionId::new(raw.trim());
    if controller.dataset().connection(&id).is_none() {
        bail!("No connection with id {id}");
    }
    controller.click_connection(&id);
    print_panel(controller.panel());
    Ok(())
}

fn print_panel(panel: &PanelContent) {
    println!("{}", panel.title);
    println!("{}", panel.meta);
    println!("{}", panel.body);
}

#[cfg(test)]
mod tests {
    use super::*;
    use statemap_core::{Coordinate, Location, LocationProperties};

    fn dataset(statements: &[&str]) -> Dataset {
        let locations = statements
            .iter()
            .map(|s| Location::new(Coordinate::default(), LocationProperties::new(*s)))
            .collect();
        Dataset::new(locations, vec![])
    }

    #[test]
    fn test_unpadded_ids_are_found_as_written() {
        let data = dataset(&["MAG-2", "MAG-1"]);
        assert_eq!(first_location_matching(&data, " MAG-1 "), Some(LocationIndex(1)));
        assert_eq!(first_location_matching(&data, "1"), None);
    }

    #[test]
    fn test_shorthand_resolves_to_canonical_id() {
        let data = dataset(&["MAG-001", "MAG-007"]);
        assert_eq!(first_location_matching(&data, "mag 7"), Some(LocationIndex(1)));
        assert_eq!(first_location_matching(&data, "MAG-001"), Some(LocationIndex(0)));
        assert_eq!(first_location_matching(&data, "  "), None);
    }
}
