use crate::normalize::{NormalizedQuery, normalize};
use indexmap::IndexMap;
use serde::Serialize;
use statemap_core::{Location, LocationIndex, StatementId};

pub const DEFAULT_ENTITY: &str = "Unknown";
pub const DEFAULT_PLACE: &str = "Unknown Location";

/// One statement matched by a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub statement: StatementId,
    /// Place of the representative location.
    pub place: String,
    pub entity: String,
    pub summary: String,
    /// Every location of the statement for id matches; only the matching
    /// location for place-name matches.
    pub locations: Vec<LocationIndex>,
    /// Whether the statement has more than one location in the dataset.
    pub has_multiple_locations: bool,
}

#[derive(Debug, Clone)]
struct Entry {
    index: LocationIndex,
    place: Option<String>,
    entity: Option<String>,
    summary: Option<String>,
}

impl Entry {
    fn from_location(location: &Location) -> Self {
        let props = &location.properties;
        Self {
            index: location.index,
            place: props.place.clone(),
            entity: props.entity.clone(),
            summary: props.summary.clone(),
        }
    }
}

/// Statement search over locations grouped by statement, in first-seen order.
#[derive(Debug, Default)]
pub struct SearchEngine {
    groups: IndexMap<StatementId, Vec<Entry>>,
}

impl SearchEngine {
    pub fn new(locations: &[Location]) -> Self {
        let mut engine = Self::default();
        engine.set_locations(locations);
        engine
    }

    pub fn set_locations(&mut self, locations: &[Location]) {
        self.groups.clear();
        for location in locations {
            self.groups
                .entry(location.statement().clone())
                .or_default()
                .push(Entry::from_location(location));
        }
        tracing::debug!(
            statements = self.groups.len(),
            locations = locations.len(),
            "Search index updated"
        );
    }

    pub fn statement_count(&self) -> usize {
        self.groups.len()
    }

    /// Run a query. Blank input yields no results.
    pub fn search(&self, raw: &str) -> Vec<SearchResult> {
        match normalize(raw) {
            Some(query) => self.search_normalized(&query),
            None => Vec::new(),
        }
    }

    pub fn search_normalized(&self, query: &NormalizedQuery) -> Vec<SearchResult> {
        let mut results = self.match_statements(query);
        if results.is_empty() {
            results = self.match_places(query);
        }
        results.sort_by_key(|r| r.statement.number());
        results
    }

    fn match_statements(&self, query: &NormalizedQuery) -> Vec<SearchResult> {
        self.groups
            .iter()
            .filter(|(statement, _)| {
                let upper = statement.as_str().to_uppercase();
                upper.contains(&query.term) || upper.contains(&query.raw_upper)
            })
            .filter_map(|(statement, entries)| {
                let first = entries.first()?;
                Some(build_result(
                    statement,
                    first,
                    entries.iter().map(|e| e.index).collect(),
                    entries.len(),
                ))
            })
            .collect()
    }

    fn match_places(&self, query: &NormalizedQuery) -> Vec<SearchResult> {
        self.groups
            .iter()
            .filter_map(|(statement, entries)| {
                let hit = entries.iter().find(|entry| {
                    entry
                        .place
                        .as_deref()
                        .unwrap_or_default()
                        .to_uppercase()
                        .contains(&query.raw_upper)
                })?;
                Some(build_result(statement, hit, vec![hit.index], entries.len()))
            })
            .collect()
    }
}

fn build_result(
    statement: &StatementId,
    representative: &Entry,
    locations: Vec<LocationIndex>,
    group_size: usize,
) -> SearchResult {
    SearchResult {
        statement: statement.clone(),
        place: representative
            .place
            .clone()
            .unwrap_or_else(|| DEFAULT_PLACE.to_string()),
        entity: representative
            .entity
            .clone()
            .unwrap_or_else(|| DEFAULT_ENTITY.to_string()),
        summary: representative.summary.clone().unwrap_or_default(),
        locations,
        has_multiple_locations: group_size > 1,
    }
}
