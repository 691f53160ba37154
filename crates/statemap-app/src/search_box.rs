//! Search box state: query, results dropdown, clear button and the
//! multi-location picker.

use crate::panel::html_escape;
use serde::Serialize;
use statemap_core::{Dataset, LocationIndex, StatementId};
use statemap_search::{DEFAULT_PLACE, SearchEngine, SearchResult};

pub const LOADING_MESSAGE: &str = "Loading statement data...";
pub const UNAVAILABLE_MESSAGE: &str = "Statement data is unavailable";
pub const NO_RESULTS_MESSAGE: &str = "No statements found matching your search";
pub const DEFAULT_LOCATION_TYPE: &str = "Location";
const PICKER_SUMMARY_CHARS: usize = 100;

/// Whether the data behind the search is usable yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Loading,
    Ready,
    Unavailable,
}

/// What the results dropdown holds, whether or not it is visible.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ResultsContent {
    Empty,
    Loading,
    Unavailable,
    NoResults,
    Results(Vec<SearchResult>),
}

/// Outcome of choosing a result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultChoice {
    Jump {
        location: LocationIndex,
        statement: StatementId,
    },
    /// The statement has several locations; the picker is now open.
    PickerOpened,
}

#[derive(Debug)]
pub struct SearchBox {
    query: String,
    content: ResultsContent,
    results_visible: bool,
    clear_visible: bool,
    focused: bool,
    picker: Option<SearchResult>,
}

impl Default for SearchBox {
    fn default() -> Self {
        Self {
            query: String::new(),
            content: ResultsContent::Empty,
            results_visible: false,
            clear_visible: false,
            focused: false,
            picker: None,
        }
    }
}

impl SearchBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn content(&self) -> &ResultsContent {
        &self.content
    }

    pub fn results_visible(&self) -> bool {
        self.results_visible
    }

    pub fn clear_button_visible(&self) -> bool {
        self.clear_visible
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn picker(&self) -> Option<&SearchResult> {
        self.picker.as_ref()
    }

    /// Results currently listed, if any.
    pub fn results(&self) -> &[SearchResult] {
        match &self.content {
            ResultsContent::Results(results) => results,
            _ => &[],
        }
    }

    pub fn input(&mut self, text: &str, engine: &SearchEngine, availability: Availability) {
        self.query = text.to_string();

        let not_ready = match availability {
            Availability::Ready => None,
            Availability::Unavailable => Some(ResultsContent::Unavailable),
            Availability::Loading => Some(ResultsContent::Loading),
        };
        if let Some(content) = not_ready {
            tracing::debug!(?availability, "Search before data is ready");
            self.content = content;
            self.results_visible = true;
            return;
        }

        if text.trim().is_empty() {
            self.content = ResultsContent::Empty;
            self.results_visible = false;
            self.clear_visible = false;
            return;
        }

        self.clear_visible = true;
        let results = engine.search(text);
        tracing::debug!(
            query = %text.trim(),
            results = results.len(),
            statements = engine.statement_count(),
            "Searched"
        );
        self.content = if results.is_empty() {
            ResultsContent::NoResults
        } else {
            ResultsContent::Results(results)
        };
        self.results_visible = true;
    }

    /// Focus re-shows whatever the dropdown last held.
    pub fn focus(&mut self) {
        self.focused = true;
        self.show_results();
    }

    /// The caller is responsible for hiding the results after the blur delay.
    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn show_results(&mut self) {
        if self.content != ResultsContent::Empty {
            self.results_visible = true;
        }
    }

    pub fn hide_results(&mut self) {
        self.results_visible = false;
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.content = ResultsContent::Empty;
        self.results_visible = false;
        self.clear_visible = false;
    }

    /// Close an open picker, and clear and blur a non-empty query.
    pub fn escape(&mut self) {
        if self.picker.take().is_some() {
            tracing::debug!("Closed location picker");
        }
        if !self.query.is_empty() {
            self.clear();
            self.blur();
        }
    }

    pub fn choose_result(&mut self, index: usize) -> Option<ResultChoice> {
        let result = self.results().get(index)?.clone();
        match result.locations.as_slice() {
            [] => None,
            [location] => {
                self.hide_results();
                Some(ResultChoice::Jump {
                    location: *location,
                    statement: result.statement,
                })
            }
            _ => {
                self.hide_results();
                self.picker = Some(result);
                Some(ResultChoice::PickerOpened)
            }
        }
    }

    /// Pick one of the picker's locations. Closes the picker and clears the search.
    pub fn choose_picker_location(&mut self, index: usize) -> Option<(LocationIndex, StatementId)> {
        let picker = self.picker.as_ref()?;
        let location = *picker.locations.get(index)?;
        let statement = picker.statement.clone();
        self.picker = None;
        self.clear();
        Some((location, statement))
    }

    pub fn dismiss_picker(&mut self) {
        self.picker = None;
    }

    /// Dropdown markup, or `None` when there is nothing to show.
    pub fn results_markup(&self) -> Option<String> {
        if !self.results_visible {
            return None;
        }
        let markup = match &self.content {
            ResultsContent::Empty => return None,
            ResultsContent::Loading => format!(
                r#"<div class="no-results"><i class="fas fa-spinner fa-spin"></i> {LOADING_MESSAGE}</div>"#
            ),
            ResultsContent::Unavailable => {
                format!(r#"<div class="no-results">{UNAVAILABLE_MESSAGE}</div>"#)
            }
            ResultsContent::NoResults => {
                format!(r#"<div class="no-results">{NO_RESULTS_MESSAGE}</div>"#)
            }
            ResultsContent::Results(results) => results
                .iter()
                .enumerate()
                .map(|(i, r)| result_row(i, r))
                .collect(),
        };
        Some(markup)
    }

    /// Picker overlay markup while a picker is open.
    pub fn picker_markup(&self, dataset: &Dataset) -> Option<String> {
        let picker = self.picker.as_ref()?;
        let options: String = picker
            .locations
            .iter()
            .enumerate()
            .filter_map(|(i, index)| {
                let props = &dataset.location(*index)?.properties;
                Some(format!(
                    r#"<div class="location-option" data-index="{}"><div class="location-option-header"><span class="location-number">{}</span><span class="location-type">{}</span></div><div class="location-place">{}</div><div class="location-summary">{}</div></div>"#,
                    i,
                    i + 1,
                    html_escape(props.location_type.as_deref().unwrap_or(DEFAULT_LOCATION_TYPE)),
                    html_escape(props.place.as_deref().unwrap_or(DEFAULT_PLACE)),
                    html_escape(&truncate_summary(props.summary.as_deref().unwrap_or_default()))
                ))
            })
            .collect();

        Some(format!(
            r#"<div class="location-picker-overlay"><div class="location-picker"><div class="location-picker-header"><h4><i class="fas fa-map-pin"></i> {} - Choose Location</h4><button class="close-picker"><i class="fas fa-times"></i></button></div><div class="location-picker-subtitle">This statement references {} locations. Select one to view:</div><div class="location-picker-list">{}</div></div></div>"#,
            html_escape(picker.statement.as_str()),
            picker.locations.len(),
            options
        ))
    }
}

fn result_row(index: usize, result: &SearchResult) -> String {
    let count = result.locations.len();
    let badge = if count > 1 {
        format!(
            r#" <span class="location-count-badge"><i class="fas fa-map-marker-alt"></i> {count}</span>"#
        )
    } else {
        String::new()
    };
    let hint = if count > 1 {
        format!(
            r#"<div class="multi-location-hint"><i class="fas fa-info-circle"></i> Click to choose from {count} locations</div>"#
        )
    } else {
        String::new()
    };
    format!(
        r#"<div class="search-result-item" data-index="{}"><div class="result-title">{}{}</div><div class="result-subtitle"><span>{}</span><span class="result-entity">{}</span></div>{}</div>"#,
        index,
        html_escape(result.statement.as_str()),
        badge,
        html_escape(&result.place),
        html_escape(&result.entity),
        hint
    )
}

/// First 100 characters, with `...` when anything was cut.
pub fn truncate_summary(summary: &str) -> String {
    match summary.char_indices().nth(PICKER_SUMMARY_CHARS) {
        Some((cut, _)) => format!("{}...", &summary[..cut]),
        None => summary.to_string(),
    }
}
