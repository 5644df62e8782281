use std::collections::BTreeSet;
use std::rc::Rc;

use super::theme::Palette;
use crate::config::Config;
use crate::load::{self, LoadOutcome};
use crate::metrics::{hierarchy_tree, DashboardMetrics, MetricsCache, SphereNode};
use crate::models::Sphere;
use crate::store::{Domain, RecordStore, Selection, StoreSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Overview,
    Hierarchy,
    Composition,
    Fees,
    Suppliers,
    Filters,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[
            Self::Overview,
            Self::Hierarchy,
            Self::Composition,
            Self::Fees,
            Self::Suppliers,
            Self::Filters,
        ]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overview => write!(f, "Overview"),
            Self::Hierarchy => write!(f, "Hierarchy"),
            Self::Composition => write!(f, "Composition"),
            Self::Fees => write!(f, "Fees"),
            Self::Suppliers => write!(f, "Suppliers"),
            Self::Filters => write!(f, "Filters"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FilterDimension {
    Spheres,
    Categories,
    Parties,
}

impl FilterDimension {
    pub(crate) fn all() -> &'static [FilterDimension] {
        &[Self::Spheres, Self::Categories, Self::Parties]
    }

    pub(crate) fn next(self) -> Self {
        match self {
            Self::Spheres => Self::Categories,
            Self::Categories => Self::Parties,
            Self::Parties => Self::Spheres,
        }
    }

    pub(crate) fn prev(self) -> Self {
        match self {
            Self::Spheres => Self::Parties,
            Self::Categories => Self::Spheres,
            Self::Parties => Self::Categories,
        }
    }
}

impl std::fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spheres => write!(f, "Spheres"),
            Self::Categories => write!(f, "Categories"),
            Self::Parties => write!(f, "Parties"),
        }
    }
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) palette: Palette,
    pub(crate) config: Config,
    /// Where the rows came from, shown in the status bar.
    pub(crate) source_label: String,

    // Data
    base: RecordStore,
    pub(crate) domain: Domain,
    pub(crate) base_summary: StoreSummary,
    cache: MetricsCache,
    pub(crate) metrics: Rc<DashboardMetrics>,
    pub(crate) tree: Vec<SphereNode>,

    // Filters
    pub(crate) chosen_spheres: BTreeSet<Sphere>,
    pub(crate) chosen_categories: BTreeSet<String>,
    pub(crate) chosen_parties: BTreeSet<String>,
    pub(crate) filter_dimension: FilterDimension,
    pub(crate) filter_index: usize,
    pub(crate) filter_scroll: usize,

    // Scrollable chart tables
    pub(crate) list_index: usize,
    pub(crate) list_scroll: usize,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(config: Config, outcome: LoadOutcome) -> Self {
        let mut app = Self {
            running: true,
            screen: Screen::Overview,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,
            palette: Palette::default(),
            config,
            source_label: String::new(),

            base: RecordStore::default(),
            domain: Domain::default(),
            base_summary: StoreSummary::default(),
            cache: MetricsCache::default(),
            metrics: Rc::new(DashboardMetrics::default()),
            tree: Vec::new(),

            chosen_spheres: BTreeSet::new(),
            chosen_categories: BTreeSet::new(),
            chosen_parties: BTreeSet::new(),
            filter_dimension: FilterDimension::Spheres,
            filter_index: 0,
            filter_scroll: 0,

            list_index: 0,
            list_scroll: 0,

            visible_rows: 20,
        };
        app.apply_outcome(outcome);
        app.refresh_metrics();
        app
    }

    fn apply_outcome(&mut self, outcome: LoadOutcome) {
        self.source_label = if outcome.is_demo() {
            "demo data".into()
        } else {
            self.config.data_path.display().to_string()
        };

        let mut notes: Vec<String> = Vec::new();
        if let Some(notice) = &outcome.notice {
            notes.push(notice.to_string());
        }
        if !outcome.issues.is_empty() {
            notes.push(format!(
                "{} field(s) could not be parsed and were left empty",
                outcome.issues.len()
            ));
        }
        self.status_message = notes.join(". ");

        self.base = outcome.store.exclude_uninformed();
        self.domain = self.base.domain();
        self.base_summary = self.base.summary();
        self.select_all();
    }

    /// Reload the data file and start over with every value selected.
    pub(crate) fn reload(&mut self) {
        let outcome = load::load_or_demo(&self.config.data_path, &self.config.layout);
        self.cache.clear();
        self.apply_outcome(outcome);
        self.refresh_metrics();
        if self.status_message.is_empty() {
            self.set_status(format!(
                "Reloaded {} transactions from {}",
                self.base.len(),
                self.source_label
            ));
        }
    }

    pub(crate) fn selection(&self) -> Selection {
        Selection {
            spheres: self.chosen_spheres.clone(),
            categories: self.chosen_categories.clone(),
            parties: self.chosen_parties.clone(),
        }
    }

    pub(crate) fn refresh_metrics(&mut self) {
        let selection = self.selection();
        match self
            .cache
            .get_or_compute(&self.base, &selection, &self.config.metrics)
        {
            Ok(metrics) => self.metrics = metrics,
            Err(e) => {
                self.metrics = Rc::new(DashboardMetrics::default());
                self.set_status(e.to_string());
            }
        }
        self.tree = hierarchy_tree(&self.metrics.hierarchy);
        let len = self.list_len();
        if self.list_index >= len {
            self.list_index = len.saturating_sub(1);
            self.list_scroll = self.list_scroll.min(self.list_index);
        }
    }

    /// Drop the cached metrics after a config change.
    pub(crate) fn invalidate_metrics(&mut self) {
        self.cache.clear();
        self.refresh_metrics();
    }

    /// Rows on the current screen's scrollable table.
    pub(crate) fn list_len(&self) -> usize {
        match self.screen {
            Screen::Overview => 0,
            Screen::Hierarchy => super::screens::hierarchy::flatten(&self.tree).len(),
            Screen::Composition => self.metrics.composition.len(),
            Screen::Fees => self.metrics.efficiency.len(),
            Screen::Suppliers => self.metrics.diversification.len(),
            Screen::Filters => self.filter_values(self.filter_dimension).len(),
        }
    }

    pub(crate) fn switch_screen(&mut self, screen: Screen) {
        self.screen = screen;
        self.list_index = 0;
        self.list_scroll = 0;
    }

    // ── Filters ──────────────────────────────────────────────

    pub(crate) fn filter_values(&self, dimension: FilterDimension) -> Vec<String> {
        match dimension {
            FilterDimension::Spheres => self.domain.spheres.iter().map(|s| s.to_string()).collect(),
            FilterDimension::Categories => self.domain.categories.clone(),
            FilterDimension::Parties => self.domain.parties.clone(),
        }
    }

    pub(crate) fn is_chosen(&self, dimension: FilterDimension, index: usize) -> bool {
        match dimension {
            FilterDimension::Spheres => self
                .domain
                .spheres
                .get(index)
                .is_some_and(|s| self.chosen_spheres.contains(s)),
            FilterDimension::Categories => self
                .domain
                .categories
                .get(index)
                .is_some_and(|c| self.chosen_categories.contains(c)),
            FilterDimension::Parties => self
                .domain
                .parties
                .get(index)
                .is_some_and(|p| self.chosen_parties.contains(p)),
        }
    }

    pub(crate) fn chosen_count(&self, dimension: FilterDimension) -> (usize, usize) {
        match dimension {
            FilterDimension::Spheres => (self.chosen_spheres.len(), self.domain.spheres.len()),
            FilterDimension::Categories => {
                (self.chosen_categories.len(), self.domain.categories.len())
            }
            FilterDimension::Parties => (self.chosen_parties.len(), self.domain.parties.len()),
        }
    }

    /// Flip one value in or out of the selection.
    pub(crate) fn toggle_filter(&mut self, dimension: FilterDimension, index: usize) {
        match dimension {
            FilterDimension::Spheres => {
                if let Some(s) = self.domain.spheres.get(index) {
                    toggle(&mut self.chosen_spheres, s.clone());
                }
            }
            FilterDimension::Categories => {
                if let Some(c) = self.domain.categories.get(index) {
                    toggle(&mut self.chosen_categories, c.clone());
                }
            }
            FilterDimension::Parties => {
                if let Some(p) = self.domain.parties.get(index) {
                    toggle(&mut self.chosen_parties, p.clone());
                }
            }
        }
        self.refresh_metrics();
    }

    /// Select every value of one dimension.
    pub(crate) fn select_dimension(&mut self, dimension: FilterDimension) {
        let all = Selection::all(&self.domain);
        match dimension {
            FilterDimension::Spheres => self.chosen_spheres = all.spheres,
            FilterDimension::Categories => self.chosen_categories = all.categories,
            FilterDimension::Parties => self.chosen_parties = all.parties,
        }
    }

    /// Restrict one dimension to the values matching `names`
    /// (case-insensitive). An empty list selects the whole dimension.
    pub(crate) fn choose_only(
        &mut self,
        dimension: FilterDimension,
        names: &[&str],
    ) -> anyhow::Result<usize> {
        if names.is_empty() {
            self.select_dimension(dimension);
            self.refresh_metrics();
            return Ok(self.chosen_count(dimension).0);
        }
        let values = self.filter_values(dimension);
        let mut picked = BTreeSet::new();
        for name in names {
            let index = self
                .position_of(dimension, &values, name)
                .ok_or_else(|| anyhow::anyhow!("Unknown {}: {name}", dimension_noun(dimension)))?;
            picked.insert(index);
        }
        match dimension {
            FilterDimension::Spheres => {
                self.chosen_spheres = picked
                    .iter()
                    .filter_map(|i| self.domain.spheres.get(*i).cloned())
                    .collect();
            }
            FilterDimension::Categories => {
                self.chosen_categories = picked.iter().map(|i| values[*i].clone()).collect();
            }
            FilterDimension::Parties => {
                self.chosen_parties = picked.iter().map(|i| values[*i].clone()).collect();
            }
        }
        self.refresh_metrics();
        Ok(picked.len())
    }

    fn position_of(&self, dimension: FilterDimension, values: &[String], name: &str) -> Option<usize> {
        if dimension == FilterDimension::Spheres {
            let sphere = Sphere::parse(name);
            if let Some(i) = self.domain.spheres.iter().position(|s| *s == sphere) {
                return Some(i);
            }
        }
        let wanted = name.to_lowercase();
        values.iter().position(|v| v.to_lowercase() == wanted)
    }

    pub(crate) fn select_all(&mut self) {
        for dimension in FilterDimension::all() {
            self.select_dimension(*dimension);
        }
    }

    pub(crate) fn reset_filters(&mut self) {
        self.select_all();
        self.refresh_metrics();
    }

    /// True when every dimension has its full domain selected.
    pub(crate) fn is_unfiltered(&self) -> bool {
        FilterDimension::all().iter().all(|d| {
            let (chosen, total) = self.chosen_count(*d);
            chosen == total
        })
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

fn dimension_noun(dimension: FilterDimension) -> &'static str {
    match dimension {
        FilterDimension::Spheres => "sphere",
        FilterDimension::Categories => "category",
        FilterDimension::Parties => "party",
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
