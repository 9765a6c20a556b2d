//! Routing of worksheet names into the three dashboard categories.
//!
//! The split is positional and relies on the upstream workbook keeping a fixed
//! worksheet order: the first [`POSITIVES_COUNT`] worksheets are positive
//! isolate epicurves, the next [`ENVIRONMENTAL_COUNT`] are environmental
//! audits, and everything after that is a hand hygiene audit. Reordering or
//! inserting worksheets upstream silently changes the grouping.

use crate::grid::WorksheetHandle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Name of the worksheet holding the summary totals.
pub const TOTALS_WORKSHEET: &str = "Totals";

/// Number of leading worksheets routed to [`Category::Positives`].
pub const POSITIVES_COUNT: usize = 3;

/// Number of worksheets after the positives routed to [`Category::Environmental`].
pub const ENVIRONMENTAL_COUNT: usize = 5;

/// A semantic bucket of worksheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Positives,
    Environmental,
    HandHygiene,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 3] = [Self::Positives, Self::Environmental, Self::HandHygiene];

    /// Sidebar heading for the category.
    #[must_use]
    pub fn heading(self) -> &'static str {
        match self {
            Self::Positives => "Positive Isolates Epicurves",
            Self::Environmental => "Environmental Audits",
            Self::HandHygiene => "Hand Hygiene Audits",
        }
    }

    /// Form/query key for the category.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Positives => "positives",
            Self::Environmental => "environmental",
            Self::HandHygiene => "hand_hygiene",
        }
    }

    /// Parse a form/query key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

/// Worksheet names partitioned into categories, each in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroups {
    pub positives: Vec<String>,
    pub environmental: Vec<String>,
    pub hand_hygiene: Vec<String>,
}

impl CategoryGroups {
    /// Partition worksheet names by position.
    ///
    /// The totals worksheet is never offered as a chart, so it is dropped from
    /// whichever group its position falls into. Lists shorter than the fixed
    /// boundaries leave the later groups short or empty.
    #[must_use]
    pub fn partition(names: &[String]) -> Self {
        let positives_end = POSITIVES_COUNT.min(names.len());
        let environmental_end = (POSITIVES_COUNT + ENVIRONMENTAL_COUNT).min(names.len());

        let keep = |slice: &[String]| -> Vec<String> {
            slice
                .iter()
                .filter(|name| name.as_str() != TOTALS_WORKSHEET)
                .cloned()
                .collect()
        };

        Self {
            positives: keep(&names[..positives_end]),
            environmental: keep(&names[positives_end..environmental_end]),
            hand_hygiene: keep(&names[environmental_end..]),
        }
    }

    #[must_use]
    pub fn group(&self, category: Category) -> &[String] {
        match category {
            Category::Positives => &self.positives,
            Category::Environmental => &self.environmental,
            Category::HandHygiene => &self.hand_hygiene,
        }
    }

    #[must_use]
    pub fn category_of(&self, name: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|c| self.group(*c).iter().any(|n| n == name))
    }

    /// Whether charts for this worksheet count patients rather than scores.
    #[must_use]
    pub fn counts_patients(&self, name: &str) -> bool {
        self.category_of(name) == Some(Category::Positives)
    }

    /// Map selected names back to worksheets.
    ///
    /// The result follows category order, then source order within each
    /// category, regardless of the order in which names were picked. Names
    /// outside every group, or absent from `worksheets`, are ignored.
    #[must_use]
    pub fn resolve_selections(
        &self,
        selected: &BTreeSet<String>,
        worksheets: &[WorksheetHandle],
    ) -> Vec<WorksheetHandle> {
        Category::ALL
            .into_iter()
            .flat_map(|category| self.group(category).iter())
            .filter(|name| selected.contains(name.as_str()))
            .filter_map(|name| worksheets.iter().find(|ws| &ws.name == name).cloned())
            .collect()
    }
}

/// The user's picks from each category's multi-select.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selection {
    pub positives: Vec<String>,
    pub environmental: Vec<String>,
    pub hand_hygiene: Vec<String>,
}

impl Selection {
    /// Record one pick under `category`.
    pub fn add(&mut self, category: Category, name: impl Into<String>) {
        let group = match category {
            Category::Positives => &mut self.positives,
            Category::Environmental => &mut self.environmental,
            Category::HandHygiene => &mut self.hand_hygiene,
        };
        group.push(name.into());
    }

    #[must_use]
    pub fn picks(&self, category: Category) -> &[String] {
        match category {
            Category::Positives => &self.positives,
            Category::Environmental => &self.environmental,
            Category::HandHygiene => &self.hand_hygiene,
        }
    }

    /// Every distinct picked name.
    #[must_use]
    pub fn names(&self) -> BTreeSet<String> {
        Category::ALL
            .into_iter()
            .flat_map(|c| self.picks(c).iter().cloned())
            .collect()
    }

    #[must_use]
    pub fn is_selected(&self, category: Category, name: &str) -> bool {
        self.picks(category).iter().any(|n| n == name)
    }
}
