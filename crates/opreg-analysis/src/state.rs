//! Derived filter state.
//!
//! Year and quarter selections constrain each other:
//!
//! - a quarter only counts when its year is selected;
//! - selecting quarters of a year that is not selected selects that year;
//! - deselecting every quarter of a year deselects the year;
//! - selecting a new year selects all of its quarters.
//!
//! [`FilterState`] is recomputed from the previous state and one
//! [`FilterChange`] instead of being patched in place, and every state it
//! produces is a fixed point of [`FilterState::derive`].

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use opreg_model::{CaseRecord, QuarterKey, UNSPECIFIED_LABEL};

use crate::filter::{FilterSelection, YearFilter};

/// One user edit of the filter controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    Years(YearFilter),
    Quarters(Option<BTreeSet<QuarterKey>>),
    Areas(Option<BTreeSet<String>>),
    Access(Option<BTreeSet<String>>),
    Reset,
}

/// A consistent selection plus the options the controls can offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterState {
    available_years: BTreeSet<i32>,
    available_quarters: BTreeSet<QuarterKey>,
    available_areas: BTreeSet<String>,
    available_access: BTreeSet<String>,
    selection: FilterSelection,
}

impl FilterState {
    /// Build the state for `records`, reconciling `selection`.
    pub fn derive(records: &[CaseRecord], selection: FilterSelection) -> Self {
        let available_quarters: BTreeSet<QuarterKey> =
            records.iter().map(|record| record.quarter).collect();
        let available_years = available_quarters.iter().map(|q| q.year()).collect();
        let available_areas = records
            .iter()
            .flat_map(|record| {
                if record.areas.is_empty() {
                    vec![UNSPECIFIED_LABEL.to_string()]
                } else {
                    record.areas.clone()
                }
            })
            .collect();
        let available_access = records
            .iter()
            .map(|record| record.access_label.clone())
            .collect();

        let mut state = Self {
            available_years,
            available_quarters,
            available_areas,
            available_access,
            selection,
        };
        state.selection = state.reconcile(state.selection.clone());
        state
    }

    /// Apply one edit and return the reconciled state.
    #[must_use]
    pub fn apply(&self, change: FilterChange) -> Self {
        let current = &self.selection;
        let mut next = current.clone();
        match change {
            FilterChange::Years(years) => {
                if let Some(quarters) = &current.quarters {
                    let old_years = self.effective_years();
                    let new_years = years.resolve(&self.available_years);
                    let kept = quarters
                        .iter()
                        .copied()
                        .filter(|q| new_years.contains(&q.year()));
                    let added = self
                        .available_quarters
                        .iter()
                        .copied()
                        .filter(|q| new_years.contains(&q.year()) && !old_years.contains(&q.year()));
                    next.quarters = Some(kept.chain(added).collect());
                }
                next.years = years;
            }
            FilterChange::Quarters(Some(quarters)) => {
                let quarters: BTreeSet<QuarterKey> = quarters
                    .intersection(&self.available_quarters)
                    .copied()
                    .collect();
                let years: BTreeSet<i32> = quarters.iter().map(|q| q.year()).collect();
                if years != self.effective_years() {
                    next.years = YearFilter::Set(years);
                }
                next.quarters = Some(quarters);
            }
            FilterChange::Quarters(None) => next.quarters = None,
            FilterChange::Areas(areas) => next.areas = areas,
            FilterChange::Access(access) => next.access = access,
            FilterChange::Reset => next = FilterSelection::default(),
        }
        let mut state = self.clone();
        state.selection = self.reconcile(next);
        debug!(selection = ?state.selection, "filter state updated");
        state
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn available_years(&self) -> &BTreeSet<i32> {
        &self.available_years
    }

    pub fn available_quarters(&self) -> &BTreeSet<QuarterKey> {
        &self.available_quarters
    }

    pub fn available_areas(&self) -> &BTreeSet<String> {
        &self.available_areas
    }

    pub fn available_access(&self) -> &BTreeSet<String> {
        &self.available_access
    }

    /// Available years passing the year filter.
    pub fn effective_years(&self) -> BTreeSet<i32> {
        self.selection.years.resolve(&self.available_years)
    }

    /// Available quarters passing both the year and the quarter filter.
    pub fn effective_quarters(&self) -> BTreeSet<QuarterKey> {
        self.available_quarters
            .iter()
            .copied()
            .filter(|q| self.selection.years.matches(q.year()))
            .filter(|q| {
                self.selection
                    .quarters
                    .as_ref()
                    .is_none_or(|quarters| quarters.contains(q))
            })
            .collect()
    }

    /// Selected quarters pull their years into the year set; a year stays
    /// only while at least one of its quarters is selected.
    ///
    /// Deselecting a year drops its quarters in [`FilterState::apply`], before
    /// this runs.
    fn reconcile(&self, mut selection: FilterSelection) -> FilterSelection {
        let Some(quarters) = selection.quarters.take() else {
            return selection;
        };
        let quarters: BTreeSet<QuarterKey> = quarters
            .intersection(&self.available_quarters)
            .copied()
            .collect();
        let resolved = selection.years.resolve(&self.available_years);
        let mut years = resolved.clone();
        years.extend(quarters.iter().map(|q| q.year()));
        years.retain(|year| quarters.iter().any(|q| q.year() == *year));
        if years != resolved {
            selection.years = YearFilter::Set(years);
        }
        selection.quarters = Some(quarters);
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(year: i32, quarter: u32) -> QuarterKey {
        QuarterKey::new(year, quarter).unwrap()
    }

    fn state(quarters: &[QuarterKey]) -> FilterState {
        FilterState {
            available_years: quarters.iter().map(|k| k.year()).collect(),
            available_quarters: quarters.iter().copied().collect(),
            available_areas: BTreeSet::new(),
            available_access: BTreeSet::new(),
            selection: FilterSelection::default(),
        }
    }

    #[test]
    fn reconcile_without_quarters_is_identity() {
        let s = state(&[q(2023, 1), q(2024, 1)]);
        let selection = FilterSelection::new().with_years([2024]);
        assert_eq!(s.reconcile(selection.clone()), selection);
    }

    #[test]
    fn reconcile_adds_years_of_selected_quarters() {
        let s = state(&[q(2023, 1), q(2023, 2), q(2024, 1)]);
        let selection = FilterSelection::new()
            .with_years([2023])
            .with_quarters([q(2023, 2), q(2024, 1)]);
        let reconciled = s.reconcile(selection);
        assert_eq!(
            reconciled.quarters,
            Some([q(2023, 2), q(2024, 1)].into_iter().collect())
        );
        assert_eq!(
            reconciled.years,
            YearFilter::Set([2023, 2024].into_iter().collect())
        );
    }

    #[test]
    fn reconcile_drops_years_without_selected_quarters() {
        let s = state(&[q(2023, 1), q(2024, 1)]);
        let selection = FilterSelection::new()
            .with_years([2023, 2024])
            .with_quarters([q(2024, 1), q(2025, 1)]);
        let reconciled = s.reconcile(selection);
        assert_eq!(reconciled.quarters, Some([q(2024, 1)].into_iter().collect()));
        assert_eq!(reconciled.years, YearFilter::Set([2024].into_iter().collect()));
    }
}
