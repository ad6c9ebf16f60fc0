//! Command-line filter flags to a [`FilterSelection`].

use opreg_analysis::FilterSelection;

use crate::cli::FilterArgs;

/// Build the initial selection from filter flags.
///
/// Flags that were not given leave their dimension unconstrained. An open
/// year range (`--from` without `--to` or the reverse) is unbounded on the
/// missing side.
pub fn selection_from_args(args: &FilterArgs) -> FilterSelection {
    let mut selection = FilterSelection::new();
    if !args.years.is_empty() {
        selection = selection.with_years(args.years.iter().copied());
    } else if args.from.is_some() || args.to.is_some() {
        selection = selection.with_year_range(
            args.from.unwrap_or(i32::MIN),
            args.to.unwrap_or(i32::MAX),
        );
    }
    if !args.quarters.is_empty() {
        selection = selection.with_quarters(args.quarters.iter().copied());
    }
    if !args.areas.is_empty() {
        selection = selection.with_areas(args.areas.iter().cloned());
    }
    if !args.access.is_empty() {
        selection = selection.with_access(args.access.iter().cloned());
    }
    selection
}

#[cfg(test)]
mod tests {
    use opreg_analysis::YearFilter;

    use super::*;

    #[test]
    fn no_flags_select_everything() {
        assert_eq!(
            selection_from_args(&FilterArgs::default()),
            FilterSelection::default()
        );
    }

    #[test]
    fn open_range_is_unbounded() {
        let args = FilterArgs {
            from: Some(2022),
            ..FilterArgs::default()
        };
        assert_eq!(
            selection_from_args(&args).years,
            YearFilter::Range {
                from: 2022,
                to: i32::MAX
            }
        );
    }
}
