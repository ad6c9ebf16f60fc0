use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::info_span;

use opreg_analysis::{Dashboard, FilterState, apply_filters};
use opreg_cli::catalog::field_catalog;
use opreg_cli::cli::{ExportArgs, FieldsArgs, SummaryArgs};
use opreg_cli::export::write_export;
use opreg_cli::pipeline::load_cases;
use opreg_cli::selection::selection_from_args;

use crate::summary::{apply_table_style, checkbox_table, code_table, header_cell, print_dashboard};

pub fn run_summary(args: &SummaryArgs) -> Result<()> {
    let span = info_span!("summary");
    let _guard = span.enter();
    let cases = load_cases(&args.source)?;
    let dashboard = Dashboard::build(cases.records(), selection_from_args(&args.filters));
    print_dashboard(&dashboard, cases.dropped());
    Ok(())
}

pub fn run_export(args: &ExportArgs) -> Result<()> {
    let span = info_span!("export");
    let _guard = span.enter();
    let cases = load_cases(&args.source)?;
    let state = FilterState::derive(cases.records(), selection_from_args(&args.filters));
    let rows = apply_filters(cases.records(), state.selection());
    let written = write_export(&rows, &args.output, args.format)?;
    println!("{written} Fälle nach {} geschrieben", args.output.display());
    Ok(())
}

pub fn run_fields(args: &FieldsArgs) -> Result<()> {
    let catalog = field_catalog();
    if args.json {
        let json = serde_json::to_string_pretty(&catalog).context("serialize field listing")?;
        println!("{json}");
        return Ok(());
    }

    let mut fields = Table::new();
    fields.set_header(vec![header_cell("Exportfeld")]);
    apply_table_style(&mut fields);
    for field in &catalog.export_fields {
        fields.add_row(vec![*field]);
    }
    println!("{fields}");
    for table in &catalog.code_tables {
        println!("{}", code_table(table));
    }
    for group in &catalog.checkbox_groups {
        println!("{}", checkbox_table(group));
    }
    Ok(())
}
