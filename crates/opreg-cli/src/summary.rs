use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use opreg_analysis::{ChartKind, CountTable, Dashboard, FilterState, Metrics, StayTable};
use opreg_model::{CheckboxGroup, CodeTable};

pub fn print_dashboard(dashboard: &Dashboard<'_>, dropped: usize) {
    print_selection(&dashboard.state);
    println!("{}", metrics_table(&dashboard.metrics, dropped));
    if dashboard.is_empty() {
        for notice in dashboard.notices() {
            println!("{}", notice.message);
        }
        return;
    }
    let notices = dashboard.notices();
    for kind in ChartKind::ALL {
        println!();
        println!("{}", title_line(kind.title()));
        if let Some(notice) = notices.iter().find(|notice| notice.chart == Some(kind)) {
            println!("{}", notice.message);
            continue;
        }
        match dashboard.charts.table(kind) {
            Some(table) => println!("{}", count_table(table)),
            None => println!("{}", stay_table(&dashboard.charts.length_of_stay)),
        }
    }
}

fn print_selection(state: &FilterState) {
    let selection = state.selection();
    println!("Jahre: {}", join(state.effective_years().iter()));
    if selection.quarters.is_some() {
        let quarters = state.effective_quarters();
        println!("Quartale: {}", join(quarters.iter().map(|q| q.label())));
    }
    if let Some(areas) = &selection.areas {
        println!("Bereiche: {}", join(areas.iter()));
    }
    if let Some(access) = &selection.access {
        println!("Zugang: {}", join(access.iter()));
    }
}

fn join<I, T>(values: I) -> String
where
    I: Iterator<Item = T>,
    T: ToString,
{
    let values: Vec<String> = values.map(|value| value.to_string()).collect();
    if values.is_empty() {
        "-".to_string()
    } else {
        values.join(", ")
    }
}

fn title_line(title: &str) -> String {
    format!("{title}\n{}", "─".repeat(title.chars().count()))
}

fn metrics_table(metrics: &Metrics, dropped: usize) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Kennzahl"), header_cell("Wert")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Fälle"), Cell::new(metrics.case_count)]);
    table.add_row(vec![
        Cell::new("Mittlerer Clavien-Dindo-Code"),
        metrics
            .mean_complication_grade
            .map_or_else(|| dim_cell("-"), |mean| Cell::new(format!("{mean:.1}"))),
    ]);
    table.add_row(vec![
        Cell::new("Bereiche"),
        Cell::new(metrics.distinct_areas),
    ]);
    table.add_row(vec![
        dim_cell("Ohne OP-Datum ausgeschlossen"),
        dim_cell(dropped),
    ]);
    table
}

fn count_table(counts: &CountTable) -> Table {
    let mut table = Table::new();
    let mut header: Vec<Cell> = counts.key_names.iter().map(|name| header_cell(name)).collect();
    header.push(header_cell("Fälle"));
    table.set_header(header);
    apply_table_style(&mut table);
    align_column(&mut table, counts.key_names.len(), CellAlignment::Right);
    for row in &counts.rows {
        let mut cells: Vec<Cell> = row.keys.iter().map(Cell::new).collect();
        cells.push(Cell::new(row.count));
        table.add_row(cells);
    }
    table.add_row(total_row(counts.key_names.len(), counts.total()));
    table
}

fn total_row(key_columns: usize, total: usize) -> Vec<Cell> {
    let mut cells = vec![
        Cell::new("Gesamt")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
    ];
    cells.extend((1..key_columns).map(|_| dim_cell("-")));
    cells.push(Cell::new(total).add_attribute(Attribute::Bold));
    cells
}

fn stay_table(stay: &StayTable) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("jahr"),
        header_cell("Fälle"),
        header_cell("Mittelwert (Tage)"),
        header_cell("Median (Tage)"),
    ]);
    apply_table_style(&mut table);
    for index in 1..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for row in &stay.rows {
        table.add_row(vec![
            Cell::new(row.year),
            Cell::new(row.count),
            Cell::new(format!("{:.1}", row.mean)),
            Cell::new(format!("{:.1}", row.median)),
        ]);
    }
    table
}

pub fn code_table(table_def: &CodeTable) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Code"), header_cell(table_def.name)]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (code, label) in table_def.entries() {
        table.add_row(vec![Cell::new(code), Cell::new(label)]);
    }
    table
}

pub fn checkbox_table(group: &CheckboxGroup) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Spalte"), header_cell(group.name)]);
    apply_table_style(&mut table);
    for (code, label) in group.options() {
        table.add_row(vec![
            Cell::new(group.column_name(*code)),
            Cell::new(label),
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
