use std::collections::BTreeMap;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use hcard_model::{BatchResult, CollisionResolution, FailureReason};

use crate::commands::{NormalizeOutcome, RenderOutcome};

pub fn print_render_summary(outcome: &RenderOutcome) {
    let result = &outcome.result;
    if outcome.dry_run {
        println!("Dry run: no files written");
    }
    println!("Output: {}", outcome.output_dir.display());
    println!("Renderer: {}", outcome.renderer);
    for path in &outcome.interchange {
        println!("Records: {}", path.display());
    }
    if let Some(path) = &outcome.report {
        println!("Report: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Attempted"),
        header_cell("Succeeded"),
        header_cell("Failed"),
        header_cell("Files"),
        header_cell("Collisions"),
        header_cell("Diagnostics"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 0..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(result.attempted).add_attribute(Attribute::Bold),
        count_cell(result.succeeded, Color::Green),
        count_cell(result.failed, Color::Red),
        Cell::new(result.unique_artifact_count()),
        count_cell(result.collisions.len(), Color::Yellow),
        count_cell(result.diagnostics.len(), Color::Yellow),
    ]);
    println!("{table}");

    print_failure_table(result);
    print_collision_table(result);
    print_diagnostic_table(result);
}

pub fn print_normalize_summary(outcome: &NormalizeOutcome) {
    // stdout may be carrying the records themselves.
    if let Some(path) = &outcome.output {
        eprintln!("Records: {} -> {}", outcome.records, path.display());
    } else {
        eprintln!("Records: {}", outcome.records);
    }
    if !outcome.unmatched_keys.is_empty() {
        let keys: Vec<&str> = outcome.unmatched_keys.iter().map(String::as_str).collect();
        eprintln!("Unmatched headers: {}", keys.join(", "));
    }
    if outcome.issues.is_empty() {
        return;
    }
    let mut grouped: BTreeMap<(&str, String), usize> = BTreeMap::new();
    for (_, issue) in &outcome.issues {
        *grouped
            .entry((issue.field.as_str(), issue.error.to_string()))
            .or_default() += 1;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Problem"),
        header_cell("Count"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for ((field, message), count) in grouped {
        table.add_row(vec![
            field_cell(field),
            Cell::new(message),
            count_cell(count, Color::Yellow),
        ]);
    }
    eprintln!("Set aside:");
    eprintln!("{table}");
}

fn print_failure_table(result: &BatchResult) {
    if result.failures.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Record"),
        header_cell("Reason"),
        header_cell("Detail"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Center);
    for failure in &result.failures {
        table.add_row(vec![
            dim_cell(failure.index + 1),
            Cell::new(&failure.record_id),
            reason_cell(failure.reason),
            Cell::new(&failure.detail),
        ]);
    }
    println!();
    println!("Failures:");
    println!("{table}");
}

fn print_collision_table(result: &BatchResult) {
    if result.collisions.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Name"),
        header_cell("First row"),
        header_cell("Row"),
        header_cell("Resolution"),
        header_cell("Written to"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for collision in &result.collisions {
        let resolution = match collision.resolution {
            CollisionResolution::Overwritten => Cell::new("overwritten").fg(Color::Yellow),
            CollisionResolution::Suffixed => Cell::new("suffixed").fg(Color::Green),
        };
        table.add_row(vec![
            Cell::new(&collision.artifact),
            dim_cell(collision.first_index + 1),
            Cell::new(collision.index + 1),
            resolution,
            Cell::new(collision.written_to.display()),
        ]);
    }
    println!();
    println!("Name collisions:");
    println!("{table}");
}

fn print_diagnostic_table(result: &BatchResult) {
    if result.diagnostics.is_empty() {
        return;
    }
    let mut grouped: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for diagnostic in &result.diagnostics {
        let field = diagnostic.field.map_or("-", |field| field.as_str());
        *grouped
            .entry((field, diagnostic.message.as_str()))
            .or_default() += 1;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Problem"),
        header_cell("Records"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for ((field, message), count) in grouped {
        table.add_row(vec![
            field_cell(field),
            Cell::new(message),
            count_cell(count, Color::Yellow),
        ]);
    }
    println!();
    println!("Values set aside (shown as the placeholder):");
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn reason_cell(reason: FailureReason) -> Cell {
    let cell = Cell::new(reason.as_str());
    match reason {
        FailureReason::MissingIdentity => cell.fg(Color::Yellow),
        FailureReason::Timeout => cell.fg(Color::Magenta),
        FailureReason::Normalize
        | FailureReason::Layout
        | FailureReason::Render
        | FailureReason::Write => cell.fg(Color::Red).add_attribute(Attribute::Bold),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn field_cell(field: &str) -> Cell {
    Cell::new(field)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
