//! Terminal rendering for sessions and results

use std::time::Duration;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use statement_session::{
    CellValue, FilePickerView, Phase, ResultView, SchemaEditorView, Session, SessionStatus,
    Transaction,
};

/// Create a spinner for the extraction call
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Failure line: red cross and message
pub fn format_error(message: &str) -> String {
    format!("{} {}", style("✗").red(), style(message).red())
}

/// One-line status: phase, file, columns and rows
pub fn format_status_bar(session: &Session) -> String {
    let status = SessionStatus::of(session);
    let picker = FilePickerView::of(session);

    let phase = match status.phase {
        Phase::Idle => style(status.phase_label).dim(),
        Phase::Submitting => style(status.phase_label).cyan(),
        Phase::Succeeded => style(status.phase_label).green(),
        Phase::Failed => style(status.phase_label).red(),
    };
    let file = match picker.summary() {
        Some(summary) => style(summary).white(),
        None => style("no file".to_string()).dim(),
    };
    let ready = if status.can_submit {
        style("ready").green()
    } else {
        style("not ready").yellow()
    };

    format!(
        "{} {}  {} {}  {} {}  {} {}  [{}]",
        style("Status:").bold(),
        phase,
        style("File:").bold(),
        file,
        style("Columns:").bold(),
        session.schema().len(),
        style("Rows:").bold(),
        status.row_count,
        ready,
    )
}

/// Column list with duplicate names flagged
pub fn print_columns(view: &SchemaEditorView<'_>) {
    if view.is_empty() {
        println!("  {}", style("No columns yet. Add at least one to extract.").dim());
        return;
    }

    let duplicates = view.duplicate_names();
    for (i, column) in view.columns.iter().enumerate() {
        let mut line = format!("  {}. {}", i + 1, column.name);
        if let Some(description) = &column.description {
            line.push_str(&format!(" {}", style(format!("({})", description)).dim()));
        }
        if duplicates.contains(&column.name.as_str()) {
            line.push_str(&format!(" {}", style("duplicate name").yellow()));
        }
        println!("{}", line);
    }
}

/// Extracted rows as a table, in schema column order
pub fn results_table(view: &ResultView<'_>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![header_cell("#")];
    header.extend(view.header().iter().map(|name| header_cell(name)));
    table.set_header(header);

    for (i, row) in view.rows.iter().enumerate() {
        let mut cells = vec![Cell::new(i + 1).fg(Color::DarkGrey)];
        for name in view.header() {
            cells.push(value_cell(row, name));
        }
        table.add_row(cells);
    }
    table
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .add_attribute(Attribute::Bold)
        .fg(Color::Cyan)
}

fn value_cell(row: &Transaction, name: &str) -> Cell {
    let cell = Cell::new(row.display(name));
    match row.get(name) {
        Some(CellValue::Number(_)) => cell.set_alignment(CellAlignment::Right),
        _ => cell,
    }
}
