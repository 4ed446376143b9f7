//! Main interactive menu loop

use anyhow::Result;
use console::style;
use dialoguer::{Input, MultiSelect, Select};
use statement_session::{
    Document, Phase, ResultView, SchemaEditorView, SelectionError, Session,
};
use std::path::{Path, PathBuf};

use crate::cmd::extract::{default_export_path, run_submission, save_csv};
use crate::cmd::suggest::fetch_suggestions;
use crate::context::AppContext;
use crate::render::{format_status_bar, print_columns, results_table};

use super::menu::{available_actions, MenuAction};

/// Run the interactive menu over one session
pub async fn run_interactive(ctx: &AppContext, initial_file: Option<PathBuf>) -> Result<()> {
    let mut session = ctx.new_session();

    if !ctx.quiet {
        println!();
        println!("{}", style("Bank Statement Extractor").bold());
    }

    if let Some(path) = initial_file {
        select_file(ctx, &mut session, &path);
    }

    loop {
        if !ctx.quiet {
            println!();
            println!("{}", format_status_bar(&session));
            println!();
        }

        let actions = available_actions(&session);
        let labels: Vec<String> = actions.iter().map(|a| a.label(&session)).collect();

        let choice = Select::with_theme(&ctx.theme())
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match actions[choice] {
            MenuAction::SelectFile => {
                let path: String = Input::with_theme(&ctx.theme())
                    .with_prompt("Path to PDF statement")
                    .interact_text()?;
                select_file(ctx, &mut session, Path::new(path.trim()));
            }
            MenuAction::ClearFile => {
                session.clear_file();
                ctx.print_info("File cleared.");
            }
            MenuAction::TogglePreview => {
                session.toggle_view();
                print_preview(&session);
            }
            MenuAction::OpenPreview => open_preview(ctx, &session),
            MenuAction::AddColumn => add_column(ctx, &mut session)?,
            MenuAction::AddSuggestedColumns => add_suggested_columns(ctx, &mut session).await?,
            MenuAction::RemoveColumn => remove_column(ctx, &mut session)?,
            MenuAction::Extract => extract(ctx, &mut session).await?,
            MenuAction::ShowResults => show_results(&session),
            MenuAction::ExportCsv => export(ctx, &session)?,
            MenuAction::Exit => {
                println!("{}", style("👋 Goodbye!").blue());
                break;
            }
        }
    }

    Ok(())
}

/// Select a file, reporting rejections inline
fn select_file(ctx: &AppContext, session: &mut Session, path: &Path) {
    let document = match Document::from_path(path) {
        Ok(document) => document,
        Err(e) => {
            ctx.print_warning(&format!("Could not read {}: {}", path.display(), e));
            return;
        }
    };

    match session.select_file(document) {
        Ok(file) => ctx.print_success(&format!(
            "Selected {} ({:.2} MB)",
            file.document().file_name(),
            file.document().size_mb()
        )),
        Err(SelectionError::UnsupportedType { .. }) => {
            ctx.print_warning("Please upload a PDF file.");
        }
        Err(e) => ctx.print_warning(&e.to_string()),
    }
}

fn print_preview(session: &Session) {
    match session.file() {
        Some(file) if session.is_expanded() => {
            println!(
                "  {} {}",
                style("Preview:").bold(),
                file.preview().location().display()
            );
        }
        _ => println!("  {}", style("Preview hidden").dim()),
    }
}

fn open_preview(ctx: &AppContext, session: &Session) {
    let Some(file) = session.file() else {
        return;
    };
    let location = file.preview().location();
    if let Err(e) = open::that(location) {
        ctx.print_warning(&format!("Could not open {}: {}", location.display(), e));
    }
}

fn add_column(ctx: &AppContext, session: &mut Session) -> Result<()> {
    let name: String = Input::with_theme(&ctx.theme())
        .with_prompt("Column name")
        .allow_empty(true)
        .interact_text()?;

    match session.add_column(&name) {
        Ok(_) => print_columns(&SchemaEditorView::of(session)),
        Err(e) => ctx.print_warning(&format!("{}", e)),
    }
    Ok(())
}

async fn add_suggested_columns(ctx: &AppContext, session: &mut Session) -> Result<()> {
    let bank: String = Input::with_theme(&ctx.theme())
        .with_prompt("Bank name (leave empty for generic columns)")
        .allow_empty(true)
        .interact_text()?;

    let suggestions = match fetch_suggestions(ctx, Some(bank.as_str())).await {
        Ok(suggestions) => suggestions,
        Err(e) => {
            ctx.print_warning(&format!("{:#}", e));
            return Ok(());
        }
    };

    let existing = session.schema().column_names();
    let candidates: Vec<&String> = suggestions
        .columns()
        .iter()
        .filter(|name| !existing.contains(&name.as_str()))
        .collect();
    if candidates.is_empty() {
        ctx.print_info("All suggested columns are already in the schema.");
        return Ok(());
    }

    let picked = MultiSelect::with_theme(&ctx.theme())
        .with_prompt("Columns to add (space to toggle)")
        .items(&candidates)
        .defaults(&vec![true; candidates.len()])
        .interact()?;

    let names: Vec<String> = picked.into_iter().map(|i| candidates[i].clone()).collect();
    for name in names {
        if let Err(e) = session.add_column(&name) {
            ctx.print_warning(&format!("Skipped '{}': {}", name, e));
        }
    }
    print_columns(&SchemaEditorView::of(session));
    Ok(())
}

fn remove_column(ctx: &AppContext, session: &mut Session) -> Result<()> {
    let view = SchemaEditorView::of(session);
    let labels: Vec<&str> = view.columns.iter().map(|c| c.name.as_str()).collect();

    let choice = Select::with_theme(&ctx.theme())
        .with_prompt("Remove which column?")
        .items(&labels)
        .default(0)
        .interact()?;

    let id = view.columns[choice].id.clone();
    session.remove_column(&id);
    print_columns(&SchemaEditorView::of(session));
    Ok(())
}

async fn extract(ctx: &AppContext, session: &mut Session) -> Result<()> {
    if !run_submission(ctx, session).await? {
        return Ok(());
    }

    match session.phase() {
        Phase::Succeeded => {
            ctx.print_success(&format!("Extracted {} transaction(s)", session.rows().len()));
            show_results(session);
        }
        _ => {
            if let Some(message) = session.error_message() {
                ctx.print_error(&message);
            }
        }
    }
    Ok(())
}

fn show_results(session: &Session) {
    let view = ResultView::of(session);
    if view.is_empty() {
        println!("  {}", style("No transactions found.").dim());
    } else {
        println!("{}", results_table(&view));
    }
}

fn export(ctx: &AppContext, session: &Session) -> Result<()> {
    let default = default_export_path().display().to_string();
    let path: String = Input::with_theme(&ctx.theme())
        .with_prompt("Save CSV to")
        .default(default)
        .interact_text()?;
    let path = PathBuf::from(path.trim());

    match save_csv(ctx, session, &path) {
        Ok(true) => ctx.print_success(&format!("Saved CSV to {}", path.display())),
        Ok(false) => {}
        Err(e) => ctx.print_warning(&format!("{:#}", e)),
    }
    Ok(())
}
