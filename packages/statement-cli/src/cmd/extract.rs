//! One-shot extraction and the shared submission runner

use anyhow::{anyhow, Context, Result};
use statement_session::{
    Completion, Document, GatewayError, Phase, ResultView, Session, DEFAULT_EXPORT_FILE_NAME,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::context::AppContext;
use crate::render::{create_spinner, results_table};

/// Submit the session's file and schema and wait for the outcome.
///
/// The gateway call runs on its own task behind a spinner. Returns whether a
/// submission was accepted; the outcome itself lands in the session.
pub async fn run_submission(ctx: &AppContext, session: &mut Session) -> Result<bool> {
    let Some(submission) = session.begin_submission() else {
        return Ok(false);
    };
    let id = submission.id();

    let spinner = create_spinner(&format!(
        "Extracting transactions from {}...",
        submission.document().file_name()
    ));
    let gateway = ctx.gateway();
    let task = tokio::spawn(async move { submission.run(gateway.as_ref()).await });

    let completion = match task.await {
        Ok(completion) => completion,
        Err(e) => {
            tracing::error!(error = %e, "Extraction task failed");
            Completion::new(
                id,
                Err(GatewayError::NetworkFailure(format!("extraction task failed: {}", e))),
            )
        }
    };
    spinner.finish_and_clear();

    Ok(session.complete(completion))
}

/// Write the session's current rows as CSV.
pub fn export_csv(session: &Session, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    ResultView::of(session)
        .write_csv(BufWriter::new(file))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Export to `path`, asking before replacing an existing file.
///
/// Returns whether the file was written. A declined overwrite, including the
/// quiet-mode default, leaves the file as it was and says so.
pub fn save_csv(ctx: &AppContext, session: &Session, path: &Path) -> Result<bool> {
    if path.exists() && !ctx.confirm(&format!("{} exists. Overwrite?", path.display()), false)? {
        ctx.print_warning(&format!("{} left untouched.", path.display()));
        return Ok(false);
    }
    export_csv(session, path)?;
    Ok(true)
}

/// Default export path: `bank_transactions.csv` in the working directory.
pub fn default_export_path() -> PathBuf {
    PathBuf::from(DEFAULT_EXPORT_FILE_NAME)
}

/// `statements extract FILE --column NAME...`
pub async fn extract(
    ctx: &AppContext,
    file: &Path,
    columns: &[String],
    output: Option<&Path>,
) -> Result<()> {
    let mut session = ctx.new_session();

    for name in columns {
        session
            .add_column(name)
            .with_context(|| format!("Invalid column name '{}'", name))?;
    }

    let document = Document::from_path(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    session.select_file(document)?;

    if !run_submission(ctx, &mut session).await? {
        return Err(anyhow!("Nothing to extract: add at least one column"));
    }

    match session.phase() {
        Phase::Succeeded => {
            let view = ResultView::of(&session);
            if view.is_empty() {
                ctx.print_warning("No transactions found in this statement.");
            } else {
                println!("{}", results_table(&view));
            }
            ctx.print_success(&format!("Extracted {} transaction(s)", view.rows.len()));

            if let Some(path) = output {
                export_csv(&session, path)?;
                ctx.print_info(&format!("Saved CSV to {}", path.display()));
            }
            Ok(())
        }
        _ => {
            let message = session
                .error_message()
                .unwrap_or_else(|| "Extraction did not complete".to_string());
            ctx.print_error(&message);
            Err(anyhow!(
                "Extraction failed: {}",
                session
                    .last_error()
                    .map(ToString::to_string)
                    .unwrap_or(message)
            ))
        }
    }
}
