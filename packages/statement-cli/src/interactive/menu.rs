//! Menu actions offered for the current session state

use statement_session::{ResultView, Session};

/// Actions that can be performed from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    // File
    SelectFile,
    ClearFile,
    TogglePreview,
    OpenPreview,
    // Columns
    AddColumn,
    AddSuggestedColumns,
    RemoveColumn,
    // Extraction
    Extract,
    ShowResults,
    ExportCsv,
    Exit,
}

impl MenuAction {
    /// Display label; some depend on the session state
    pub fn label(&self, session: &Session) -> String {
        match self {
            Self::SelectFile if session.file().is_some() => "📄 Replace statement PDF".into(),
            Self::SelectFile => "📄 Select statement PDF".into(),
            Self::ClearFile => "🗑  Clear file".into(),
            Self::TogglePreview if session.is_expanded() => "🔽 Hide preview".into(),
            Self::TogglePreview => "🔼 Show preview".into(),
            Self::OpenPreview => "👁  Open preview in viewer".into(),
            Self::AddColumn => "➕ Add column".into(),
            Self::AddSuggestedColumns => "💡 Add suggested columns".into(),
            Self::RemoveColumn => "➖ Remove column".into(),
            Self::Extract => "🚀 Extract transactions".into(),
            Self::ShowResults => "📊 Show results".into(),
            Self::ExportCsv => "💾 Export CSV".into(),
            Self::Exit => "🛑 Exit".into(),
        }
    }
}

/// Actions available right now, in display order.
///
/// Extraction is only offered when the session can submit, so the control
/// is hidden instead of failing.
pub fn available_actions(session: &Session) -> Vec<MenuAction> {
    let has_file = session.file().is_some();
    let results = ResultView::of(session);

    let mut actions = Vec::new();
    if session.can_submit() {
        actions.push(MenuAction::Extract);
    }
    actions.push(MenuAction::SelectFile);
    if has_file {
        actions.push(MenuAction::ClearFile);
        actions.push(MenuAction::TogglePreview);
    }
    if has_file && session.is_expanded() {
        actions.push(MenuAction::OpenPreview);
    }
    actions.push(MenuAction::AddColumn);
    actions.push(MenuAction::AddSuggestedColumns);
    if !session.schema().is_empty() {
        actions.push(MenuAction::RemoveColumn);
    }
    if !results.is_empty() {
        actions.push(MenuAction::ShowResults);
    }
    if results.can_export() {
        actions.push(MenuAction::ExportCsv);
    }
    actions.push(MenuAction::Exit);
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use statement_session::testing::{pdf_document, RecordingPreviews};
    use std::sync::Arc;

    fn session() -> Session {
        Session::new(Arc::new(RecordingPreviews::new()))
    }

    #[test]
    fn test_fresh_session_offers_setup_only() {
        let actions = available_actions(&session());
        assert_eq!(
            actions,
            vec![
                MenuAction::SelectFile,
                MenuAction::AddColumn,
                MenuAction::AddSuggestedColumns,
                MenuAction::Exit,
            ]
        );
    }

    #[test]
    fn test_extract_offered_exactly_when_submittable() {
        let mut session = session();
        session.add_column("Date").unwrap();
        assert!(!available_actions(&session).contains(&MenuAction::Extract));

        session.select_file(pdf_document("a.pdf")).unwrap();
        assert!(available_actions(&session).contains(&MenuAction::Extract));

        session.begin_submission().unwrap();
        assert!(!available_actions(&session).contains(&MenuAction::Extract));
    }

    #[test]
    fn test_open_preview_only_when_expanded() {
        let mut session = session();
        session.select_file(pdf_document("a.pdf")).unwrap();
        assert!(!available_actions(&session).contains(&MenuAction::OpenPreview));

        session.toggle_view();
        assert!(available_actions(&session).contains(&MenuAction::OpenPreview));
        assert_eq!(MenuAction::TogglePreview.label(&session), "🔽 Hide preview");
    }
}
