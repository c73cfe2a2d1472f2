//! Upload state machine.
//!
//! ```text
//! Idle ──select──▶ FileSelected ──begin_upload──▶ Uploading ──ok──▶ Succeeded
//!  ▲                   │  ▲                            │                │
//!  │                   └──┘ select (replace)           │ err            │
//!  └──────────────────── reset / rejected select ◀─────┴────────────────┘
//! ```
//!
//! The candidate file moves into [`SessionState::Uploading`] when an upload
//! starts and is dropped when it finishes, whatever the outcome. A failed
//! upload lands in `Idle` with the error message set, so the user reselects.

use tracing::{debug, info, warn};

use crate::analysis::{AnalysisResult, ClauseId};
use crate::error::{SelectError, SubmitRefused, UploadError};
use crate::validate::{self, CandidateFile, DocumentKind};
use crate::view::ResultsView;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Idle,
    FileSelected(CandidateFile),
    /// Holds the file being sent. Only one upload is ever in flight.
    Uploading(CandidateFile),
    Succeeded(ResultsView),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    FileSelected,
    Uploading,
    Succeeded,
}

#[derive(Debug, Clone, Default)]
pub struct UploadSession {
    state: SessionState,
    error: Option<String>,
    drag_active: bool,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            SessionState::Idle => Phase::Idle,
            SessionState::FileSelected(_) => Phase::FileSelected,
            SessionState::Uploading(_) => Phase::Uploading,
            SessionState::Succeeded(_) => Phase::Succeeded,
        }
    }

    /// The selected file waiting to be submitted.
    pub fn candidate(&self) -> Option<&CandidateFile> {
        match &self.state {
            SessionState::FileSelected(file) => Some(file),
            _ => None,
        }
    }

    /// The file currently being uploaded.
    pub fn in_flight(&self) -> Option<&CandidateFile> {
        match &self.state {
            SessionState::Uploading(file) => Some(file),
            _ => None,
        }
    }

    pub fn results(&self) -> Option<&ResultsView> {
        match &self.state {
            SessionState::Succeeded(view) => Some(view),
            _ => None,
        }
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.state, SessionState::Uploading(_))
    }

    /// The message currently shown to the user, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a drag is hovering over the drop target.
    pub fn drag_active(&self) -> bool {
        self.drag_active
    }

    /// Pick a file, replacing any earlier candidate or displayed result.
    ///
    /// A rejected file clears the previous candidate too and leaves the
    /// rejection message as the current error. Ignored while uploading.
    pub fn select(&mut self, file: CandidateFile) -> Result<DocumentKind, SelectError> {
        if self.is_uploading() {
            warn!(file = %file.name, "selection ignored: upload in progress");
            return Err(SelectError::UploadInFlight);
        }
        match validate::validate(&file) {
            Ok(kind) => {
                info!(file = %file.name, bytes = file.byte_size, ?kind, "file selected");
                self.state = SessionState::FileSelected(file);
                self.error = None;
                Ok(kind)
            }
            Err(rejection) => {
                info!(file = %file.name, reason = %rejection, "file rejected");
                self.state = SessionState::Idle;
                self.error = Some(rejection.to_string());
                Err(rejection.into())
            }
        }
    }

    /// Start uploading the selected file.
    ///
    /// Returns the file to send. Refuses while another upload is in flight,
    /// and sets the error message when nothing is selected.
    pub fn begin_upload(&mut self) -> Result<CandidateFile, SubmitRefused> {
        match std::mem::take(&mut self.state) {
            SessionState::FileSelected(file) => {
                info!(file = %file.name, "upload started");
                self.state = SessionState::Uploading(file.clone());
                self.error = None;
                Ok(file)
            }
            state @ SessionState::Uploading(_) => {
                self.state = state;
                debug!("submit ignored: upload already in flight");
                Err(SubmitRefused::InFlight)
            }
            state => {
                self.state = state;
                let refused = SubmitRefused::NoFile;
                self.error = Some(refused.to_string());
                Err(refused)
            }
        }
    }

    /// Record how the in-flight upload ended.
    ///
    /// Success shows the result with every clause collapsed. Failure drops
    /// the file and shows the error. Ignored when nothing is in flight.
    pub fn finish_upload(&mut self, outcome: Result<AnalysisResult, UploadError>) {
        if !self.is_uploading() {
            warn!("upload outcome ignored: nothing in flight");
            return;
        }
        match outcome {
            Ok(result) => {
                info!(
                    file = %result.filename,
                    clauses = result.clauses.len(),
                    "upload succeeded"
                );
                self.state = SessionState::Succeeded(ResultsView::new(result));
                self.error = None;
            }
            Err(err) => {
                warn!(error = %err, "upload failed, file cleared");
                self.state = SessionState::Idle;
                self.error = Some(err.to_string());
            }
        }
    }

    /// Back to `Idle` with no file, result or error. Ignored while uploading.
    pub fn reset(&mut self) -> bool {
        if self.is_uploading() {
            debug!("reset ignored: upload in progress");
            return false;
        }
        self.state = SessionState::Idle;
        self.error = None;
        debug!("session reset");
        true
    }

    /// Expand or collapse one clause of the displayed result.
    pub fn toggle(&mut self, id: ClauseId) -> bool {
        match &mut self.state {
            SessionState::Succeeded(view) => view.toggle(id),
            _ => false,
        }
    }

    pub fn results_mut(&mut self) -> Option<&mut ResultsView> {
        match &mut self.state {
            SessionState::Succeeded(view) => Some(view),
            _ => None,
        }
    }

    pub fn drag_enter(&mut self) {
        self.drag_active = true;
    }

    pub fn drag_over(&mut self) {
        self.drag_active = true;
    }

    pub fn drag_leave(&mut self) {
        self.drag_active = false;
    }

    /// Handle a drop: only the first file counts, the rest are ignored.
    ///
    /// Returns `None` when the drop carried no files.
    pub fn drop_files<I>(&mut self, files: I) -> Option<Result<DocumentKind, SelectError>>
    where
        I: IntoIterator<Item = CandidateFile>,
    {
        self.drag_active = false;
        let mut files = files.into_iter();
        let first = files.next()?;
        let ignored = files.count();
        if ignored > 0 {
            debug!(ignored, "extra dropped files ignored");
        }
        Some(self.select(first))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NO_FILE_SELECTED, UPLOAD_FAILED};
    use crate::validate::Rejection;
    use crate::view::tests::sample_result;

    const MIB: u64 = 1024 * 1024;

    fn pdf(name: &str) -> CandidateFile {
        CandidateFile::new(name, 2 * MIB, "application/pdf")
    }

    fn uploaded(session: &mut UploadSession) {
        session.select(pdf("a.pdf")).unwrap();
        session.begin_upload().unwrap();
        session.finish_upload(Ok(sample_result()));
    }

    #[test]
    fn starts_idle() {
        let session = UploadSession::new();
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.candidate().is_none());
        assert!(session.results().is_none());
        assert!(session.error().is_none());
        assert!(!session.drag_active());
    }

    #[test]
    fn valid_selection_clears_error() {
        let mut session = UploadSession::new();
        session.begin_upload().unwrap_err();
        assert_eq!(session.error(), Some(NO_FILE_SELECTED));

        assert_eq!(session.select(pdf("a.pdf")), Ok(DocumentKind::Pdf));
        assert_eq!(session.phase(), Phase::FileSelected);
        assert_eq!(session.candidate().map(|f| f.name.as_str()), Some("a.pdf"));
        assert!(session.error().is_none());
    }

    #[test]
    fn reselect_replaces_candidate() {
        let mut session = UploadSession::new();
        session.select(pdf("a.pdf")).unwrap();
        session
            .select(CandidateFile::new("b.png", MIB, "image/png"))
            .unwrap();
        assert_eq!(session.candidate().map(|f| f.name.as_str()), Some("b.png"));
    }

    #[test]
    fn oversized_png_rejected_before_any_upload() {
        let mut session = UploadSession::new();
        let big = CandidateFile::new("scan.png", 60 * MIB, "image/png");

        let err = session.select(big).unwrap_err();
        assert!(matches!(
            err,
            SelectError::Rejected(Rejection::SizeExceeded { .. })
        ));
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.error(), Some("File size must be less than 50MB"));

        // Still selectable afterwards.
        session.select(pdf("a.pdf")).unwrap();
        assert_eq!(session.phase(), Phase::FileSelected);
        assert!(session.error().is_none());
    }

    #[test]
    fn rejection_drops_previous_candidate() {
        let mut session = UploadSession::new();
        session.select(pdf("a.pdf")).unwrap();
        session
            .select(CandidateFile::new("notes.txt", 10, "text/plain"))
            .unwrap_err();
        assert!(session.candidate().is_none());
        assert_eq!(
            session.error(),
            Some("Please upload a PDF or image file (PNG, JPG, JPEG)")
        );
    }

    #[test]
    fn submit_without_file() {
        let mut session = UploadSession::new();
        assert_eq!(session.begin_upload(), Err(SubmitRefused::NoFile));
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.error(), Some(NO_FILE_SELECTED));
    }

    #[test]
    fn begin_upload_moves_candidate_in_flight() {
        let mut session = UploadSession::new();
        session.select(pdf("a.pdf")).unwrap();
        let file = session.begin_upload().unwrap();
        assert_eq!(file.name, "a.pdf");
        assert_eq!(session.phase(), Phase::Uploading);
        assert!(session.candidate().is_none());
        assert_eq!(session.in_flight(), Some(&file));
    }

    #[test]
    fn second_submit_while_uploading_is_refused() {
        let mut session = UploadSession::new();
        session.select(pdf("a.pdf")).unwrap();
        session.begin_upload().unwrap();
        assert_eq!(session.begin_upload(), Err(SubmitRefused::InFlight));
        assert_eq!(session.phase(), Phase::Uploading);
        assert!(session.error().is_none());
    }

    #[test]
    fn select_and_reset_ignored_while_uploading() {
        let mut session = UploadSession::new();
        session.select(pdf("a.pdf")).unwrap();
        session.begin_upload().unwrap();

        assert_eq!(session.select(pdf("b.pdf")), Err(SelectError::UploadInFlight));
        assert!(!session.reset());
        assert_eq!(session.in_flight().map(|f| f.name.as_str()), Some("a.pdf"));
    }

    #[test]
    fn success_shows_result_and_discards_file() {
        let mut session = UploadSession::new();
        uploaded(&mut session);

        assert_eq!(session.phase(), Phase::Succeeded);
        assert!(session.candidate().is_none());
        assert!(session.in_flight().is_none());
        let view = session.results().unwrap();
        assert_eq!(view.cards().count(), 3);
        assert_eq!(view.stat_tiles()[0].label, "Clauses Found");
        assert_eq!(view.stat_tiles()[0].value, "3");
        assert!(view.expanded().is_empty());
    }

    #[test]
    fn failure_clears_file_and_sets_message() {
        let mut session = UploadSession::new();
        session.select(pdf("a.pdf")).unwrap();
        session.begin_upload().unwrap();
        session.finish_upload(Err(UploadError::Service(
            "Could not extract text from document".into(),
        )));

        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.candidate().is_none());
        assert_eq!(
            session.error(),
            Some("Could not extract text from document")
        );
    }

    #[test]
    fn generic_failure_message() {
        let mut session = UploadSession::new();
        session.select(pdf("a.pdf")).unwrap();
        session.begin_upload().unwrap();
        session.finish_upload(Err(UploadError::Failed));
        assert_eq!(session.error(), Some(UPLOAD_FAILED));
    }

    #[test]
    fn finish_without_upload_is_ignored() {
        let mut session = UploadSession::new();
        session.finish_upload(Ok(sample_result()));
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.results().is_none());
    }

    #[test]
    fn reset_after_success_clears_everything() {
        let mut session = UploadSession::new();
        uploaded(&mut session);
        assert!(session.toggle(ClauseId(1)));

        assert!(session.reset());
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.candidate().is_none());
        assert!(session.results().is_none());
        assert!(session.error().is_none());

        // A new result starts fully collapsed.
        uploaded(&mut session);
        assert!(session.results().unwrap().expanded().is_empty());
    }

    #[test]
    fn selecting_after_success_clears_result() {
        let mut session = UploadSession::new();
        uploaded(&mut session);
        session.select(pdf("b.pdf")).unwrap();
        assert!(session.results().is_none());
        assert_eq!(session.phase(), Phase::FileSelected);
    }

    #[test]
    fn toggle_outside_results_does_nothing() {
        let mut session = UploadSession::new();
        assert!(!session.toggle(ClauseId(1)));
    }

    #[test]
    fn drag_flag_follows_events() {
        let mut session = UploadSession::new();
        session.drag_enter();
        assert!(session.drag_active());
        session.drag_over();
        assert!(session.drag_active());
        session.drag_leave();
        assert!(!session.drag_active());
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn drop_selects_first_file_only() {
        let mut session = UploadSession::new();
        session.drag_enter();
        let outcome = session.drop_files(vec![
            pdf("first.pdf"),
            CandidateFile::new("second.png", MIB, "image/png"),
        ]);
        assert_eq!(outcome, Some(Ok(DocumentKind::Pdf)));
        assert!(!session.drag_active());
        assert_eq!(
            session.candidate().map(|f| f.name.as_str()),
            Some("first.pdf")
        );
    }

    #[test]
    fn empty_drop_only_clears_flag() {
        let mut session = UploadSession::new();
        session.select(pdf("a.pdf")).unwrap();
        session.drag_over();
        assert_eq!(session.drop_files(Vec::new()), None);
        assert!(!session.drag_active());
        assert_eq!(session.phase(), Phase::FileSelected);
    }
}
