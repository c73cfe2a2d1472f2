//! Single-flight submission: ties an [`UploadSession`] to an [`Analyzer`].
//!
//! Everything runs on one task. The session is borrowed only between await
//! points, so a second `submit` issued while the first is suspended sees the
//! `Uploading` state and returns without sending anything.

use std::cell::{Ref, RefCell};

use async_trait::async_trait;
use tracing::debug;

use crate::analysis::AnalysisResult;
use crate::error::{SubmitRefused, UploadError};
use crate::session::UploadSession;
use crate::validate::CandidateFile;

/// The remote analysis boundary: send one file, get one result.
#[async_trait(?Send)]
pub trait Analyzer {
    async fn analyze(&self, file: &CandidateFile) -> Result<AnalysisResult, UploadError>;
}

#[async_trait(?Send)]
impl<A: Analyzer + ?Sized> Analyzer for &A {
    async fn analyze(&self, file: &CandidateFile) -> Result<AnalysisResult, UploadError> {
        (**self).analyze(file).await
    }
}

/// How a call to [`Workflow::submit`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Nothing was sent.
    Skipped(SubmitRefused),
    Succeeded,
    Failed(UploadError),
}

pub struct Workflow<A> {
    session: RefCell<UploadSession>,
    analyzer: A,
}

impl<A: Analyzer> Workflow<A> {
    pub fn new(analyzer: A) -> Self {
        Self {
            session: RefCell::new(UploadSession::new()),
            analyzer,
        }
    }

    pub fn session(&self) -> Ref<'_, UploadSession> {
        self.session.borrow()
    }

    /// Apply a synchronous user action (select, toggle, reset, drag events).
    pub fn update<R>(&self, f: impl FnOnce(&mut UploadSession) -> R) -> R {
        f(&mut self.session.borrow_mut())
    }

    /// Upload the selected file and record the outcome in the session.
    pub async fn submit(&self) -> Submission {
        let file = match self.session.borrow_mut().begin_upload() {
            Ok(file) => file,
            Err(refused) => {
                debug!(reason = %refused, "submit skipped");
                return Submission::Skipped(refused);
            }
        };

        let outcome = self.analyzer.analyze(&file).await;
        let submission = match &outcome {
            Ok(_) => Submission::Succeeded,
            Err(err) => Submission::Failed(err.clone()),
        };
        self.session.borrow_mut().finish_upload(outcome);
        submission
    }
}
