//! Clausekit core: upload workflow state, file policy, and result derivations.

pub mod analysis;
pub mod badges;
pub mod error;
pub mod session;
pub mod validate;
pub mod view;
pub mod workflow;

pub use analysis::{AnalysisResult, Clause, ClauseId, Comparison, ComparisonStatus, Statistics};
pub use badges::{ConfidenceBadge, ScoreTone, StatusBadge};
pub use error::{SelectError, SubmitRefused, UploadError};
pub use session::{Phase, SessionState, UploadSession};
pub use validate::{CandidateError, CandidateFile, DocumentKind, Rejection, validate};
pub use view::{ClauseCard, ComparisonDetail, ExpansionSet, ResultsView, StatTile};
pub use workflow::{Analyzer, Submission, Workflow};
