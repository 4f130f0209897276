//! Domain model (ids, artifacts, submissions, state, errors).

pub mod artifact;
pub mod errors;
pub mod ids;
pub mod state;
pub mod submission;

pub use artifact::Artifact;
pub use errors::{ErrorKind, MaterializeError, RenderError, RetrieveError, SubmitError};
pub use ids::{JobId, ParseJobIdError};
pub use state::JobState;
pub use submission::{AttachmentSpec, Submission, collect_attachments};
