//! Feature alignment and probability scoring for loan applications.
//!
//! The [`assessment`] module holds the domain: raw applicant records, the schema reconciler
//! that aligns them with a trained model's feature list, the scorer, and the presentation
//! policy applied to the resulting probability. [`config`], [`error`], and [`telemetry`]
//! carry the service plumbing shared with the API binary.

pub mod assessment;
pub mod config;
pub mod error;
pub mod telemetry;
