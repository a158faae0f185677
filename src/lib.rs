// Plotweave: topic modeling for movie plots
//
// This is the library root. Each module corresponds to a stage of the
// pipeline: corpus -> text (tokens, DTM) -> lda -> selection / summary,
// with output and pipeline wiring them together for the CLI.

pub mod config;
pub mod corpus;
pub mod error;
pub mod lda;
pub mod math;
pub mod output;
pub mod pipeline;
pub mod selection;
pub mod summary;
pub mod text;

pub use error::TopicModelError;
