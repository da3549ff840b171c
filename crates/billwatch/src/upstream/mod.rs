//! HTTP implementations of the upstream collaborators.

mod openai;
mod openstates;

pub use openai::OpenAiSummarizer;
pub use openstates::OpenStatesClient;
