//! Cross-step tests for the cleaning pipeline.

mod pipeline;
mod properties;
