//! Grammars for pulling structured fields out of model output.
//!
//! Each grammar is tolerant on its own; the choice between them is made per
//! mode in [`crate::parser`].

pub mod json;
pub mod lines;
pub mod tagged;
