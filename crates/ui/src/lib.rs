//! Presentation-free view models for the quiz front-ends.

pub mod vm;
