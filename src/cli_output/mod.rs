//! CLI output utilities for plain, separator-framed terminal output.

mod boxes;

pub use boxes::*;
