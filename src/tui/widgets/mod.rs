//! Reusable overlay widgets

pub mod prompt;
