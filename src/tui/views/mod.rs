//! Views of the editor

pub mod canvas;
