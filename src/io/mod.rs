//! Project persistence

pub mod project_file;

pub use project_file::{load_project, save_project, FORMAT_VERSION};
