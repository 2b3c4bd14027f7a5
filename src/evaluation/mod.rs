//! Route evaluation helpers shared by the optimizer and the orchestrator.

mod path;

pub use path::{fitness, is_path_reachable, path_distance};
