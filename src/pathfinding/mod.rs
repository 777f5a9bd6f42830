//! Route search over walk masks

pub mod router;
pub mod types;
pub mod worker;

pub use router::{find_path, path_length, GridRouter};
pub use types::{CancelToken, RouteOutcome, RouterConfig, SearchStatus};
pub use worker::RouteWorker;
