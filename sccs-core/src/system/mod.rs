pub mod parallel;
pub mod paths;

pub use parallel::{configure_thread_pool, resolve_threads, should_parallelize};
pub use paths::{default_config_path, describe_paths, sccs_home};
