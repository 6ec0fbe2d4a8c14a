//! Core library for `image_sorter`.
//!
//! Walk a directory of images, mark each one for copying, moving or deletion,
//! then apply every pending decision in one pass. Destination names never
//! overwrite: a clash becomes `name (1).ext`, `name (2).ext` and so on.
//!
//! Modules:
//! - resolve: collision-free destination naming
//! - entry: one image and its pending disposition, plus commit
//! - keys: letter bindings and key dispatch
//! - scan: recursive image discovery
//! - session / console: the review loop
//! - fs_ops: durable copy, move and delete primitives
//! - config / cli / output / platform / shutdown: the surrounding application

pub mod cli;
pub mod config;
pub mod console;
pub mod entry;
pub mod errors;
pub mod fs_ops;
pub mod keys;
pub mod output;
pub mod platform;
pub mod resolve;
pub mod scan;
pub mod session;
pub mod shutdown;

pub use config::{
    CONFIG_ENV, Config, LogLevel, default_config_path, default_log_path,
    path_has_symlink_ancestor,
};
pub use entry::{CommitOptions, CommitReport, ImageEntry, Removal};
pub use errors::{CommitOp, SorterError};
pub use keys::{Destinations, Key, KeyOutcome, dispose_by_key};
pub use resolve::{DEFAULT_RESOLVE_LIMIT, PathResolver, Resolved};
pub use scan::{DEFAULT_IMAGE_EXTENSIONS, scan_images};
pub use session::{CommitSummary, Event, Session};
