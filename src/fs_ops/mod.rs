//! Filesystem operations used when committing a disposition.

mod atomic;
mod copy;
mod file_move;
mod helpers;
mod io_copy;
mod meta;
mod util;

pub use copy::safe_copy_and_rename_with_metadata;
pub use file_move::{delete_file, move_file};
