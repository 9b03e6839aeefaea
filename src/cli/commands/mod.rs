//! One module per subcommand.

pub mod backup;
pub mod completions;
pub mod delete;
pub mod info;
pub mod list;
pub mod save;
pub mod show;
