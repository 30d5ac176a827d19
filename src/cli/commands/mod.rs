//! One module per subcommand.

pub mod add;
pub mod copy;
pub mod delete;
pub mod edit;
pub mod init;
pub mod list;
pub mod vault;
