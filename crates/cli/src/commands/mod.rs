pub mod collect;
pub mod init;
pub mod list;

pub use collect::collect_command;
pub use init::init_command;
pub use list::list_command;
