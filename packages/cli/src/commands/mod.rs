pub mod init;
pub mod insert;
pub mod replay;
pub mod reparse;

pub use init::{init, InitArgs};
pub use insert::{insert, InsertArgs};
pub use replay::{replay, ReplayArgs};
pub use reparse::{reparse, ReparseArgs};
