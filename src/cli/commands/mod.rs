//! One module per subcommand, each exposing `execute`.

pub mod check;
pub mod create;
pub mod delete;
pub mod import_cmd;
pub mod list;
pub mod passwd;
pub mod show;
pub mod sign;
