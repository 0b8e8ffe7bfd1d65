pub mod config;
pub mod ps;
pub mod show;
pub mod watch;
