pub mod check;
pub mod codec;
pub mod config;
pub mod init;
pub mod register;
pub mod show;
