//! Replybot core library: configuration, webhook gateway, and the outbound
//! reply sender used by the CLI.

pub mod channels;
pub mod config;
pub mod gateway;
pub mod reply;
