//! 命令定义和实现

pub mod command;
pub mod decode;
pub mod replay;
pub mod tokens;

pub use command::CommandCommand;
pub use decode::DecodeCommand;
pub use replay::ReplayCommand;
pub use tokens::TokensCommand;
