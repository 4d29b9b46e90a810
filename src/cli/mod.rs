//! CLI 命令处理

pub mod listen;
pub mod replay;

pub use listen::*;
pub use replay::*;
