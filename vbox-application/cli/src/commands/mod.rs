//! CLI 命令处理模块

pub mod disk;
pub mod logon;
pub mod machine;
