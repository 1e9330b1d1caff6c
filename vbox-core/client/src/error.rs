//! 客户端错误定义

use thiserror::Error;
use vbox_gateway::GatewayError;

/// 客户端错误类型
#[derive(Error, Debug)]
pub enum VboxError {
    /// 远程调用失败，保留网关原始错误
    #[error("远程调用 {operation} 失败 ({params})")]
    Remote {
        operation: &'static str,
        params: String,
        #[source]
        source: GatewayError,
    },

    /// 响应中缺少 `returnval`，或对象句柄为空
    #[error("远程调用 {operation} 缺少有效返回值")]
    MissingReturnValue { operation: &'static str },

    #[error("远程调用 {operation} 返回了无法识别的值: {value}")]
    UnexpectedValue {
        operation: &'static str,
        value: String,
    },
}

impl VboxError {
    /// 失败的远程操作名
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Remote { operation, .. }
            | Self::MissingReturnValue { operation }
            | Self::UnexpectedValue { operation, .. } => *operation,
        }
    }

    /// 网关返回的原始错误
    pub fn gateway_error(&self) -> Option<&GatewayError> {
        match self {
            Self::Remote { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// 客户端结果类型
pub type Result<T> = std::result::Result<T, VboxError>;
