//! vbox 网关层
//!
//! 负责与 VirtualBox Web 服务 (vboxwebsrv) 之间的远程调用：
//! 接收操作名和请求字段，完成 SOAP 编码与 HTTP 传输，返回响应字段或错误。
//!
//! 上层只依赖 [`Gateway`] trait，测试中可以替换为桩实现。

pub mod config;
pub mod http;
pub mod payload;
pub mod soap;

pub use config::{GatewayConfig, DEFAULT_ENDPOINT};
pub use http::SoapGateway;
pub use payload::{Field, Payload, RETURN_VALUE};

use async_trait::async_trait;
use thiserror::Error;

/// 网关层错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// 网络或 HTTP 层失败，请求可能根本没有到达服务端
    #[error("传输失败: {0}")]
    Transport(String),

    /// 服务端返回的 SOAP Fault（认证失败、参数非法等）
    #[error("远程操作失败 [{code}]: {message}")]
    Fault { code: String, message: String },

    /// 响应无法解析
    #[error("响应解析失败: {0}")]
    Parse(String),

    #[error("配置错误: {0}")]
    Config(String),
}

impl GatewayError {
    /// 是否为服务端报告的业务错误
    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Fault { .. })
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

/// 远程调用网关
///
/// 每次 `invoke` 对应一次远程往返，网关本身不做重试。
#[async_trait]
pub trait Gateway: Send + Sync {
    /// 调用远程操作
    async fn invoke(&self, operation: &str, request: Payload) -> Result<Payload>;

    /// 服务端点 URL
    fn endpoint(&self) -> &str;
}
