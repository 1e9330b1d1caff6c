//! 网关配置

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// vboxwebsrv 默认监听地址
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:18083";

/// 网关配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// 服务端点 URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// 连接超时（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// 请求超时（秒）
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// 是否使用系统代理（HTTP_PROXY 等环境变量）
    #[serde(default)]
    pub use_system_proxy: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
            use_system_proxy: false,
        }
    }
}

impl GatewayConfig {
    /// 使用指定端点，其余取默认值
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            ..Default::default()
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

// 默认值函数
fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    60
}
