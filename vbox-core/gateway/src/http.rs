//! 基于 HTTP 的 SOAP 网关

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::GatewayConfig;
use crate::payload::Payload;
use crate::{soap, Gateway, GatewayError, Result};

/// 错误信息中保留的响应体长度
const BODY_EXCERPT_LEN: usize = 256;

/// vboxwebsrv SOAP 网关
pub struct SoapGateway {
    /// 服务端点
    endpoint: String,

    /// HTTP 客户端
    http_client: Client,
}

impl SoapGateway {
    /// 创建网关（不发起任何网络请求）
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let url = url::Url::parse(&config.endpoint)
            .map_err(|e| GatewayError::Config(format!("无效的端点 {}: {}", config.endpoint, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(GatewayError::Config(format!(
                "不支持的协议: {}",
                url.scheme()
            )));
        }

        let mut builder = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout());

        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        let http_client = builder
            .build()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            http_client,
        })
    }
}

#[async_trait]
impl Gateway for SoapGateway {
    async fn invoke(&self, operation: &str, request: Payload) -> Result<Payload> {
        debug!("SOAP 请求: {} -> {}", operation, self.endpoint);

        let envelope = soap::build_envelope(operation, &request);

        let response = self
            .http_client
            .post(&self.endpoint)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", "\"\"")
            .body(envelope)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        // vboxwebsrv 以 HTTP 500 返回 Fault，先按报文解析
        match soap::parse_response(operation, &body) {
            Ok(payload) if status.is_success() => Ok(payload),
            Err(fault @ GatewayError::Fault { .. }) => {
                warn!("{} 远程操作失败: {}", operation, fault);
                Err(fault)
            }
            Ok(_) | Err(_) if !status.is_success() => {
                let excerpt: String = body.chars().take(BODY_EXCERPT_LEN).collect();
                warn!("{} HTTP 请求失败: {} - {}", operation, status, excerpt);
                Err(GatewayError::Transport(format!("HTTP {}: {}", status, excerpt)))
            }
            other => other,
        }
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl std::fmt::Debug for SoapGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoapGateway")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
