//! CLI 配置管理
//!
//! **数据存储方式**: TOML 文件 (~/.config/vbox/config.toml)，不存在时使用默认值。
//! 命令行参数优先于配置文件。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use vbox_client::Credentials;
use vbox_gateway::GatewayConfig;

/// CLI 配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// 用户名
    pub username: Option<String>,

    /// 密码
    pub password: Option<String>,

    /// 网关配置
    #[serde(default)]
    pub gateway: GatewayConfig,
}

impl CliConfig {
    /// 获取默认配置文件路径
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("无法获取用户主目录")?;
        Ok(home.join(".config").join("vbox").join("config.toml"))
    }

    /// 加载配置
    ///
    /// 显式指定的文件必须存在；默认路径下没有文件时返回默认配置。
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let path = Self::config_path()?;
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("读取配置文件失败: {:?}", path))?;

        Self::from_toml(&content).with_context(|| format!("解析配置文件失败: {:?}", path))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 合并命令行端点后的网关配置
    pub fn gateway_config(&self, endpoint: Option<&str>) -> GatewayConfig {
        let mut config = self.gateway.clone();
        if let Some(endpoint) = endpoint {
            config.endpoint = endpoint.to_string();
        }
        config
    }

    /// 合并命令行参数后的登录凭据，均未指定时为空凭据
    pub fn credentials(&self, username: Option<&str>, password: Option<&str>) -> Credentials {
        Credentials::new(
            username.or(self.username.as_deref()).unwrap_or_default(),
            password.or(self.password.as_deref()).unwrap_or_default(),
        )
    }
}
