//! 网卡

use crate::error::{Result, VboxError};
use crate::handle::ManagedObject;
use crate::requests::operation;
use crate::session::Session;

/// 虚拟机网卡句柄
#[derive(Debug, Clone)]
pub struct NetworkAdapter<'a> {
    object: ManagedObject<'a>,
}

impl<'a> NetworkAdapter<'a> {
    pub(crate) fn new(object: ManagedObject<'a>) -> Self {
        Self { object }
    }

    pub fn id(&self) -> &str {
        self.object.id()
    }

    pub fn session(&self) -> &'a Session {
        self.object.session()
    }

    /// MAC 地址
    pub async fn mac_address(&self) -> Result<String> {
        self.object
            .attribute(operation::ADAPTER_GET_MAC_ADDRESS)
            .await
    }

    /// 网卡是否启用
    pub async fn enabled(&self) -> Result<bool> {
        let value = self.object.attribute(operation::ADAPTER_GET_ENABLED).await?;
        parse_bool(operation::ADAPTER_GET_ENABLED, &value)
    }
}

fn parse_bool(operation: &'static str, value: &str) -> Result<bool> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(VboxError::UnexpectedValue {
            operation,
            value: value.to_string(),
        }),
    }
}
