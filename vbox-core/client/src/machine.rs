//! 虚拟机

use tracing::debug;

use crate::error::Result;
use crate::handle::{return_handle, ManagedObject};
use crate::network_adapter::NetworkAdapter;
use crate::requests::{operation, GetNetworkAdapterRequest};
use crate::session::Session;

/// 芯片组类型
///
/// 服务端返回的未知取值保存在 `Other` 中原样透传。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChipsetType {
    Null,
    Piix3,
    Ich9,
    ArmV8Virtual,
    Other(String),
}

impl ChipsetType {
    /// 从服务端枚举值转换
    pub fn from_wire(value: &str) -> Self {
        match value {
            "Null" => Self::Null,
            "PIIX3" => Self::Piix3,
            "ICH9" => Self::Ich9,
            "ARMv8Virtual" => Self::ArmV8Virtual,
            other => Self::Other(other.to_string()),
        }
    }

    /// 服务端枚举值
    pub fn as_str(&self) -> &str {
        match self {
            Self::Null => "Null",
            Self::Piix3 => "PIIX3",
            Self::Ich9 => "ICH9",
            Self::ArmV8Virtual => "ARMv8Virtual",
            Self::Other(value) => value.as_str(),
        }
    }
}

impl std::fmt::Display for ChipsetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 虚拟机句柄
#[derive(Debug, Clone)]
pub struct Machine<'a> {
    object: ManagedObject<'a>,
}

impl<'a> Machine<'a> {
    pub(crate) fn new(object: ManagedObject<'a>) -> Self {
        Self { object }
    }

    pub fn id(&self) -> &str {
        self.object.id()
    }

    pub fn session(&self) -> &'a Session {
        self.object.session()
    }

    /// 虚拟机名称
    pub async fn name(&self) -> Result<String> {
        self.object.attribute(operation::MACHINE_GET_NAME).await
    }

    /// 芯片组类型
    pub async fn chipset_type(&self) -> Result<ChipsetType> {
        let value = self
            .object
            .attribute(operation::MACHINE_GET_CHIPSET_TYPE)
            .await?;
        Ok(ChipsetType::from_wire(&value))
    }

    /// 获取指定插槽的网卡
    ///
    /// 插槽范围由服务端检查，越界时返回远程错误。每次调用都会发起新的远程请求。
    pub async fn network_adapter(&self, slot: u32) -> Result<NetworkAdapter<'a>> {
        debug!("获取虚拟机 {} 的网卡, 插槽 {}", self.id(), slot);

        let response = self
            .session()
            .dispatch(GetNetworkAdapterRequest {
                this: self.id(),
                slot,
            })
            .await?;
        let id = return_handle(operation::MACHINE_GET_NETWORK_ADAPTER, &response)?;

        Ok(NetworkAdapter::new(ManagedObject::new(self.session(), id)))
    }
}
