//! 远程操作请求
//!
//! 每个请求对应 vboxwebsrv 的一个操作，字段名与服务端 WSDL 保持一致。

use vbox_gateway::Payload;

/// 远程操作名
pub mod operation {
    pub const LOGON: &str = "IWebsessionManager_logon";
    pub const CREATE_HARD_DISK: &str = "IVirtualBox_createHardDisk";
    pub const FIND_MACHINE: &str = "IVirtualBox_findMachine";
    pub const GET_MACHINES: &str = "IVirtualBox_getMachines";
    pub const MACHINE_GET_NAME: &str = "IMachine_getName";
    pub const MACHINE_GET_CHIPSET_TYPE: &str = "IMachine_getChipsetType";
    pub const MACHINE_GET_NETWORK_ADAPTER: &str = "IMachine_getNetworkAdapter";
    pub const MEDIUM_GET_LOCATION: &str = "IMedium_getLocation";
    pub const MEDIUM_GET_FORMAT: &str = "IMedium_getFormat";
    pub const ADAPTER_GET_MAC_ADDRESS: &str = "INetworkAdapter_getMACAddress";
    pub const ADAPTER_GET_ENABLED: &str = "INetworkAdapter_getEnabled";
}

/// 对象引用字段名
const THIS: &str = "_this";

/// 可发送的远程请求
pub trait RemoteCall {
    /// 操作名
    fn operation(&self) -> &'static str;

    /// 转换为网关请求字段
    fn into_payload(self) -> Payload;
}

/// 会话登录
#[derive(Debug, Clone)]
pub struct LogonRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl RemoteCall for LogonRequest<'_> {
    fn operation(&self) -> &'static str {
        operation::LOGON
    }

    fn into_payload(self) -> Payload {
        Payload::new()
            .with("username", self.username)
            .with("password", self.password)
    }
}

/// 创建硬盘介质
#[derive(Debug, Clone)]
pub struct CreateHardDiskRequest<'a> {
    pub this: &'a str,
    pub format: &'a str,
    pub location: &'a str,
}

impl RemoteCall for CreateHardDiskRequest<'_> {
    fn operation(&self) -> &'static str {
        operation::CREATE_HARD_DISK
    }

    fn into_payload(self) -> Payload {
        Payload::new()
            .with(THIS, self.this)
            .with("format", self.format)
            .with("location", self.location)
    }
}

/// 按名称或 UUID 查找虚拟机
#[derive(Debug, Clone)]
pub struct FindMachineRequest<'a> {
    pub this: &'a str,
    pub name_or_id: &'a str,
}

impl RemoteCall for FindMachineRequest<'_> {
    fn operation(&self) -> &'static str {
        operation::FIND_MACHINE
    }

    fn into_payload(self) -> Payload {
        Payload::new()
            .with(THIS, self.this)
            .with("nameOrId", self.name_or_id)
    }
}

/// 获取网卡
#[derive(Debug, Clone)]
pub struct GetNetworkAdapterRequest<'a> {
    pub this: &'a str,
    pub slot: u32,
}

impl RemoteCall for GetNetworkAdapterRequest<'_> {
    fn operation(&self) -> &'static str {
        operation::MACHINE_GET_NETWORK_ADAPTER
    }

    fn into_payload(self) -> Payload {
        Payload::new().with(THIS, self.this).with("slot", self.slot)
    }
}

/// 只带 `_this` 的属性读取
#[derive(Debug, Clone)]
pub struct AttributeRequest<'a> {
    pub operation: &'static str,
    pub this: &'a str,
}

impl RemoteCall for AttributeRequest<'_> {
    fn operation(&self) -> &'static str {
        self.operation
    }

    fn into_payload(self) -> Payload {
        Payload::new().with(THIS, self.this)
    }
}
