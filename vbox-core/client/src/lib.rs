//! VirtualBox Web 服务客户端
//!
//! 提供会话管理和远程对象句柄，所有远程调用经由 [`vbox_gateway::Gateway`] 完成。
//!
//! # 功能
//!
//! - **会话管理** (`Session`): 一次性登录，保存会话句柄
//! - **存储介质** (`Medium`): 创建硬盘，查询位置和格式
//! - **虚拟机** (`Machine`): 查找虚拟机，查询名称、芯片组，获取网卡
//! - **网卡** (`NetworkAdapter`): 查询 MAC 地址和启用状态
//!
//! # 示例
//!
//! ```ignore
//! use std::sync::Arc;
//! use vbox_client::{Credentials, Session};
//! use vbox_gateway::{GatewayConfig, SoapGateway};
//!
//! let gateway = SoapGateway::new(&GatewayConfig::default())?;
//! let session = Session::new(Arc::new(gateway), Credentials::anonymous());
//!
//! // 创建硬盘（自动登录）
//! let disk = session.create_hard_disk("VDI", "/vms/disk.vdi").await?;
//!
//! // 查询虚拟机网卡
//! let machine = session.find_machine("ubuntu").await?;
//! let adapter = machine.network_adapter(0).await?;
//! println!("{}", adapter.mac_address().await?);
//! ```

pub mod error;
pub mod handle;
pub mod machine;
pub mod medium;
pub mod network_adapter;
pub mod requests;
pub mod session;

pub use error::{Result, VboxError};
pub use handle::ManagedObject;
pub use machine::{ChipsetType, Machine};
pub use medium::Medium;
pub use network_adapter::NetworkAdapter;
pub use session::{Credentials, Session};
