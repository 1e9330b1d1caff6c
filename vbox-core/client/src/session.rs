//! 会话管理
//!
//! 持有凭据和网关，负责一次性登录并保存会话句柄。
//! 会话句柄同时也是 `IVirtualBox` 对象的引用，`IVirtualBox_*` 调用都以它作为 `_this`。

use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};
use vbox_gateway::{Gateway, Payload, RETURN_VALUE};

use crate::error::{Result, VboxError};
use crate::handle::{return_handle, ManagedObject};
use crate::machine::Machine;
use crate::medium::Medium;
use crate::requests::{
    operation, AttributeRequest, CreateHardDiskRequest, FindMachineRequest, LogonRequest,
    RemoteCall,
};

/// 登录凭据
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// 空用户名和密码（vboxwebsrv 关闭认证时使用）
    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// VirtualBox Web 服务会话
pub struct Session {
    /// 远程调用网关
    gateway: Arc<dyn Gateway>,

    /// 登录凭据
    credentials: Credentials,

    /// 会话句柄，登录成功后只写入一次
    handle: OnceCell<String>,
}

impl Session {
    /// 创建会话（不发起登录）
    pub fn new(gateway: Arc<dyn Gateway>, credentials: Credentials) -> Self {
        Self {
            gateway,
            credentials,
            handle: OnceCell::new(),
        }
    }

    /// 服务端点
    pub fn endpoint(&self) -> &str {
        self.gateway.endpoint()
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// 当前会话句柄，未登录时为 `None`
    pub fn session_id(&self) -> Option<&str> {
        self.handle.get().map(String::as_str)
    }

    pub fn is_logged_on(&self) -> bool {
        self.handle.initialized()
    }

    /// 登录
    ///
    /// 已持有句柄时直接返回，不会再次发起远程调用。并发调用只会产生一次登录请求，
    /// 其余调用等待并得到同一个句柄。登录失败时句柄保持为空，之后可以重新登录。
    pub async fn logon(&self) -> Result<&str> {
        let handle = self
            .handle
            .get_or_try_init(move || async move {
                info!(
                    "登录 VirtualBox Web 服务: {} (用户: {:?})",
                    self.endpoint(),
                    self.credentials.username
                );

                let response = self
                    .dispatch(LogonRequest {
                        username: &self.credentials.username,
                        password: &self.credentials.password,
                    })
                    .await?;
                let handle = return_handle(operation::LOGON, &response)?;

                info!("登录成功，会话句柄: {}", handle);
                Ok::<_, VboxError>(handle)
            })
            .await?;

        Ok(handle.as_str())
    }

    /// 创建硬盘介质
    ///
    /// `format` 和 `location` 原样交给服务端，非法值由服务端以 Fault 形式拒绝。
    pub async fn create_hard_disk(&self, format: &str, location: &str) -> Result<Medium<'_>> {
        // 登录失败直接返回，不允许带着空句柄继续调用
        let this = self.logon().await?;

        info!("创建硬盘: format={}, location={}", format, location);
        let response = self
            .dispatch(CreateHardDiskRequest {
                this,
                format,
                location,
            })
            .await?;
        let id = return_handle(operation::CREATE_HARD_DISK, &response)?;

        debug!("硬盘已创建: {}", id);
        Ok(Medium::new(ManagedObject::new(self, id)))
    }

    /// 按名称或 UUID 查找虚拟机
    pub async fn find_machine(&self, name_or_id: &str) -> Result<Machine<'_>> {
        let this = self.logon().await?;

        debug!("查找虚拟机: {}", name_or_id);
        let response = self
            .dispatch(FindMachineRequest { this, name_or_id })
            .await?;
        let id = return_handle(operation::FIND_MACHINE, &response)?;

        Ok(Machine::new(ManagedObject::new(self, id)))
    }

    /// 列出所有已注册的虚拟机
    pub async fn machines(&self) -> Result<Vec<Machine<'_>>> {
        let this = self.logon().await?;

        let response = self
            .dispatch(AttributeRequest {
                operation: operation::GET_MACHINES,
                this,
            })
            .await?;

        response
            .get_all(RETURN_VALUE)
            .into_iter()
            .map(|id| {
                if id.is_empty() {
                    Err(VboxError::MissingReturnValue {
                        operation: operation::GET_MACHINES,
                    })
                } else {
                    Ok(Machine::new(ManagedObject::new(self, id.to_string())))
                }
            })
            .collect()
    }

    /// 发起一次远程调用，失败时附带操作名和参数摘要
    pub(crate) async fn dispatch<R: RemoteCall>(&self, request: R) -> Result<Payload> {
        let operation = request.operation();
        let payload = request.into_payload();
        let params = payload.summary();

        debug!("远程调用: {} ({})", operation, params);

        self.gateway
            .invoke(operation, payload)
            .await
            .map_err(|source| {
                warn!("远程调用 {} 失败: {}", operation, source);
                VboxError::Remote {
                    operation,
                    params,
                    source,
                }
            })
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("endpoint", &self.endpoint())
            .field("credentials", &self.credentials)
            .field("logged_on", &self.is_logged_on())
            .finish()
    }
}
