//! 远程对象句柄

use vbox_gateway::Payload;

use crate::error::{Result, VboxError};
use crate::requests::AttributeRequest;
use crate::session::Session;

/// 远程对象引用
///
/// `id` 是服务端返回的托管对象 ID，不解析、不假设格式。
/// 句柄借用创建它的会话，会话的生命周期必须长于句柄。
#[derive(Clone)]
pub struct ManagedObject<'a> {
    id: String,
    session: &'a Session,
}

impl<'a> ManagedObject<'a> {
    pub(crate) fn new(session: &'a Session, id: String) -> Self {
        debug_assert!(!id.is_empty(), "托管对象 ID 不能为空");
        Self { id, session }
    }

    /// 托管对象 ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// 所属会话
    pub fn session(&self) -> &'a Session {
        self.session
    }

    /// 读取该对象的一个属性
    pub(crate) async fn attribute(&self, operation: &'static str) -> Result<String> {
        let response = self
            .session
            .dispatch(AttributeRequest {
                operation,
                this: &self.id,
            })
            .await?;

        return_value(operation, &response)
    }
}

impl std::fmt::Debug for ManagedObject<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedObject").field("id", &self.id).finish()
    }
}

/// 取出返回值，允许为空字符串
pub(crate) fn return_value(operation: &'static str, response: &Payload) -> Result<String> {
    response
        .return_value()
        .map(str::to_string)
        .ok_or(VboxError::MissingReturnValue { operation })
}

/// 取出对象句柄，必须非空
pub(crate) fn return_handle(operation: &'static str, response: &Payload) -> Result<String> {
    match response.return_value() {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(VboxError::MissingReturnValue { operation }),
    }
}
