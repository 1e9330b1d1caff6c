//! 存储介质

use crate::error::Result;
use crate::handle::ManagedObject;
use crate::requests::operation;
use crate::session::Session;

/// 存储介质（虚拟磁盘镜像）句柄
#[derive(Debug, Clone)]
pub struct Medium<'a> {
    object: ManagedObject<'a>,
}

impl<'a> Medium<'a> {
    pub(crate) fn new(object: ManagedObject<'a>) -> Self {
        Self { object }
    }

    pub fn id(&self) -> &str {
        self.object.id()
    }

    pub fn session(&self) -> &'a Session {
        self.object.session()
    }

    /// 介质文件位置
    pub async fn location(&self) -> Result<String> {
        self.object.attribute(operation::MEDIUM_GET_LOCATION).await
    }

    /// 介质格式（如 VDI、VMDK）
    pub async fn format(&self) -> Result<String> {
        self.object.attribute(operation::MEDIUM_GET_FORMAT).await
    }
}
