//! 请求/响应字段

/// 响应中返回值字段名
pub const RETURN_VALUE: &str = "returnval";

/// 日志和错误信息中需要隐藏的字段
const SECRET_FIELDS: &[&str] = &["password"];

/// 单个命名字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: String,
}

/// 远程调用的请求或响应内容
///
/// 字段按插入顺序保存，允许同名字段重复出现（数组返回值即为多个 `returnval`）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    fields: Vec<Field>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加字段（构建器风格）
    pub fn with(mut self, name: &str, value: impl ToString) -> Self {
        self.push(name, value);
        self
    }

    /// 追加字段
    pub fn push(&mut self, name: &str, value: impl ToString) {
        self.fields.push(Field {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    /// 第一个同名字段的值
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// 所有同名字段的值
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.name == name)
            .map(|f| f.value.as_str())
            .collect()
    }

    /// 返回值（第一个 `returnval`）
    pub fn return_value(&self) -> Option<&str> {
        self.get(RETURN_VALUE)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 可安全输出到日志的字段摘要，密码类字段被遮蔽
    pub fn summary(&self) -> String {
        self.fields
            .iter()
            .map(|f| {
                if SECRET_FIELDS.contains(&f.name.as_str()) {
                    format!("{}=***", f.name)
                } else {
                    format!("{}={}", f.name, f.value)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
