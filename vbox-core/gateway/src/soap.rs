//! SOAP 1.1 报文编解码
//!
//! 只覆盖 vboxwebsrv 使用的 document/literal 形式：请求体是一个以操作名命名的元素，
//! 每个参数是一个子元素；响应体是 `<操作名>Response` 元素，返回值放在 `returnval` 子元素里。

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::payload::Payload;
use crate::{GatewayError, Result};

pub const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const VBOX_NS: &str = "http://www.virtualbox.org/";

/// 构建请求报文
pub fn build_envelope(operation: &str, request: &Payload) -> String {
    let params: String = request
        .fields()
        .iter()
        .map(|f| format!("<{0}>{1}</{0}>", f.name, escape(f.value.as_str())))
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<SOAP-ENV:Envelope xmlns:SOAP-ENV="{SOAP_ENV_NS}" xmlns:vbox="{VBOX_NS}"><SOAP-ENV:Body><vbox:{operation}>{params}</vbox:{operation}></SOAP-ENV:Body></SOAP-ENV:Envelope>"#
    )
}

/// 解析响应报文
///
/// `Body` 下第一个元素为 `Fault` 时返回 [`GatewayError::Fault`]，
/// 否则必须是 `<operation>Response`，其子元素按顺序转换为响应字段。
/// 字段文本原样保留，不去除首尾空白；元素之间的空白文本忽略。
pub fn parse_response(operation: &str, body: &str) -> Result<Payload> {
    let mut reader = Reader::from_str(body);

    let mut depth = 0usize;
    let mut body_depth: Option<usize> = None;
    let mut element: Option<String> = None;
    let mut current: Option<(String, String)> = None;
    let mut fields = Payload::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                match body_depth {
                    None if name == "Body" => body_depth = Some(depth),
                    Some(b) if depth == b + 1 && element.is_none() => element = Some(name),
                    Some(b) if depth == b + 2 && element.is_some() => {
                        current = Some((name, String::new()))
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                match body_depth {
                    Some(b) if depth == b && element.is_none() => element = Some(name),
                    Some(b) if depth == b + 1 && element.is_some() => fields.push(&name, ""),
                    _ => {}
                }
            }
            Ok(Event::Text(t)) => {
                if let Some((_, value)) = current.as_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| GatewayError::Parse(format!("{}: {}", operation, e)))?;
                    value.push_str(&text);
                }
            }
            Ok(Event::CData(c)) => {
                if let Some((_, value)) = current.as_mut() {
                    value.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Ok(Event::End(_)) => {
                if let Some(b) = body_depth {
                    if depth == b + 2 {
                        if let Some((name, value)) = current.take() {
                            fields.push(&name, value);
                        }
                    }
                    if depth == b {
                        break;
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(GatewayError::Parse(format!(
                    "{} 响应 XML 格式错误 (位置 {}): {}",
                    operation,
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    if body_depth.is_none() {
        return Err(GatewayError::Parse(format!("{} 响应缺少 Body 元素", operation)));
    }

    let element = element
        .ok_or_else(|| GatewayError::Parse(format!("{} 响应 Body 为空", operation)))?;

    if element == "Fault" {
        return Err(GatewayError::Fault {
            code: fields.get("faultcode").unwrap_or_default().to_string(),
            message: fields.get("faultstring").unwrap_or_default().to_string(),
        });
    }

    let expected = format!("{}Response", operation);
    if element != expected {
        return Err(GatewayError::Parse(format!(
            "期望响应元素 {}，实际为 {}",
            expected, element
        )));
    }

    Ok(fields)
}
