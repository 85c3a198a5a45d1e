//! # Servolink HTTP Transport Layer
//!
//! 控制器传输抽象层，把 "对某个端点发 GET" 统一成 [`HttpTransport`] trait。
//!
//! - `blocking`: 真实设备使用的阻塞式后端（feature `reqwest-backend`）
//! - `mock`: 模拟 ESP32 控制器，用于测试（feature `mock`）
//!
//! 传输层不做任何重试，也不解析响应内容；重试策略属于驱动层。

use std::time::Duration;
use thiserror::Error;

#[cfg(feature = "reqwest-backend")]
pub mod blocking;

#[cfg(feature = "reqwest-backend")]
pub use blocking::ReqwestTransport;

#[cfg(feature = "mock")]
pub mod mock;

#[cfg(feature = "mock")]
pub use mock::{MockController, MockRequest};

/// 传输层统一错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Invalid device address: {0}")]
    InvalidAddress(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    /// 连接已建立但请求或响应体读取失败
    #[error("Request failed: {0}")]
    Request(String),
}

impl TransportError {
    /// 是否为网络层面的失败（超时或连接失败）
    pub fn is_network(&self) -> bool {
        matches!(self, TransportError::Timeout | TransportError::Connect(_))
    }
}

/// 控制器 HTTP 传输
///
/// 查询参数统一为整数，这是 `/cmd` 端点唯一使用的参数形式；
/// 读取端点传入空切片即可。
pub trait HttpTransport {
    /// 发送 GET 请求并返回响应体文本
    fn get_text(
        &mut self,
        endpoint: &str,
        query: &[(&str, i32)],
        timeout: Duration,
    ) -> Result<String, TransportError>;

    /// 发送 GET 请求，不读取响应体
    ///
    /// 控制器处理 `/cmd` 时可能在回复前就关闭连接，
    /// 实现应尽早返回，调用方负责决定是否忽略错误。
    fn dispatch(
        &mut self,
        endpoint: &str,
        query: &[(&str, i32)],
        timeout: Duration,
    ) -> Result<(), TransportError>;

    /// 设备基础地址（用于日志）
    fn base_url(&self) -> &str;
}

impl<T: HttpTransport + ?Sized> HttpTransport for Box<T> {
    fn get_text(
        &mut self,
        endpoint: &str,
        query: &[(&str, i32)],
        timeout: Duration,
    ) -> Result<String, TransportError> {
        (**self).get_text(endpoint, query, timeout)
    }

    fn dispatch(
        &mut self,
        endpoint: &str,
        query: &[(&str, i32)],
        timeout: Duration,
    ) -> Result<(), TransportError> {
        (**self).dispatch(endpoint, query, timeout)
    }

    fn base_url(&self) -> &str {
        (**self).base_url()
    }
}

/// 规范化设备地址
///
/// 接受 `192.168.4.1`、`192.168.4.1:8080` 或完整的 `http://...` 形式，
/// 返回不带末尾 `/` 的基础 URL。
pub fn normalize_base_url(address: &str) -> Result<String, TransportError> {
    let trimmed = address.trim();
    let (scheme, rest) = trimmed.split_once("://").unwrap_or(("http", trimmed));
    let host = rest.trim_end_matches('/');

    if host.is_empty()
        || host.contains(char::is_whitespace)
        || !matches!(scheme, "http" | "https")
    {
        return Err(TransportError::InvalidAddress(address.to_string()));
    }

    Ok(format!("{scheme}://{host}"))
}

/// 拼接端点 URL
pub fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    format!("{}/{}", base_url, endpoint.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bare_ip() {
        assert_eq!(
            normalize_base_url("192.168.4.1").unwrap(),
            "http://192.168.4.1"
        );
    }

    #[test]
    fn test_normalize_keeps_scheme_and_strips_slash() {
        assert_eq!(
            normalize_base_url("http://10.0.0.7:8080/").unwrap(),
            "http://10.0.0.7:8080"
        );
    }

    #[test]
    fn test_normalize_rejects_empty() {
        assert!(matches!(
            normalize_base_url("   "),
            Err(TransportError::InvalidAddress(_))
        ));
        assert!(normalize_base_url("http://").is_err());
        assert!(normalize_base_url("bad host").is_err());
    }

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url("http://192.168.4.1", "/readSTS"),
            "http://192.168.4.1/readSTS"
        );
        assert_eq!(
            endpoint_url("http://192.168.4.1", "cmd"),
            "http://192.168.4.1/cmd"
        );
    }

    #[test]
    fn test_is_network() {
        assert!(TransportError::Timeout.is_network());
        assert!(TransportError::Connect("refused".into()).is_network());
        assert!(!TransportError::Request("body".into()).is_network());
    }
}
