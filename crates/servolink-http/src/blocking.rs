//! 阻塞式 reqwest 后端
//!
//! 每个请求单独设置超时，连接由 `reqwest::blocking::Client` 内部复用。

use crate::{HttpTransport, TransportError, endpoint_url, normalize_base_url};
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, trace};

/// 基于 `reqwest::blocking` 的控制器传输
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    /// 为指定设备地址创建传输
    ///
    /// # 错误
    ///
    /// - `TransportError::InvalidAddress`: 地址无法规范化
    /// - `TransportError::Request`: HTTP 客户端初始化失败（如 TLS 后端不可用）
    pub fn new(address: &str) -> Result<Self, TransportError> {
        let base_url = normalize_base_url(address)?;
        let client = Client::builder()
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    fn send(
        &self,
        endpoint: &str,
        query: &[(&str, i32)],
        timeout: Duration,
    ) -> Result<reqwest::blocking::Response, TransportError> {
        let url = endpoint_url(&self.base_url, endpoint);
        trace!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .timeout(timeout)
            .send()
            .map_err(map_reqwest_error)?;

        if !response.status().is_success() {
            // 固件对未知参数也可能返回非 2xx，正文仍然有效
            debug!("GET {} returned status {}", url, response.status());
        }
        Ok(response)
    }
}

impl HttpTransport for ReqwestTransport {
    fn get_text(
        &mut self,
        endpoint: &str,
        query: &[(&str, i32)],
        timeout: Duration,
    ) -> Result<String, TransportError> {
        self.send(endpoint, query, timeout)?
            .text()
            .map_err(map_reqwest_error)
    }

    fn dispatch(
        &mut self,
        endpoint: &str,
        query: &[(&str, i32)],
        timeout: Duration,
    ) -> Result<(), TransportError> {
        // 只等待响应头，响应体随 Response 一起丢弃
        self.send(endpoint, query, timeout).map(drop)
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else {
        TransportError::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_address() {
        let transport = ReqwestTransport::new("192.168.4.1/").unwrap();
        assert_eq!(transport.base_url(), "http://192.168.4.1");
    }

    #[test]
    fn test_new_rejects_invalid_address() {
        assert!(matches!(
            ReqwestTransport::new(""),
            Err(TransportError::InvalidAddress(_))
        ));
    }

    /// 127.0.0.1:9 (discard) 通常没有监听者，连接会被立即拒绝
    #[test]
    #[ignore]
    fn test_unreachable_device_maps_to_network_error() {
        let mut transport = ReqwestTransport::new("127.0.0.1:9").unwrap();
        let err = transport
            .get_text("readSTS", &[], Duration::from_millis(200))
            .unwrap_err();
        assert!(err.is_network(), "unexpected error: {err:?}");
    }
}
