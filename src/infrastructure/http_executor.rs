//! HTTP 执行器 - 基础设施层
//!
//! 持有唯一的 HTTP 客户端，只暴露"提交表单、拿回 JSON"的能力

use std::time::Duration;

use reqwest::multipart::Form;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::{ApiError, AppError, AppResult};

/// HTTP 执行器
///
/// 职责：
/// - 持有唯一的 Client 资源（连接池复用）
/// - 暴露 post_form() 能力
/// - 不认识文件 / 字段 / 模式
/// - 不处理业务流程
#[derive(Clone)]
pub struct HttpExecutor {
    client: Client,
    base_url: String,
}

impl HttpExecutor {
    /// 创建新的 HTTP 执行器
    ///
    /// `timeout` 为 None 时请求不设超时。
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> AppResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::api_request_failed("<client>", e))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 完整地址
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// 以 multipart 表单 POST 并返回 JSON
    ///
    /// # 参数
    /// - `endpoint`: 以 `/` 开头的路径
    /// - `form`: 表单内容
    ///
    /// # 返回
    /// 2xx 时返回 JSON，其他状态返回 `ApiError::BadStatus`
    pub async fn post_form(&self, endpoint: &str, form: Form) -> AppResult<JsonValue> {
        let url = self.url(endpoint);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::BadStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let body: JsonValue = response
            .json()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))?;
        debug!("{} 响应: {}", endpoint, body);
        Ok(body)
    }

    /// 以 multipart 表单 POST 并反序列化为指定类型
    pub async fn post_form_as<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: Form,
    ) -> AppResult<T> {
        let json_value = self.post_form(endpoint, form).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let executor = HttpExecutor::new("http://localhost:5000/", None).unwrap();
        assert_eq!(executor.base_url(), "http://localhost:5000");
        assert_eq!(
            executor.url("/getcsvheader"),
            "http://localhost:5000/getcsvheader"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_request_failure() {
        let executor =
            HttpExecutor::new("http://127.0.0.1:1", Some(Duration::from_secs(2))).unwrap();
        let err = executor
            .post_form("/getcsvheader", Form::new().text("outputPath", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Api(ApiError::RequestFailed { .. })));
    }
}
