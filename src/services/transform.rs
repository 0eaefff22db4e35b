//! 变换服务 - 业务能力层
//!
//! 只负责"把单个文件交给服务端做遮盖 / 加密 / 解密"

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::endpoints::TransformEndpoint;
use crate::error::AppResult;
use crate::models::{KeyDescriptor, SelectedField, UploadedFile};

/// 单文件变换请求，序列化后放进表单字段 `headers`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformRequest {
    /// 遮盖模式：可见字段的选择
    Obfuscate(Vec<SelectedField>),
    /// 加密 / 解密：单元素描述列表
    Keyed(KeyDescriptor),
}

impl TransformRequest {
    /// `headers` 字段的 JSON 文本
    pub fn headers_json(&self) -> AppResult<String> {
        let text = match self {
            TransformRequest::Obfuscate(fields) => serde_json::to_string(fields)?,
            TransformRequest::Keyed(descriptor) => {
                serde_json::to_string(std::slice::from_ref(descriptor))?
            }
        };
        Ok(text)
    }
}

/// 加密 / 解密响应里的单个文件描述
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformedFile {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub length: Option<u64>,
    #[serde(default)]
    pub encrypted_path: Option<String>,
    #[serde(default)]
    pub decrypted_path: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// 变换接口的响应
///
/// 遮盖返回 `filename`，加密 / 解密返回 `files`。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformResponse {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub files: Option<Vec<TransformedFile>>,
}

/// 变换服务
#[async_trait]
pub trait TransformService: Send + Sync {
    async fn transform(
        &self,
        endpoint: TransformEndpoint,
        file: &UploadedFile,
        request: &TransformRequest,
    ) -> AppResult<TransformResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldControl, Mode};

    #[test]
    fn test_keyed_request_is_single_element_list() {
        let request = TransformRequest::Keyed(KeyDescriptor {
            name: "a.pdf".to_string(),
            mode: Mode::Encrypt,
            key: "k1".to_string(),
        });
        let value: serde_json::Value =
            serde_json::from_str(&request.headers_json().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{"name": "a.pdf", "mode": "encrypt", "key": "k1"}])
        );
    }

    #[test]
    fn test_obfuscate_request_lists_fields() {
        let request = TransformRequest::Obfuscate(vec![SelectedField::new(
            "PERSON",
            &FieldControl::for_entity(),
        )]);
        let value: serde_json::Value =
            serde_json::from_str(&request.headers_json().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{"name": "PERSON", "mode": "mask", "prompt": ""}])
        );
    }

    #[test]
    fn test_response_shapes() {
        let keyed: TransformResponse = serde_json::from_value(serde_json::json!({
            "status": "success",
            "files": [{"filename": "a.pdf", "encryptedPath": "/out/a.pdf.enc", "status": "success"}],
            "totalProcessed": 1
        }))
        .unwrap();
        let file = &keyed.files.unwrap()[0];
        assert_eq!(file.encrypted_path.as_deref(), Some("/out/a.pdf.enc"));
        assert_eq!(file.length, None);

        let masked: TransformResponse =
            serde_json::from_value(serde_json::json!({"output": "/x/masked_a.csv", "filename": "masked_a.csv"}))
                .unwrap();
        assert_eq!(masked.filename.as_deref(), Some("masked_a.csv"));
    }
}
