//! 提交结果向下游页面的交接
//!
//! 下游页面从 `?files=<url 编码的 JSON>` 读取结果列表。

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::mode::Destination;
use super::record::ProcessedFileRecord;
use crate::error::AppResult;

/// 交接给下游页面的结果列表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HandoffPayload {
    /// 遮盖模式：只有输出文件名
    Filenames(Vec<String>),
    /// 加密 / 解密模式：完整记录
    Records(Vec<ProcessedFileRecord>),
}

/// 单个文件提交后可交接的产物
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandoffItem {
    Filename(String),
    Record(ProcessedFileRecord),
}

impl HandoffPayload {
    /// 按提交顺序汇总；加解密模式只收记录，遮盖模式只收文件名
    pub fn collect(uses_keys: bool, items: impl IntoIterator<Item = HandoffItem>) -> Self {
        let items = items.into_iter();
        if uses_keys {
            HandoffPayload::Records(
                items
                    .filter_map(|item| match item {
                        HandoffItem::Record(r) => Some(r),
                        HandoffItem::Filename(_) => None,
                    })
                    .collect(),
            )
        } else {
            HandoffPayload::Filenames(
                items
                    .filter_map(|item| match item {
                        HandoffItem::Filename(f) => Some(f),
                        HandoffItem::Record(_) => None,
                    })
                    .collect(),
            )
        }
    }

    pub fn len(&self) -> usize {
        match self {
            HandoffPayload::Filenames(v) => v.len(),
            HandoffPayload::Records(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for HandoffPayload {
    fn default() -> Self {
        HandoffPayload::Filenames(Vec::new())
    }
}

/// 跳转目标 + 结果列表
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Handoff {
    pub destination: Destination,
    pub payload: HandoffPayload,
}

impl Handoff {
    /// 拼出 `{viewer_base}{route}?files=...`
    pub fn to_url(&self, viewer_base_url: &str) -> AppResult<Url> {
        let files = serde_json::to_string(&self.payload)?;
        let base = format!(
            "{}{}",
            viewer_base_url.trim_end_matches('/'),
            self.destination.path()
        );
        let url = Url::parse_with_params(&base, &[("files", files.as_str())])
            .map_err(|e| crate::error::AppError::Other(format!("无效的页面地址 {}: {}", base, e)))?;
        Ok(url)
    }

    /// 下游页面解析 `files` 参数
    ///
    /// 缺失或格式错误时记日志并按"没有文件"处理，不向用户报错。
    pub fn parse_files(url: &Url) -> HandoffPayload {
        let Some((_, raw)) = url.query_pairs().find(|(k, _)| k == "files") else {
            return HandoffPayload::default();
        };
        match serde_json::from_str::<HandoffPayload>(&raw) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("⚠️ 无法解析 files 参数: {}", e);
                HandoffPayload::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mode;

    #[test]
    fn test_url_carries_payload() {
        let handoff = Handoff {
            destination: Destination::EncryptedFileViewer,
            payload: HandoffPayload::Records(vec![ProcessedFileRecord {
                path: "/out/a.csv.enc".to_string(),
                filename: "a.csv".to_string(),
                status: "success".to_string(),
                length: 1,
                mode: Mode::Encrypt,
            }]),
        };

        let url = handoff.to_url("http://localhost:3000/").unwrap();
        assert_eq!(url.path(), "/ase-viewer");
        assert_eq!(Handoff::parse_files(&url), handoff.payload);
    }

    #[test]
    fn test_filenames_payload() {
        let handoff = Handoff {
            destination: Destination::TabularViewer,
            payload: HandoffPayload::Filenames(vec!["masked_a.csv".to_string()]),
        };
        let url = handoff.to_url("http://localhost:3000").unwrap();
        assert_eq!(url.path(), "/csv-viewer");
        assert_eq!(
            Handoff::parse_files(&url),
            HandoffPayload::Filenames(vec!["masked_a.csv".to_string()])
        );
    }

    #[test]
    fn test_malformed_files_param_means_no_files() {
        let url = Url::parse("http://localhost:3000/pdf-viewer?files=%7Bnot-json").unwrap();
        assert!(Handoff::parse_files(&url).is_empty());

        let missing = Url::parse("http://localhost:3000/pdf-viewer").unwrap();
        assert!(Handoff::parse_files(&missing).is_empty());
    }
}
