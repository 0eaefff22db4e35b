//! 分析服务 - 业务能力层
//!
//! 只负责"发现一个文件里有哪些字段 / 实体"，不关心队列

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::endpoints::AnalysisEndpoint;
use crate::error::AppResult;
use crate::models::UploadedFile;

/// 分析接口的响应
///
/// 表格 / 文档 / 音频返回 `headers`，图片返回 `entities`。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<String>>,
}

impl AnalysisResponse {
    pub fn headers(headers: &[&str]) -> Self {
        Self {
            headers: Some(headers.iter().map(|s| s.to_string()).collect()),
            entities: None,
        }
    }

    pub fn entities(entities: &[&str]) -> Self {
        Self {
            headers: None,
            entities: Some(entities.iter().map(|s| s.to_string()).collect()),
        }
    }
}

/// 分析服务
///
/// 职责：
/// - 把单个文件发给对应的分析端点
/// - 不出现文件列表
/// - 不写会话状态
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze(
        &self,
        endpoint: AnalysisEndpoint,
        file: &UploadedFile,
    ) -> AppResult<AnalysisResponse>;
}
