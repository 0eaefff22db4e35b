//! 文件分析流程 - 流程层
//!
//! 核心职责：定义"一个文件"的分析流程
//!
//! 流程顺序：
//! 1. 按扩展名选端点（不支持的直接失败，不发请求）
//! 2. 调用分析服务
//! 3. 按类别把字段 / 实体转换成带默认值的控制项

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{FileKind, UploadedFile};
use crate::services::{AnalysisEndpoint, AnalysisService};
use crate::session::AnalysisRecord;
use crate::workflow::file_ctx::FileCtx;

/// 文件分析流程
///
/// - 不持有会话状态
/// - 只依赖分析能力（services）
pub struct AnalysisFlow {
    service: Arc<dyn AnalysisService>,
}

impl AnalysisFlow {
    /// 创建新的分析流程
    pub fn new(service: Arc<dyn AnalysisService>) -> Self {
        Self { service }
    }

    pub async fn run(&self, file: &UploadedFile, ctx: &FileCtx) -> AppResult<AnalysisRecord> {
        let Some(kind) = ctx.kind else {
            warn!("{} ⚠️ 不支持的文件类型，跳过分析", ctx);
            return Err(AppError::unsupported_type(&file.name));
        };

        let endpoint = AnalysisEndpoint::for_kind(kind);
        info!("{} 🔍 正在分析 ({})...", ctx, kind);

        let response = self.service.analyze(endpoint, file).await?;

        let record = match kind {
            // 图片没有 entities 时按空列表处理
            FileKind::Image => AnalysisRecord::from_entities(response.entities.unwrap_or_default()),
            FileKind::Tabular | FileKind::Document | FileKind::Audio => {
                let headers = response
                    .headers
                    .ok_or_else(|| AppError::missing_field(endpoint.path(), "headers"))?;
                AnalysisRecord::from_columns(headers)
            }
        };

        info!("{} ✓ 分析完成，发现 {} 个可选字段", ctx, record.len());
        Ok(record)
    }
}
