//! 文件提交流程 - 流程层
//!
//! 核心职责：定义"一个文件"的提交流程
//!
//! 流程顺序：
//! 1. 从会话构建请求（遮盖：字段选择；加解密：密钥描述）
//! 2. 选端点并调用变换服务
//! 3. 把响应映射成可交接的产物

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::AppResult;
use crate::models::{HandoffItem, Mode, ProcessedFileRecord, UploadedFile};
use crate::services::{TransformEndpoint, TransformRequest, TransformResponse, TransformService};
use crate::session::UploadSession;
use crate::workflow::file_ctx::FileCtx;

/// 文件提交流程
pub struct SubmitFlow {
    service: Arc<dyn TransformService>,
}

impl SubmitFlow {
    /// 创建新的提交流程
    pub fn new(service: Arc<dyn TransformService>) -> Self {
        Self { service }
    }

    /// 从会话构建单个文件的请求
    ///
    /// 加解密模式不校验密钥是否为空。
    pub fn build_request(session: &UploadSession, file: &UploadedFile) -> TransformRequest {
        let mode = session.mode();
        if mode.uses_keys() {
            TransformRequest::Keyed(session.keys().descriptor(file.index, &file.name, mode))
        } else {
            TransformRequest::Obfuscate(session.controls().selected_for(file.index))
        }
    }

    /// 提交单个文件
    ///
    /// # 返回
    /// 响应里有可用产物时返回 `Some`，否则 `None`
    pub async fn run(
        &self,
        mode: Mode,
        file: &UploadedFile,
        request: &TransformRequest,
        ctx: &FileCtx,
    ) -> AppResult<Option<HandoffItem>> {
        let endpoint = TransformEndpoint::for_file(mode, &file.extension);
        info!("{} 📤 正在提交到 {}...", ctx, endpoint.path());

        let response = self.service.transform(endpoint, file, request).await?;

        let item = map_response(mode, file, response);
        match &item {
            Some(_) => info!("{} ✓ 提交成功", ctx),
            None => warn!("{} ⚠️ 响应中没有可用的文件描述", ctx),
        }
        Ok(item)
    }
}

/// 把响应映射为产物
///
/// 加解密取 `files` 的第一个描述并补默认值（缺失、空串、0 都算没有）；
/// 遮盖只保留 `filename`。
pub fn map_response(
    mode: Mode,
    file: &UploadedFile,
    response: TransformResponse,
) -> Option<HandoffItem> {
    if !mode.uses_keys() {
        return response.filename.map(HandoffItem::Filename);
    }

    let info = response.files?.into_iter().next()?;
    let path = match mode {
        Mode::Encrypt => info.encrypted_path,
        _ => info.decrypted_path,
    };
    Some(HandoffItem::Record(ProcessedFileRecord {
        path: path.unwrap_or_default(),
        filename: info
            .filename
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| file.name.clone()),
        status: info
            .status
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "success".to_string()),
        length: info.length.filter(|&n| n > 0).unwrap_or(1),
        mode,
    }))
}
