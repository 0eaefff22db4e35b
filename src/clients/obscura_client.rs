/// 处理服务 API 客户端
///
/// 封装所有与外部处理服务相关的调用：表单字段名、端点路径、响应解析
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::HttpExecutor;
use crate::models::UploadedFile;
use crate::services::{
    AnalysisEndpoint, AnalysisResponse, AnalysisService, TransformEndpoint, TransformRequest,
    TransformResponse, TransformService,
};

/// 处理服务客户端
#[derive(Clone)]
pub struct ObscuraClient {
    executor: HttpExecutor,
    output_path_hint: String,
}

impl ObscuraClient {
    /// 创建新的处理服务客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self {
            executor: HttpExecutor::new(&config.api_base_url, config.request_timeout())?,
            output_path_hint: config.output_path_hint.clone(),
        })
    }

    /// 构建基础表单：`file` + `outputPath`
    fn base_form(&self, file: &UploadedFile) -> Form {
        let part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
        Form::new()
            .part("file", part)
            .text("outputPath", self.output_path_hint.clone())
    }
}

#[async_trait]
impl AnalysisService for ObscuraClient {
    async fn analyze(
        &self,
        endpoint: AnalysisEndpoint,
        file: &UploadedFile,
    ) -> AppResult<AnalysisResponse> {
        debug!("分析文件 {} → {}", file.name, endpoint.path());
        let form = self.base_form(file);
        self.executor.post_form_as(endpoint.path(), form).await
    }
}

#[async_trait]
impl TransformService for ObscuraClient {
    async fn transform(
        &self,
        endpoint: TransformEndpoint,
        file: &UploadedFile,
        request: &TransformRequest,
    ) -> AppResult<TransformResponse> {
        let headers = request.headers_json()?;
        debug!("提交文件 {} → {}", file.name, endpoint.path());
        let form = self.base_form(file).text("headers", headers);
        self.executor.post_form_as(endpoint.path(), form).await
    }
}
