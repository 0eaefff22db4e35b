//! 批量文件处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一批文件从加载到交接的完整过程。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：启动日志、创建 ObscuraClient、创建会话
//! 2. **批量加载**：扫描输入目录（`Vec<UploadedFile>`）
//! 3. **分析**：遮盖模式下逐个分析字段（QueueRunner）
//! 4. **密钥**：加解密模式下为每个文件填入配置的密钥
//! 5. **提交**：逐个提交并汇总（SubmissionOrchestrator）
//! 6. **交接**：生成下游查看页地址
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个文件的细节
//! - **资源所有者**：唯一创建 HTTP 客户端的模块
//! - **向下委托**：分析交给 queue_runner，提交交给 submission

use crate::clients::ObscuraClient;
use crate::config::Config;
use crate::models::{display_label, Handoff, HandoffPayload, UploadedFile};
use crate::orchestrator::{QueueRunner, SubmissionOrchestrator};
use crate::services::{AnalysisService, TransformService};
use crate::session::{SessionHandle, UploadSession};
use crate::utils::logging;
use anyhow::Result;
use reqwest::Url;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    session: SessionHandle,
    runner: QueueRunner,
    submitter: SubmissionOrchestrator,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        logging::init_log_file(&config.output_log_file)?;

        logging::log_startup(&config);

        let client = Arc::new(ObscuraClient::new(&config)?);
        Ok(Self::with_services(config, client.clone(), client))
    }

    /// 用给定的服务实现组装应用
    pub fn with_services(
        config: Config,
        analysis: Arc<dyn AnalysisService>,
        transform: Arc<dyn TransformService>,
    ) -> Self {
        let session = UploadSession::shared(config.mode);
        let runner = QueueRunner::new(session.clone(), analysis);
        let submitter =
            SubmissionOrchestrator::new(session.clone(), transform, config.failure_policy);
        Self {
            config,
            session,
            runner,
            submitter,
        }
    }

    pub fn session(&self) -> SessionHandle {
        self.session.clone()
    }

    /// 运行应用主逻辑
    ///
    /// # 返回
    /// 下游查看页地址；输入目录为空时返回 None
    pub async fn run(&self) -> Result<Option<Url>> {
        let mut files = self.load_files().await?;

        if files.is_empty() {
            warn!("⚠️ 没有找到待处理的文件，程序结束");
            return Ok(None);
        }

        let limit = self.config.max_batch_files;
        if limit > 0 && files.len() > limit {
            warn!("⚠️ 文件数 {} 超过上限 {}，只处理前 {} 个", files.len(), limit, limit);
            files.truncate(limit);
        }

        logging::log_files_loaded(files.len(), self.config.mode.requires_analysis());

        let handoff = self.process_files(files).await?;
        let url = handoff.to_url(&self.config.viewer_base_url)?;

        info!("🔗 结果页: {}", url);
        println!("{}", url);
        logging::append_log_line(&self.config.output_log_file, &format!("跳转: {}", url))?;

        Ok(Some(url))
    }

    /// 加载文件
    async fn load_files(&self) -> Result<Vec<UploadedFile>> {
        info!("\n📁 正在扫描待处理的文件...");
        crate::models::load_all_files(&self.config.input_folder).await
    }

    /// 登记、分析、填密钥、提交
    pub async fn process_files(&self, files: Vec<UploadedFile>) -> Result<Handoff> {
        let mode = self.config.mode;
        let indices = {
            let mut session = self.session.lock().await;
            session.set_mode(mode);
            session.append(files)
        };

        if mode.requires_analysis() {
            let stats = self.runner.drain().await;
            logging::log_analysis_complete(&stats);
            if self.config.verbose_logging {
                self.log_selections(&indices).await;
            }
        }

        if mode.uses_keys() {
            if self.config.key.is_empty() {
                warn!("⚠️ 未配置密钥，将以空密钥提交");
            }
            let mut session = self.session.lock().await;
            for &index in &indices {
                session.keys_mut().set_key(index, self.config.key.as_str())?;
            }
        }

        let report = self.submitter.submit().await?;
        logging::print_submission_summary(&report, &self.config.output_log_file);

        if let Some(message) = report.user_message() {
            error!("❌ {}", message);
        }
        let handoff = report.accepted_handoff(self.config.failure_policy)?;
        if !report.is_complete() {
            warn!(
                "⚠️ 部分成功：交接 {}/{} 个文件",
                handoff.payload.len(),
                report.outcomes.len()
            );
        }

        if let HandoffPayload::Filenames(names) = &handoff.payload {
            for name in names {
                info!("⬇️ 下载: {}", self.config.download_url(name));
            }
        }

        Ok(handoff)
    }

    /// 打印每个文件将要提交的字段
    async fn log_selections(&self, indices: &[usize]) {
        let session = self.session.lock().await;
        for &index in indices {
            let Some(file) = session.files().get(index) else {
                continue;
            };
            let labels: Vec<String> = session
                .controls()
                .selected_for(index)
                .iter()
                .map(|field| display_label(&field.name))
                .collect();
            debug!("[文件 #{} {}] 提交字段: {:?}", index, file.name, labels);
        }
    }
}
