//! # Obscura Upload
//!
//! 敏感文件上传编排：字段分析、遮盖 / 加密 / 解密提交、结果交接
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（HTTP 连接池），只暴露能力
//! - `HttpExecutor` - 唯一的 reqwest client owner，提供表单 POST 能力
//!
//! ### ② 业务能力层（Services / Clients）
//! - `services/` - 描述"我能做什么"，只处理单个文件
//! - `AnalysisService` - 字段 / 实体分析能力
//! - `TransformService` - 遮盖 / 加密 / 解密能力
//! - `clients/ObscuraClient` - 两种能力的 HTTP 实现
//!
//! ### ③ 会话层（Session）
//! - `session/` - 文件登记、字段控制、密钥、分析队列、模式
//! - 只做同步状态迁移，模式切换一次清空全部状态
//!
//! ### ④ 流程层（Workflow）
//! - `workflow/` - 定义"一个文件"的完整处理流程
//! - `FileCtx` - 上下文封装（文件序号 + 批次代号）
//! - `AnalysisFlow` / `SubmitFlow` - 分析流程 / 提交流程
//!
//! ### ⑤ 编排层（Orchestration）
//! - `orchestrator/queue_runner` - 分析队列消费者，同一时刻一个请求
//! - `orchestrator/submission` - 批量提交与失败策略
//! - `orchestrator/batch_processor` - 应用入口，加载目录并跑完整流程
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod session;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::ObscuraClient;
pub use config::{Config, FailurePolicy};
pub use error::{AppError, AppResult};
pub use infrastructure::HttpExecutor;
pub use models::{Destination, Handoff, HandoffPayload, Mode, UploadedFile};
pub use orchestrator::{App, QueueRunner, SubmissionOrchestrator, SubmissionReport};
pub use session::{SessionHandle, UploadSession};
pub use workflow::{AnalysisFlow, FileCtx, SubmitFlow};
