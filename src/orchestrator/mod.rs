//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责队列消费和批量提交，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量文件处理器
//! - 管理应用生命周期（初始化、运行）
//! - 批量加载文件（Vec<UploadedFile>）
//! - 创建 HTTP 客户端与会话
//! - 输出全局统计和结果页地址
//!
//! ### `queue_runner` - 分析队列消费者
//! - 按入队顺序逐个分析，同一时刻只有一个请求
//! - 丢弃模式切换前发出的请求结果
//!
//! ### `submission` - 批量提交
//! - 快照请求、按序提交
//! - 失败策略（停止 / 继续）
//! - 汇总 `SubmissionReport`，决定跳转目标
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<UploadedFile>)
//!     ↓
//! queue_runner / submission (驱动 session 状态机)
//!     ↓
//! workflow::AnalysisFlow / SubmitFlow (处理单个文件)
//!     ↓
//! services (能力层：analysis / transform)
//!     ↓
//! infrastructure (基础设施：HttpExecutor)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：batch_processor 管批量，另外两个各管一个阶段
//! 2. **状态集中**：所有状态都在 `UploadSession`，本层只持有句柄
//! 3. **向下依赖**：编排层 → workflow → services → infrastructure

pub mod batch_processor;
pub mod queue_runner;
pub mod submission;

// 重新导出主要类型
pub use batch_processor::App;
pub use queue_runner::{QueueRunner, QueueStats};
pub use submission::{
    FileOutcome, OutcomeKind, SubmissionOrchestrator, SubmissionReport, SUBMISSION_ERROR_MESSAGE,
};
