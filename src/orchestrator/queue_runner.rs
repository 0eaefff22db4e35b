//! 分析队列消费者 - 编排层
//!
//! ## 职责
//!
//! 按入队顺序逐个取出分析任务，同一时刻只有一个请求在途。
//!
//! ## 设计特点
//!
//! - **状态在会话里**：队列状态机由 `UploadSession` 持有，这里只驱动
//! - **锁不跨 await**：取任务、写结果各加一次锁，网络调用期间不持锁
//! - **可重入**：并发调用 `drain` 时，后来者拿不到任务直接返回
//! - **旧批次作废**：任务完成时批次代号已变化则丢弃结果

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::models::UploadedFile;
use crate::services::AnalysisService;
use crate::session::{SessionHandle, TaskCompletion};
use crate::workflow::{AnalysisFlow, FileCtx};

/// 一次 drain 的统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QueueStats {
    pub applied: usize,
    pub failed: usize,
    pub stale: usize,
}

impl QueueStats {
    pub fn total(&self) -> usize {
        self.applied + self.failed + self.stale
    }
}

/// 分析队列消费者
pub struct QueueRunner {
    session: SessionHandle,
    flow: AnalysisFlow,
}

impl QueueRunner {
    pub fn new(session: SessionHandle, service: Arc<dyn AnalysisService>) -> Self {
        Self {
            session,
            flow: AnalysisFlow::new(service),
        }
    }

    /// 登记文件后立即消费队列
    pub async fn append_and_drain(&self, files: Vec<UploadedFile>) -> (Vec<usize>, QueueStats) {
        let indices = self.session.lock().await.append(files);
        let stats = self.drain().await;
        (indices, stats)
    }

    /// 消费队列直到为空（或另一个消费者正在处理）
    pub async fn drain(&self) -> QueueStats {
        let mut stats = QueueStats::default();

        loop {
            let next = self.session.lock().await.begin_next_task();
            let Some((task, file)) = next else {
                break;
            };

            let ctx = FileCtx::new(&file, task.generation);
            let outcome = self.flow.run(&file, &ctx).await;
            if let Err(e) = &outcome {
                warn!("{} ⚠️ 分析失败: {}", ctx, e);
            }

            let completion = self.session.lock().await.finish_task(task, outcome);
            match completion {
                TaskCompletion::Applied => stats.applied += 1,
                TaskCompletion::Failed => stats.failed += 1,
                TaskCompletion::Stale => {
                    info!("{} 模式已切换，丢弃分析结果", ctx);
                    stats.stale += 1;
                }
            }
        }

        debug!("队列消费结束: {:?}", stats);
        stats
    }
}
