//! 会话状态层（Session Layer）
//!
//! ## 职责
//!
//! 持有一次上传会话的全部状态，只提供同步的状态迁移，不做任何网络调用。
//!
//! - `registry` - 文件登记表（追加式序号）
//! - `controls` - 每个文件的字段控制项（分析结果）
//! - `keys` - 每个文件的加解密密钥
//! - `queue` - 分析任务队列（状态机）
//! - `mode` - 当前模式 + 批次代号
//!
//! 模式切换是唯一会清空文件的操作，由 `UploadSession::set_mode` 一次完成。
//! 异步层通过 `SessionHandle` 共享会话，锁不跨越 `.await`。

pub mod controls;
pub mod keys;
pub mod mode;
pub mod queue;
pub mod registry;

pub use controls::{AnalysisRecord, ColumnControlStore};
pub use keys::{KeyEntry, KeyStore, SecretKey};
pub use mode::ModeController;
pub use queue::{ProcessingQueue, ProcessingTask, QueueState};
pub use registry::FileRegistry;

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{AppError, AppResult, SessionError};
use crate::models::{Handoff, Mode, UploadedFile};

/// 异步层共享的会话句柄
pub type SessionHandle = Arc<Mutex<UploadSession>>;

/// 文件在界面上的处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// 已有分析结果
    Processed,
    /// 排队中或分析中
    Pending,
    /// 分析失败 / 不支持 / 当前模式不需要分析
    Unprocessed,
}

/// 分析任务完成后的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskCompletion {
    /// 结果已写入
    Applied,
    /// 分析失败，文件保持未处理
    Failed,
    /// 任务属于旧批次，结果被丢弃
    Stale,
}

/// 一次上传会话
#[derive(Debug)]
pub struct UploadSession {
    mode: ModeController,
    registry: FileRegistry,
    controls: ColumnControlStore,
    keys: KeyStore,
    queue: ProcessingQueue,
    /// 当前选中的文件，`None` 等价于 -1
    active: Option<usize>,
    last_handoff: Option<Handoff>,
}

impl UploadSession {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode: ModeController::new(mode),
            registry: FileRegistry::new(),
            controls: ColumnControlStore::new(),
            keys: KeyStore::new(),
            queue: ProcessingQueue::new(),
            active: None,
            last_handoff: None,
        }
    }

    /// 创建共享句柄
    pub fn shared(mode: Mode) -> SessionHandle {
        Arc::new(Mutex::new(Self::new(mode)))
    }

    pub fn mode(&self) -> Mode {
        self.mode.current()
    }

    pub fn generation(&self) -> u64 {
        self.mode.generation()
    }

    /// 切换模式
    ///
    /// 模式不同时清空文件、队列、分析结果、密钥、选中项和上次提交结果，
    /// 并递增批次代号；相同模式什么都不做。
    pub fn set_mode(&mut self, next: Mode) -> bool {
        let previous = self.mode.current();
        if !self.mode.switch(next) {
            return false;
        }
        self.registry.clear();
        self.queue.clear();
        self.controls.clear();
        self.keys.clear();
        self.active = None;
        self.last_handoff = None;
        info!(
            "🔄 模式切换: {} → {} (批次代号 {})",
            previous,
            next,
            self.mode.generation()
        );
        true
    }

    /// 登记一批新文件，返回分配到的序号
    ///
    /// 登记表原本为空时选中第一个新文件；加解密模式下为每个文件建空密钥；
    /// 需要分析的模式下把新序号追加到队尾。
    pub fn append(&mut self, files: Vec<UploadedFile>) -> Vec<usize> {
        if files.is_empty() {
            return Vec::new();
        }
        let was_empty = self.registry.is_empty();
        let indices = self.registry.append(files);

        if was_empty {
            self.active = indices.first().copied();
        }
        let mode = self.mode.current();
        if mode.uses_keys() {
            for &index in &indices {
                self.keys.create_empty(index);
            }
        }
        let queued = self
            .queue
            .enqueue(mode, &indices, self.mode.generation());
        debug!("登记 {} 个文件，入队 {} 个", indices.len(), queued);
        indices
    }

    /// 取出下一个分析任务及其文件；已有任务在处理中时返回 None
    pub fn begin_next_task(&mut self) -> Option<(ProcessingTask, UploadedFile)> {
        let task = self.queue.begin_next()?;
        match self.registry.get(task.file_index) {
            Some(file) => Some((task, file.clone())),
            None => {
                self.queue.complete(&task);
                None
            }
        }
    }

    /// 分析任务结束
    ///
    /// 任务代号与当前不一致时直接丢弃，不动队列也不写结果。
    pub fn finish_task(
        &mut self,
        task: ProcessingTask,
        outcome: AppResult<AnalysisRecord>,
    ) -> TaskCompletion {
        if !self.mode.is_current(task.generation) {
            return TaskCompletion::Stale;
        }
        self.queue.complete(&task);
        match outcome {
            Ok(record) => {
                self.controls.insert(task.file_index, record);
                TaskCompletion::Applied
            }
            Err(_) => TaskCompletion::Failed,
        }
    }

    /// 选中一个文件
    pub fn select_file(&mut self, index: usize) -> AppResult<()> {
        if self.registry.get(index).is_none() {
            return Err(SessionError::UnknownFile { index }.into());
        }
        if !self.is_selectable(index) {
            return Err(SessionError::NotSelectable { index }.into());
        }
        self.active = Some(index);
        Ok(())
    }

    /// 当前有效的选中文件
    ///
    /// 需要分析的模式下只有已完成分析的文件才算有效。
    pub fn active_file(&self) -> Option<usize> {
        self.active.filter(|&i| self.is_selectable(i))
    }

    fn is_selectable(&self, index: usize) -> bool {
        if self.mode.current().requires_analysis() {
            self.controls.is_processed(index)
        } else {
            self.registry.get(index).is_some()
        }
    }

    pub fn status(&self, index: usize) -> FileStatus {
        if self.controls.is_processed(index) {
            FileStatus::Processed
        } else if self.queue.is_pending(index) {
            FileStatus::Pending
        } else {
            FileStatus::Unprocessed
        }
    }

    /// 是否还有分析任务未完成
    pub fn is_processing(&self) -> bool {
        self.queue.remaining() > 0
    }

    pub fn files(&self) -> &FileRegistry {
        &self.registry
    }

    pub fn controls(&self) -> &ColumnControlStore {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut ColumnControlStore {
        &mut self.controls
    }

    pub fn keys(&self) -> &KeyStore {
        &self.keys
    }

    pub fn keys_mut(&mut self) -> &mut KeyStore {
        &mut self.keys
    }

    pub fn queue(&self) -> &ProcessingQueue {
        &self.queue
    }

    /// 记录提交结果；批次代号已变化时拒绝
    pub fn record_submission(&mut self, generation: u64, handoff: Handoff) -> AppResult<()> {
        if !self.mode.is_current(generation) {
            return Err(AppError::Session(SessionError::ModeChanged {
                started: generation,
                current: self.mode.generation(),
            }));
        }
        self.last_handoff = Some(handoff);
        Ok(())
    }

    pub fn last_handoff(&self) -> Option<&Handoff> {
        self.last_handoff.as_ref()
    }
}
