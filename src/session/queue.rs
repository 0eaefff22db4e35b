//! 分析任务队列
//!
//! 显式状态机 `Idle | Servicing(task)`：只有 `begin_next` 能进入
//! `Servicing`，只有对应任务的 `complete` 能回到 `Idle`，
//! 因此同一时刻最多一个任务在处理中。

use std::collections::VecDeque;

use crate::models::Mode;

/// 待分析的文件，带入队时的批次代号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingTask {
    pub file_index: usize,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueueState {
    #[default]
    Idle,
    Servicing(ProcessingTask),
}

#[derive(Debug, Default)]
pub struct ProcessingQueue {
    pending: VecDeque<ProcessingTask>,
    state: QueueState,
}

impl ProcessingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加到队尾，保持顺序；模式不需要分析时什么都不做
    pub fn enqueue(&mut self, mode: Mode, indices: &[usize], generation: u64) -> usize {
        if !mode.requires_analysis() {
            return 0;
        }
        self.pending.extend(indices.iter().map(|&file_index| ProcessingTask {
            file_index,
            generation,
        }));
        indices.len()
    }

    /// 空闲且队列非空时取出队首并进入 `Servicing`
    pub fn begin_next(&mut self) -> Option<ProcessingTask> {
        if self.is_busy() {
            return None;
        }
        let task = self.pending.pop_front()?;
        self.state = QueueState::Servicing(task);
        Some(task)
    }

    /// 任务结束（成功或失败），只有正在处理的那个任务才能让队列回到空闲
    pub fn complete(&mut self, task: &ProcessingTask) -> bool {
        match self.state {
            QueueState::Servicing(current) if current == *task => {
                self.state = QueueState::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn state(&self) -> QueueState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, QueueState::Servicing(_))
    }

    /// 排队中或处理中
    pub fn is_pending(&self, file_index: usize) -> bool {
        matches!(self.state, QueueState::Servicing(t) if t.file_index == file_index)
            || self.pending.iter().any(|t| t.file_index == file_index)
    }

    /// 剩余数量（含处理中的那个）
    pub fn remaining(&self) -> usize {
        self.pending.len() + usize::from(self.is_busy())
    }

    pub(crate) fn clear(&mut self) {
        self.pending.clear();
        self.state = QueueState::Idle;
    }
}
