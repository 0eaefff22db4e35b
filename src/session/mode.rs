//! 模式控制
//!
//! 每次真正的模式切换都会递增批次代号 (generation)；
//! 在途任务携带旧代号，完成时据此判断结果是否作废。

use crate::models::Mode;

#[derive(Debug, Default)]
pub struct ModeController {
    current: Mode,
    generation: u64,
}

impl ModeController {
    pub fn new(mode: Mode) -> Self {
        Self {
            current: mode,
            generation: 0,
        }
    }

    pub fn current(&self) -> Mode {
        self.current
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 切换模式，返回是否发生了变化；相同模式不递增代号
    pub(crate) fn switch(&mut self, next: Mode) -> bool {
        if next == self.current {
            return false;
        }
        self.current = next;
        self.generation += 1;
        true
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}
