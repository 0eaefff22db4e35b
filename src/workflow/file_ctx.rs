//! 文件处理上下文
//!
//! 封装"我正在处理哪一批的第几个文件"这一信息

use std::fmt::Display;

use crate::models::{FileKind, UploadedFile};

/// 文件处理上下文
///
/// 包含处理单个文件所需的所有上下文信息
#[derive(Debug, Clone)]
pub struct FileCtx {
    /// 文件序号（从0开始）
    pub file_index: usize,

    /// 文件名（仅用于日志显示）
    pub name: String,

    /// 文件类别，不支持的扩展名为 None
    pub kind: Option<FileKind>,

    /// 任务创建时的批次代号
    pub generation: u64,
}

impl FileCtx {
    /// 创建新的文件上下文
    pub fn new(file: &UploadedFile, generation: u64) -> Self {
        Self {
            file_index: file.index,
            name: file.name.clone(),
            kind: file.kind(),
            generation,
        }
    }
}

impl Display for FileCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[文件 #{} {}]", self.file_index, self.name)
    }
}
