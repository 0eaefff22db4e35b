//! 文件登记表
//!
//! 追加式，序号从 0 开始连续分配，除整体重置外从不删除或复用。

use crate::models::UploadedFile;

#[derive(Debug, Default)]
pub struct FileRegistry {
    files: Vec<UploadedFile>,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一批文件，返回分配到的序号
    ///
    /// 序号从当前文件数开始递增；不限制总数。
    pub fn append(&mut self, files: Vec<UploadedFile>) -> Vec<usize> {
        let start = self.files.len();
        let mut assigned = Vec::with_capacity(files.len());
        for (offset, mut file) in files.into_iter().enumerate() {
            file.index = start + offset;
            assigned.push(file.index);
            self.files.push(file);
        }
        assigned
    }

    pub fn get(&self, index: usize) -> Option<&UploadedFile> {
        self.files.get(index)
    }

    /// 按序号顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = &UploadedFile> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.files.clear();
    }
}
