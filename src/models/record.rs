use serde::{Deserialize, Serialize};

use super::mode::Mode;

/// 加密 / 解密请求里的单文件描述 `{name, mode, key}`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDescriptor {
    pub name: String,
    pub mode: Mode,
    pub key: String,
}

impl std::fmt::Debug for KeyDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyDescriptor")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// 加密 / 解密后交给结果列表页的单文件记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedFileRecord {
    pub path: String,
    pub filename: String,
    pub status: String,
    pub length: u64,
    pub mode: Mode,
}
