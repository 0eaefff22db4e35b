//! 每个文件的加解密密钥
//!
//! 密钥在释放时清零，`Debug` 输出不包含明文。

use std::collections::HashMap;
use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{AppResult, SessionError};
use crate::models::{KeyDescriptor, Mode};

/// 释放时清零的密钥字符串
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey(String);

impl SecretKey {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey(<{} chars>)", self.0.chars().count())
    }
}

/// 单个文件的密钥与"是否明文显示"标记
#[derive(Debug, Clone, Default)]
pub struct KeyEntry {
    pub secret: SecretKey,
    pub revealed: bool,
}

#[derive(Debug, Default)]
pub struct KeyStore {
    entries: HashMap<usize, KeyEntry>,
}

impl KeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为新文件建空条目，已有条目不动
    pub fn create_empty(&mut self, index: usize) {
        self.entries.entry(index).or_default();
    }

    pub fn contains(&self, index: usize) -> bool {
        self.entries.contains_key(&index)
    }

    pub fn set_key(&mut self, index: usize, secret: impl Into<String>) -> AppResult<()> {
        self.entry_mut(index)?.secret = SecretKey::new(secret);
        Ok(())
    }

    /// 当前密钥，未设置时为空串
    pub fn key(&self, index: usize) -> &str {
        self.entries
            .get(&index)
            .map(|e| e.secret.expose())
            .unwrap_or("")
    }

    /// 翻转明文显示标记，返回新值
    pub fn toggle_reveal(&mut self, index: usize) -> AppResult<bool> {
        let entry = self.entry_mut(index)?;
        entry.revealed = !entry.revealed;
        Ok(entry.revealed)
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.entries.get(&index).is_some_and(|e| e.revealed)
    }

    /// 展示用文本：隐藏时每个字符显示为 `•`
    pub fn rendered(&self, index: usize) -> String {
        match self.entries.get(&index) {
            Some(entry) if entry.revealed => entry.secret.expose().to_string(),
            Some(entry) => "•".repeat(entry.secret.expose().chars().count()),
            None => String::new(),
        }
    }

    /// 构造 `{name, mode, key}`；不校验密钥是否为空
    pub fn descriptor(&self, index: usize, name: &str, mode: Mode) -> KeyDescriptor {
        KeyDescriptor {
            name: name.to_string(),
            mode,
            key: self.key(index).to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    fn entry_mut(&mut self, index: usize) -> AppResult<&mut KeyEntry> {
        self.entries
            .get_mut(&index)
            .ok_or_else(|| SessionError::UnknownFile { index }.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_entry_lifecycle() {
        let mut keys = KeyStore::new();
        keys.create_empty(0);
        assert_eq!(keys.key(0), "");

        keys.set_key(0, "hunter2").unwrap();
        keys.create_empty(0);
        assert_eq!(keys.key(0), "hunter2");
        assert!(keys.set_key(3, "nope").is_err());
    }

    #[test]
    fn test_reveal_and_render() {
        let mut keys = KeyStore::new();
        keys.create_empty(1);
        keys.set_key(1, "abc").unwrap();
        assert_eq!(keys.rendered(1), "•••");
        assert!(keys.toggle_reveal(1).unwrap());
        assert_eq!(keys.rendered(1), "abc");
        assert!(!keys.toggle_reveal(1).unwrap());
        assert!(!keys.is_revealed(1));
    }

    #[test]
    fn test_debug_hides_secret() {
        let secret = SecretKey::new("top-secret");
        let printed = format!("{:?}", secret);
        assert!(!printed.contains("top-secret"));

        let mut keys = KeyStore::new();
        keys.create_empty(0);
        keys.set_key(0, "top-secret").unwrap();
        let descriptor = keys.descriptor(0, "a.pdf", Mode::Encrypt);
        assert_eq!(descriptor.key, "top-secret");
        assert!(!format!("{:?}", descriptor).contains("top-secret"));
    }
}
