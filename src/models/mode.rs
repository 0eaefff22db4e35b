//! 处理模式与下游页面

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 处理模式（三选一）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// 敏感信息遮盖 / 混淆
    #[default]
    Obfuscate,
    /// 加密
    Encrypt,
    /// 解密
    Decrypt,
}

impl Mode {
    /// 该模式下上传的文件是否需要先做分析
    pub fn requires_analysis(self) -> bool {
        matches!(self, Mode::Obfuscate)
    }

    /// 该模式是否按文件收集密钥
    pub fn uses_keys(self) -> bool {
        matches!(self, Mode::Encrypt | Mode::Decrypt)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Obfuscate => "obfuscate",
            Mode::Encrypt => "encrypt",
            Mode::Decrypt => "decrypt",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "obfuscate" => Ok(Mode::Obfuscate),
            "encrypt" => Ok(Mode::Encrypt),
            "decrypt" => Ok(Mode::Decrypt),
            _ => Err(ConfigError::InvalidValue {
                key: "mode".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// 提交完成后跳转的下游页面
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// 加密 / 解密结果列表页
    EncryptedFileViewer,
    /// PDF 查看页
    DocumentViewer,
    /// CSV 查看页
    TabularViewer,
}

impl Destination {
    /// 路由路径
    pub fn path(self) -> &'static str {
        match self {
            Destination::EncryptedFileViewer => "/ase-viewer",
            Destination::DocumentViewer => "/pdf-viewer",
            Destination::TabularViewer => "/csv-viewer",
        }
    }

    /// 计算跳转目标
    ///
    /// 加密 / 解密固定跳结果列表页；遮盖模式只看第一个文件的扩展名，
    /// 混合类型的批次也一样。
    pub fn for_batch(mode: Mode, first_extension: Option<&str>) -> Self {
        if mode.uses_keys() {
            return Destination::EncryptedFileViewer;
        }
        match first_extension {
            Some("pdf") => Destination::DocumentViewer,
            _ => Destination::TabularViewer,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!("Encrypt".parse::<Mode>().unwrap(), Mode::Encrypt);
        assert_eq!(" decrypt ".parse::<Mode>().unwrap(), Mode::Decrypt);
        assert!("shred".parse::<Mode>().is_err());
    }

    #[test]
    fn test_destination_first_file_only() {
        assert_eq!(
            Destination::for_batch(Mode::Obfuscate, Some("pdf")),
            Destination::DocumentViewer
        );
        assert_eq!(
            Destination::for_batch(Mode::Obfuscate, Some("csv")),
            Destination::TabularViewer
        );
        assert_eq!(
            Destination::for_batch(Mode::Obfuscate, None),
            Destination::TabularViewer
        );
        assert_eq!(
            Destination::for_batch(Mode::Decrypt, Some("pdf")),
            Destination::EncryptedFileViewer
        );
    }
}
