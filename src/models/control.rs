//! 字段控制项

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// 对可见字段采取的处理方式，每个字段只有一个槽位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Treatment {
    Mask,
    Obfuscate,
    #[default]
    None,
}

impl Treatment {
    /// 服务端字段 `mode` 的取值，`None` 对应 JSON null
    pub fn as_wire(self) -> Option<&'static str> {
        match self {
            Treatment::Mask => Some("mask"),
            Treatment::Obfuscate => Some("obfuscate"),
            Treatment::None => None,
        }
    }
}

/// 单个字段（列名或识别出的实体）的控制状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldControl {
    pub visible: bool,
    pub treatment: Treatment,
    pub prompt: String,
}

impl FieldControl {
    /// 表格 / 文档 / 音频字段的默认值
    pub fn for_column() -> Self {
        Self {
            visible: true,
            treatment: Treatment::None,
            prompt: String::new(),
        }
    }

    /// 图片实体的默认值
    pub fn for_entity() -> Self {
        Self {
            visible: true,
            treatment: Treatment::Mask,
            prompt: String::new(),
        }
    }
}

/// 提交遮盖请求时序列化的字段选择
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedField {
    pub name: String,
    #[serde(rename = "mode")]
    pub treatment: Option<String>,
    pub prompt: String,
}

impl SelectedField {
    pub fn new(name: &str, control: &FieldControl) -> Self {
        Self {
            name: name.to_string(),
            treatment: control.treatment.as_wire().map(str::to_string),
            prompt: control.prompt.clone(),
        }
    }
}

/// 去掉字段名前的序号前缀（`"3. email"` → `"email"`），只用于展示
pub fn display_label(key: &str) -> String {
    static ORDINAL_PREFIX: OnceLock<Option<Regex>> = OnceLock::new();
    match ORDINAL_PREFIX.get_or_init(|| Regex::new(r"^\d+\.\s").ok()) {
        Some(re) => re.replace(key, "").into_owned(),
        None => key.to_string(),
    }
}
