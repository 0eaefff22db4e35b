//! 上传文件与文件类别

use phf::phf_map;
use std::fmt;

/// 文件类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// 表格 (csv)
    Tabular,
    /// 文档 (pdf)
    Document,
    /// 图片
    Image,
    /// 音频
    Audio,
}

/// 扩展名（小写）→ 文件类别
static KIND_BY_EXTENSION: phf::Map<&'static str, FileKind> = phf_map! {
    "csv" => FileKind::Tabular,
    "pdf" => FileKind::Document,
    "jpg" => FileKind::Image,
    "jpeg" => FileKind::Image,
    "png" => FileKind::Image,
    "gif" => FileKind::Image,
    "webp" => FileKind::Image,
    "mp3" => FileKind::Audio,
    "wav" => FileKind::Audio,
};

impl FileKind {
    /// 从扩展名解析类别，不区分大小写
    pub fn from_extension(ext: &str) -> Option<Self> {
        KIND_BY_EXTENSION.get(ext.to_ascii_lowercase().as_str()).copied()
    }

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            FileKind::Tabular => "表格",
            FileKind::Document => "文档",
            FileKind::Image => "图片",
            FileKind::Audio => "音频",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 已上传的文件
///
/// `index` 由 `FileRegistry` 分配，追加式、不复用。
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub index: usize,
    pub name: String,
    pub bytes: Vec<u8>,
    /// 小写扩展名，没有扩展名时为空串
    pub extension: String,
}

impl UploadedFile {
    /// 尚未登记的文件（index 在 append 时重新分配）
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let extension = extension_of(&name);
        Self {
            index: 0,
            name,
            bytes,
            extension,
        }
    }

    /// 文件类别，不支持的扩展名返回 None
    pub fn kind(&self) -> Option<FileKind> {
        FileKind::from_extension(&self.extension)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedFile")
            .field("index", &self.index)
            .field("name", &self.name)
            .field("extension", &self.extension)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// 取文件名最后一个 `.` 之后的部分并转小写
pub fn extension_of(name: &str) -> String {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default()
}
