//! 外部处理服务的端点表

use crate::models::{FileKind, Mode};

/// 分析端点（按文件类别）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisEndpoint {
    CsvHeader,
    PdfHeader,
    ImageEntities,
    Audio,
}

impl AnalysisEndpoint {
    pub fn for_kind(kind: FileKind) -> Self {
        match kind {
            FileKind::Tabular => AnalysisEndpoint::CsvHeader,
            FileKind::Document => AnalysisEndpoint::PdfHeader,
            FileKind::Image => AnalysisEndpoint::ImageEntities,
            FileKind::Audio => AnalysisEndpoint::Audio,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            AnalysisEndpoint::CsvHeader => "/getcsvheader",
            AnalysisEndpoint::PdfHeader => "/getpdfheader",
            AnalysisEndpoint::ImageEntities => "/getimageentities",
            AnalysisEndpoint::Audio => "/getaudio",
        }
    }
}

/// 变换端点（按类别 + 模式）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformEndpoint {
    MaskCsv,
    MaskPdf,
    RedactImage,
    EncryptFile,
    DecryptFile,
}

impl TransformEndpoint {
    /// 选择端点
    ///
    /// 遮盖模式下 csv、pdf 以外的扩展名（包括音频）都走图片脱敏。
    pub fn for_file(mode: Mode, extension: &str) -> Self {
        match mode {
            Mode::Encrypt => TransformEndpoint::EncryptFile,
            Mode::Decrypt => TransformEndpoint::DecryptFile,
            Mode::Obfuscate => match extension {
                "csv" => TransformEndpoint::MaskCsv,
                "pdf" => TransformEndpoint::MaskPdf,
                _ => TransformEndpoint::RedactImage,
            },
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            TransformEndpoint::MaskCsv => "/maskobfcsv",
            TransformEndpoint::MaskPdf => "/maskobfpdf",
            TransformEndpoint::RedactImage => "/redactimage",
            TransformEndpoint::EncryptFile => "/encryptfile",
            TransformEndpoint::DecryptFile => "/decryptfile",
        }
    }
}
