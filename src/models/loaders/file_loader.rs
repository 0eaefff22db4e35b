use crate::error::FileError;
use crate::models::UploadedFile;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 读取单个文件为 UploadedFile
pub async fn load_file(path: &Path) -> Result<UploadedFile> {
    if !path.is_file() {
        return Err(FileError::NotFound {
            path: path.display().to_string(),
        }
        .into());
    }

    let bytes = fs::read(path)
        .await
        .with_context(|| format!("无法读取文件: {}", path.display()))?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .with_context(|| format!("无效的文件路径: {}", path.display()))?;

    Ok(UploadedFile::new(name, bytes))
}

/// 加载文件夹中的所有文件（不递归），按文件名排序
///
/// 读取失败的单个文件只记警告并跳过。
pub async fn load_all_files(folder_path: &str) -> Result<Vec<UploadedFile>> {
    let folder = PathBuf::from(folder_path);

    if !folder.is_dir() {
        return Err(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        }
        .into());
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            paths.push(entry.path());
        }
    }
    paths.sort();

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        match load_file(&path).await {
            Ok(file) => {
                tracing::info!("正在加载: {} ({} 字节)", file.name, file.len());
                files.push(file);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {}", path.display(), e);
            }
        }
    }

    Ok(files)
}
