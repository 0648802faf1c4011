//! PDF 文本提取
//!
//! 基于 `lopdf`，按页序提取文本，页与页之间用一个换行分隔。

use lopdf::Document;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};

/// 提取 PDF 全部页面的纯文本
///
/// 无法打开的文件返回 [`AppError::DocumentOpen`]。
/// 单页提取失败时该页按空文本处理；整份文档没有文本时返回空字符串。
pub fn extract_text(path: &Path) -> AppResult<String> {
    let doc = Document::load(path).map_err(|e| AppError::document_open(path.display().to_string(), e))?;

    // get_pages 返回 BTreeMap，页码天然有序
    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    debug!("{} 共 {} 页", path.display(), page_numbers.len());

    let pages: Vec<String> = page_numbers
        .iter()
        .map(|&page| {
            doc.extract_text(&[page]).unwrap_or_else(|e| {
                warn!("⚠️ 第 {} 页文本提取失败: {}", page, e);
                String::new()
            })
        })
        .collect();

    Ok(pages.join("\n").trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_open_failure() {
        let err = extract_text(Path::new("definitely/not/here.pdf")).unwrap_err();
        assert!(matches!(err, AppError::DocumentOpen { .. }));
    }

    #[test]
    fn test_garbage_file_is_open_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let err = extract_text(&path).unwrap_err();
        assert!(matches!(err, AppError::DocumentOpen { .. }));
    }
}
