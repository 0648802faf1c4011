//! 单个文档的处理流程 - 流程层
//!
//! 流程顺序：提取文本 → 生成题目 → 写出 PDF
//!
//! 源文件打不开时直接返回错误，不写输出；题目生成失败则照常输出
//! （各类别显示占位文字），失败原因记录在报告中。

use std::path::{Path, PathBuf};
use tracing::{error, warn};

use crate::clients::ChatModel;
use crate::error::AppResult;
use crate::models::{QuestionSet, SynthesisFailure};
use crate::pdf;
use crate::services::QuestionGenerator;
use crate::utils::logging::{log_document_complete, log_document_start, truncate_text};

/// 单个文档的处理结果
#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub source: PathBuf,
    pub output: PathBuf,
    /// 实际写入输出文件的题目（失败时为空集合）
    pub questions: QuestionSet,
    /// 题目生成失败的原因
    pub failure: Option<SynthesisFailure>,
}

/// 输出文件路径：`<源文件名>_questions.pdf`
pub fn output_path_for(source: &Path, output_dir: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();
    output_dir.join(format!("{}_questions.pdf", stem))
}

/// 处理单个 PDF
pub async fn process_document<M: ChatModel>(
    generator: &QuestionGenerator<M>,
    source: &Path,
    output_dir: &Path,
) -> AppResult<DocumentReport> {
    let text = pdf::extract_text(source)?;

    let name = source
        .file_name()
        .unwrap_or_default()
        .to_string_lossy();
    log_document_start(&name, text.chars().count());

    let synthesis = generator.generate(&text).await;

    let failure = synthesis.failure().cloned();
    if let Some(failure) = &failure {
        error!("❌ 题目生成失败: {}", failure.error);
        if let Some(raw) = &failure.raw {
            warn!("原始回复: {}", truncate_text(raw, 300));
        }
    }

    let questions = synthesis.into_question_set();
    let output = output_path_for(source, output_dir);
    pdf::render_questions(&questions, &output)?;

    log_document_complete(&output.display().to_string(), questions.total());

    Ok(DocumentReport {
        source: source.to_path_buf(),
        output,
        questions,
        failure,
    })
}
