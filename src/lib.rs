//! # QGen
//!
//! 从 PDF 中提取文本，请 LLM 按 2 / 4 / 6 分生成试题，再输出为新的 PDF。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `clients/` - `ChatModel` 能力接口与 OpenAI 兼容的 `LlmClient`
//! - `pdf/` - PDF 文本提取与题目排版输出
//!
//! ### ② 业务能力层（Services）
//! - `services/json_extract` - 清洗模型回复，提取平衡的 JSON 对象
//! - `services/question_service` - `QuestionGenerator`，把回复转成 `QuestionSet`
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/document_flow` - 单个文档：提取 → 生成 → 输出
//!
//! ### ④ 编排层（Orchestration）
//! - `app` - 交互式命令行：列出 PDF、读取选择、运行流程
//!
//! ## 模块结构

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod pdf;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use clients::{ChatModel, LlmClient};
pub use config::Config;
pub use error::{AppError, AppResult, LlmError};
pub use models::{FailureKind, MarkCategory, QuestionSet, Synthesis, SynthesisFailure};
pub use services::QuestionGenerator;
pub use workflow::{process_document, DocumentReport};
