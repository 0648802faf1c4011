//! PDF 读写（基础设施层）

pub mod reader;
pub mod writer;

pub use reader::extract_text;
pub use writer::{render_questions, wrap_text, EMPTY_PLACEHOLDER, MAX_LINE_CHARS};
