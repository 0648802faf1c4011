pub mod json_extract;
pub mod question_service;

pub use question_service::{parse_reply, QuestionGenerator, SYSTEM_PROMPT};
