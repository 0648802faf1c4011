//! 题目生成服务 - 业务能力层
//!
//! 把原文交给 LLM，把它的自由文本回复转换成校验过的 [`QuestionSet`]。
//! 任何一步出错都不会向上抛出，而是变成 [`Synthesis::Failed`]。
//!
//! 流程：
//! 1. 空文本直接返回三个空类别（不调用模型）
//! 2. 调用模型（单次，无重试）
//! 3. 去掉 markdown 代码块标记
//! 4. 提取第一个平衡的 JSON 对象
//! 5. 解析 JSON
//! 6. 校验结构，缺失或为 null 的类别补为空列表

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::clients::ChatModel;
use crate::models::{FailureKind, QuestionSet, Synthesis, SynthesisFailure};
use crate::services::json_extract::{extract_balanced_json, strip_code_fences};
use crate::utils::logging::truncate_text;

/// 发给模型的系统指令
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant. Create questions from the given text with weightage 2 marks, 4 marks, and 6 marks. \
Return the output strictly as a JSON object with keys '2_marks', '4_marks', '6_marks' and lists of questions as values. Do NOT include any extra text.";

/// 题目生成服务
pub struct QuestionGenerator<M> {
    model: M,
}

impl<M: ChatModel> QuestionGenerator<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    #[cfg(test)]
    fn model(&self) -> &M {
        &self.model
    }

    /// 根据原文生成按分值分组的题目
    pub async fn generate(&self, text: &str) -> Synthesis {
        if text.trim().is_empty() {
            debug!("原文为空，跳过 LLM 调用");
            return Synthesis::Generated(QuestionSet::empty());
        }

        info!(
            "🤖 正在调用 {} 生成题目（原文 {} 字符）...",
            self.model.model_name(),
            text.chars().count()
        );

        let reply = match self.model.chat(SYSTEM_PROMPT, text).await {
            Ok(reply) => reply,
            Err(e) => {
                return Synthesis::Failed(SynthesisFailure::new(
                    FailureKind::Invocation,
                    format!("LLM invocation failed: {}", e),
                    None,
                ));
            }
        };

        debug!("LLM 原始回复: {}", truncate_text(&reply, 200));

        parse_reply(&reply)
    }
}

/// 把模型回复转换成题目集合（步骤 3-6）
pub fn parse_reply(reply: &str) -> Synthesis {
    let cleaned = strip_code_fences(reply);

    let Some(json_str) = extract_balanced_json(&cleaned) else {
        warn!("⚠️ LLM 回复中没有找到 JSON 对象");
        return Synthesis::Failed(SynthesisFailure::new(
            FailureKind::NoJsonObject,
            "no JSON object found",
            Some(cleaned.into_owned()),
        ));
    };

    let value: Value = match serde_json::from_str(json_str) {
        Ok(value) => value,
        Err(e) => {
            warn!("⚠️ JSON 解析失败: {}", e);
            return Synthesis::Failed(SynthesisFailure::new(
                FailureKind::InvalidJson,
                format!("JSON decode error: {}", e),
                Some(json_str.to_string()),
            ));
        }
    };

    // 缺失或为 null 的类别补为空列表；其余类别必须是字符串列表
    match serde_json::from_value::<QuestionSet>(value) {
        Ok(set) => {
            info!(
                "✓ 解析完成: 2 分 {} 道, 4 分 {} 道, 6 分 {} 道",
                set.two_marks.len(),
                set.four_marks.len(),
                set.six_marks.len()
            );
            Synthesis::Generated(set)
        }
        Err(e) => {
            warn!("⚠️ JSON 结构不符合要求: {}", e);
            Synthesis::Failed(SynthesisFailure::new(
                FailureKind::InvalidStructure,
                format!("unexpected question structure: {}", e),
                Some(json_str.to_string()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 返回固定内容的模型桩
    struct StubModel {
        reply: Result<String, String>,
        calls: AtomicUsize,
    }

    impl StubModel {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(reason: &str) -> Self {
            Self {
                reply: Err(reason.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ChatModel for StubModel {
        fn model_name(&self) -> &str {
            "stub"
        }

        async fn chat(&self, system_message: &str, _user_message: &str) -> Result<String, LlmError> {
            assert_eq!(system_message, SYSTEM_PROMPT);
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone().map_err(|reason| LlmError::ApiCallFailed {
                model: "stub".to_string(),
                reason,
            })
        }
    }

    #[tokio::test]
    async fn test_blank_text_skips_model() {
        let generator = QuestionGenerator::new(StubModel::replying("{}"));

        for text in ["", "   \n\t "] {
            let result = generator.generate(text).await;
            assert_eq!(result, Synthesis::Generated(QuestionSet::empty()));
        }
        assert_eq!(generator.model().calls(), 0);
    }

    #[tokio::test]
    async fn test_well_formed_reply() {
        let reply = r#"{"2_marks": ["A?"], "4_marks": ["B?"], "6_marks": ["C?", "D?"]}"#;
        let generator = QuestionGenerator::new(StubModel::replying(reply));

        let set = match generator.generate("Photosynthesis converts light.").await {
            Synthesis::Generated(set) => set,
            other => panic!("expected questions, got {:?}", other),
        };
        assert_eq!(set.two_marks, vec!["A?"]);
        assert_eq!(set.four_marks, vec!["B?"]);
        assert_eq!(set.six_marks, vec!["C?", "D?"]);
        assert_eq!(generator.model().calls(), 1);
    }

    #[tokio::test]
    async fn test_missing_key_is_repaired() {
        let reply = r#"{"2_marks": ["A?"], "6_marks": ["C?"]}"#;
        let generator = QuestionGenerator::new(StubModel::replying(reply));

        let set = match generator.generate("text").await {
            Synthesis::Generated(set) => set,
            other => panic!("expected questions, got {:?}", other),
        };
        assert_eq!(set.two_marks, vec!["A?"]);
        assert!(set.four_marks.is_empty());
        assert_eq!(set.six_marks, vec!["C?"]);
    }

    #[tokio::test]
    async fn test_fenced_reply_matches_plain_reply() {
        let plain = r#"{"2_marks": ["A?"], "4_marks": [], "6_marks": ["B?"]}"#;
        let fenced = format!("Here are your questions:\n```json\n{}\n```\nGood luck!", plain);

        let from_plain = QuestionGenerator::new(StubModel::replying(plain))
            .generate("text")
            .await;
        let from_fenced = QuestionGenerator::new(StubModel::replying(&fenced))
            .generate("text")
            .await;

        assert!(!from_plain.is_failure());
        assert_eq!(from_plain, from_fenced);
    }

    #[tokio::test]
    async fn test_invocation_failure_is_reported() {
        let generator = QuestionGenerator::new(StubModel::failing("quota exceeded"));

        let result = generator.generate("text").await;

        let failure = result.failure().expect("expected failure");
        assert_eq!(failure.kind, FailureKind::Invocation);
        assert!(failure.error.starts_with("LLM invocation failed:"));
        assert!(failure.error.contains("quota exceeded"));
        assert_eq!(failure.raw, None);
        assert_eq!(result.into_question_set(), QuestionSet::empty());
    }

    #[tokio::test]
    async fn test_reply_without_json() {
        let generator = QuestionGenerator::new(StubModel::replying("```\nI cannot help with that.\n```"));

        let result = generator.generate("text").await;

        let failure = result.failure().expect("expected failure");
        assert_eq!(failure.kind, FailureKind::NoJsonObject);
        assert_eq!(failure.error, "no JSON object found");
        assert_eq!(failure.raw.as_deref(), Some("I cannot help with that.\n"));
    }

    #[tokio::test]
    async fn test_malformed_json_keeps_offending_text() {
        let generator = QuestionGenerator::new(StubModel::replying(r#"{"2_marks": ["A?",]}"#));

        let result = generator.generate("text").await;

        let failure = result.failure().expect("expected failure");
        assert_eq!(failure.kind, FailureKind::InvalidJson);
        assert!(failure.error.starts_with("JSON decode error:"));
        assert_eq!(failure.raw.as_deref(), Some(r#"{"2_marks": ["A?",]}"#));
    }

    #[tokio::test]
    async fn test_null_category_keeps_other_categories() {
        let generator = QuestionGenerator::new(StubModel::replying(r#"{"2_marks": null, "4_marks": ["A"]}"#));

        let set = match generator.generate("text").await {
            Synthesis::Generated(set) => set,
            other => panic!("expected questions, got {:?}", other),
        };
        assert!(set.two_marks.is_empty());
        assert_eq!(set.four_marks, vec!["A"]);
        assert!(set.six_marks.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_value_type_is_rejected() {
        let generator = QuestionGenerator::new(StubModel::replying(r#"{"2_marks": "A?", "4_marks": []}"#));

        let failure = generator
            .generate("text")
            .await
            .failure()
            .cloned()
            .expect("expected failure");
        assert_eq!(failure.kind, FailureKind::InvalidStructure);
        assert!(failure.raw.is_some());
    }

    #[tokio::test]
    async fn test_identical_replies_give_identical_sets() {
        let reply = "```json\n{\"6_marks\": [\"Explain { braces }.\"], \"2_marks\": [\"Q1\"]}\n```";
        let generator = QuestionGenerator::new(StubModel::replying(reply));

        let first = generator.generate("same text").await.into_question_set();
        let second = generator.generate("same text").await.into_question_set();

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(generator.model().calls(), 2);
    }
}
