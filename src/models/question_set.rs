use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// 题目分值类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkCategory {
    TwoMarks,
    FourMarks,
    SixMarks,
}

impl MarkCategory {
    /// 固定展示顺序
    pub const ALL: [MarkCategory; 3] = [
        MarkCategory::TwoMarks,
        MarkCategory::FourMarks,
        MarkCategory::SixMarks,
    ];

    /// JSON 中的键名
    pub fn key(self) -> &'static str {
        match self {
            MarkCategory::TwoMarks => "2_marks",
            MarkCategory::FourMarks => "4_marks",
            MarkCategory::SixMarks => "6_marks",
        }
    }

    /// 输出文档中的小节标题，如 `2_MARKS:`
    pub fn heading(self) -> String {
        format!("{}:", self.key().to_uppercase())
    }
}

impl fmt::Display for MarkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// 按分值分组的题目集合
///
/// 三个类别始终存在；模型没有给出的类别、或值为 `null` 的类别，
/// 在反序列化时补为空列表。其他多余的键会被忽略。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSet {
    #[serde(rename = "2_marks", default, deserialize_with = "null_as_empty")]
    pub two_marks: Vec<String>,
    #[serde(rename = "4_marks", default, deserialize_with = "null_as_empty")]
    pub four_marks: Vec<String>,
    #[serde(rename = "6_marks", default, deserialize_with = "null_as_empty")]
    pub six_marks: Vec<String>,
}

// 类别值为 null 时按空列表处理；其他非字符串列表的值仍然报错
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl QuestionSet {
    /// 三个类别都为空的集合
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn questions(&self, category: MarkCategory) -> &[String] {
        match category {
            MarkCategory::TwoMarks => &self.two_marks,
            MarkCategory::FourMarks => &self.four_marks,
            MarkCategory::SixMarks => &self.six_marks,
        }
    }

    /// 按固定顺序遍历 (类别, 题目列表)
    pub fn iter(&self) -> impl Iterator<Item = (MarkCategory, &[String])> + '_ {
        MarkCategory::ALL
            .into_iter()
            .map(move |category| (category, self.questions(category)))
    }

    /// 题目总数
    pub fn total(&self) -> usize {
        self.two_marks.len() + self.four_marks.len() + self.six_marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// 失败发生在哪一步
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 调用模型本身失败
    Invocation,
    /// 回复中找不到完整的 JSON 对象
    NoJsonObject,
    /// 找到的对象不是合法 JSON
    InvalidJson,
    /// JSON 合法，但某个类别的值不是字符串列表
    InvalidStructure,
}

/// 题目生成失败的描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisFailure {
    pub kind: FailureKind,
    pub error: String,
    /// 无法解析的原始文本（调用失败时为空）
    pub raw: Option<String>,
}

impl SynthesisFailure {
    pub fn new(kind: FailureKind, error: impl Into<String>, raw: Option<String>) -> Self {
        Self {
            kind,
            error: error.into(),
            raw,
        }
    }
}

impl fmt::Display for SynthesisFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.error)
    }
}

/// 一次题目生成的结果：要么是完整的题目集合，要么是失败描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Synthesis {
    Generated(QuestionSet),
    Failed(SynthesisFailure),
}

impl Synthesis {
    pub fn is_failure(&self) -> bool {
        matches!(self, Synthesis::Failed(_))
    }

    pub fn failure(&self) -> Option<&SynthesisFailure> {
        match self {
            Synthesis::Failed(failure) => Some(failure),
            Synthesis::Generated(_) => None,
        }
    }

    /// 渲染前补全：失败结果退化为三个空类别
    pub fn into_question_set(self) -> QuestionSet {
        match self {
            Synthesis::Generated(set) => set,
            Synthesis::Failed(_) => QuestionSet::empty(),
        }
    }
}
