pub mod question_set;

pub use question_set::{FailureKind, MarkCategory, QuestionSet, Synthesis, SynthesisFailure};
