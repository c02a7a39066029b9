//! Question bank
//!
//! Question types and the TOML loader with category/difficulty/id filtering.

mod loader;
mod question;

pub use loader::{QuestionFilter, QuestionLoader, QuestionStatistics};
pub use question::{
    Category, Difficulty, EvaluationMethod, EvaluationPolicy, ExpectedAnswer, Question,
    ToleranceKind,
};
