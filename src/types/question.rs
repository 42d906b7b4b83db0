use serde::{Deserialize, Serialize};

use handle_errors::Error;

use crate::types::category::CategoryId;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Question {
    pub id: QuestionId,
    #[serde(rename = "question")]
    pub text: String,
    pub answer: String,
    pub category: CategoryId,
    pub difficulty: i32,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct QuestionId(pub i32);

/// Body of a create request. Every field is optional on the wire so that a
/// partial body is reported as an invalid question rather than a decode error.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct NewQuestion {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<CategoryId>,
    pub difficulty: Option<i32>,
}

/// A create request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidQuestion {
    pub text: String,
    pub answer: String,
    pub category: CategoryId,
    pub difficulty: i32,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl NewQuestion {
    pub fn validate(self) -> Result<ValidQuestion, Error> {
        match (
            non_blank(self.question),
            non_blank(self.answer),
            self.category,
            self.difficulty,
        ) {
            (Some(text), Some(answer), Some(category), Some(difficulty)) => Ok(ValidQuestion {
                text,
                answer,
                category,
                difficulty,
            }),
            _ => Err(Error::InvalidQuestion),
        }
    }
}
