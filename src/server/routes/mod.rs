mod categories;
mod questions;
mod quizzes;

use std::collections::BTreeMap;

use axum::Json;
use serde::Serialize;

use crate::db::{Category, Question};

use super::error::ApiError;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;

pub type ApiResponse<T> = Result<Json<Success<T>>, ApiError>;

/// `{"success": true, ...body}`
#[derive(Debug, Serialize)]
pub struct Success<T> {
    success: bool,
    #[serde(flatten)]
    body: T,
}

pub fn success<T>(body: T) -> Json<Success<T>> {
    Json(Success {
        success: true,
        body,
    })
}

/// Category id to its display name. Serialized as a JSON object keyed by id.
pub type CategoryMap = BTreeMap<i64, String>;

pub fn category_map(categories: Vec<Category>) -> CategoryMap {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}

#[derive(Debug, Serialize)]
pub struct QuestionList {
    questions: Vec<Question>,
    total_questions: usize,
    current_category: Option<String>,
}

impl QuestionList {
    pub fn new(questions: Vec<Question>, current_category: Option<String>) -> Self {
        Self {
            total_questions: questions.len(),
            questions,
            current_category,
        }
    }
}
