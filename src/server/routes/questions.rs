use axum::{
    extract::{Query, State},
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_all_categories, questions},
        NewQuestion, Question,
    },
    server::{
        app::AppState,
        deserializers::deserialize_lenient_page,
        error::ApiError,
        extract::{AppJson, AppPath},
    },
    telemetry::QUESTIONS_CREATED,
};

use super::{category_map, success, ApiResponse, CategoryMap, QuestionList};

pub const QUESTIONS_PER_PAGE: i64 = 10;

#[derive(Debug, Deserialize)]
struct PageQuery {
    #[serde(default, deserialize_with = "deserialize_lenient_page")]
    page: Option<i64>,
}

#[derive(Deserialize)]
struct CreateQuestion {
    question: String,
    answer: String,
    // the frontend posts these from <select> elements, so they may come as strings
    #[serde(deserialize_with = "deserialize_number_from_string")]
    category: i64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    difficulty: i64,
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(rename = "searchTerm")]
    search_term: String,
}

#[derive(Serialize)]
struct QuestionPage {
    questions: Vec<Question>,
    total_questions: i64,
    categories: CategoryMap,
    current_category: Option<String>,
}

#[derive(Serialize)]
struct QuestionId {
    question_id: i64,
}

#[tracing::instrument(skip(pool))]
async fn list_questions(
    State(pool): State<SqlitePool>,
    Query(query): Query<PageQuery>,
) -> ApiResponse<QuestionPage> {
    let page = query.page.unwrap_or(1);
    if page < 1 {
        return Err(ApiError::NotFound);
    }
    let offset = (page - 1).saturating_mul(QUESTIONS_PER_PAGE);
    let (rows, total) = questions::get_questions_page(&pool, offset, QUESTIONS_PER_PAGE).await?;
    if rows.is_empty() {
        return Err(ApiError::NotFound);
    }
    let categories = get_all_categories(&pool).await?;

    Ok(success(QuestionPage {
        questions: rows,
        total_questions: total,
        categories: category_map(categories),
        current_category: None,
    }))
}

#[tracing::instrument(skip(pool))]
async fn delete_question(
    State(pool): State<SqlitePool>,
    AppPath(id): AppPath<i64>,
) -> ApiResponse<QuestionId> {
    if questions::delete_question(&pool, id).await? == 0 {
        return Err(ApiError::NotFound);
    }
    tracing::info!(question_id = id, "question deleted");
    Ok(success(QuestionId { question_id: id }))
}

#[tracing::instrument(skip_all)]
async fn create_question(
    State(pool): State<SqlitePool>,
    AppJson(body): AppJson<CreateQuestion>,
) -> ApiResponse<QuestionId> {
    let new_question = NewQuestion {
        question: body.question,
        answer: body.answer,
        category: body.category,
        difficulty: body.difficulty,
    };
    let id = questions::create_question(&pool, &new_question).await?;
    QUESTIONS_CREATED.inc();
    tracing::info!(question_id = id, "question created");
    Ok(success(QuestionId { question_id: id }))
}

#[tracing::instrument(skip_all)]
async fn search_questions(
    State(pool): State<SqlitePool>,
    AppJson(query): AppJson<SearchQuery>,
) -> ApiResponse<QuestionList> {
    let found = questions::search_questions(&pool, &query.search_term).await?;
    Ok(success(QuestionList::new(found, None)))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(search_questions))
        .route("/questions/create", post(create_question))
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}
