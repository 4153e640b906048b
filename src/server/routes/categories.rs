use axum::{extract::State, routing::get, Router};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::queries::{
        categories::{get_all_categories, get_category},
        questions::get_questions_for_category,
    },
    server::{app::AppState, error::ApiError, extract::AppPath},
};

use super::{category_map, success, ApiResponse, CategoryMap, QuestionList};

#[derive(Serialize)]
struct CategoriesBody {
    categories: CategoryMap,
}

#[tracing::instrument(skip(pool))]
async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<CategoriesBody> {
    let categories = get_all_categories(&pool).await?;
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(success(CategoriesBody {
        categories: category_map(categories),
    }))
}

#[tracing::instrument(skip(pool))]
async fn category_questions(
    State(pool): State<SqlitePool>,
    AppPath(id): AppPath<i64>,
) -> ApiResponse<QuestionList> {
    // an unknown category is a 422 here, unlike the 404 used for other absent resources
    let category = get_category(&pool, id)
        .await?
        .ok_or_else(|| ApiError::Validation(format!("category {id} does not exist")))?;
    let questions = get_questions_for_category(&pool, id).await?;
    Ok(success(QuestionList::new(questions, Some(category.kind))))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(category_questions))
        .with_state(state)
}
