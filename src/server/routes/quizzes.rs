use axum::{extract::State, routing::post, Router};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize, Serializer};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions::get_quiz_candidates, Question},
    server::{app::AppState, extract::AppJson},
    telemetry::QUIZ_QUESTIONS_SERVED,
};

use super::{success, ApiResponse};

/// Category id that stands for "any category".
const ALL_CATEGORIES: i64 = 0;

#[derive(Deserialize)]
struct QuizRequest {
    #[serde(default)]
    previous_questions: Vec<i64>,
    quiz_category: QuizCategory,
}

#[derive(Deserialize)]
struct QuizCategory {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    id: i64,
}

#[derive(Serialize)]
struct QuizQuestion {
    #[serde(serialize_with = "question_or_false")]
    question: Option<Question>,
}

// the quiz is over when the frontend receives `"question": false`
fn question_or_false<S>(question: &Option<Question>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match question {
        Some(question) => question.serialize(serializer),
        None => serializer.serialize_bool(false),
    }
}

#[tracing::instrument(skip_all)]
async fn next_question(
    State(pool): State<SqlitePool>,
    AppJson(request): AppJson<QuizRequest>,
) -> ApiResponse<QuizQuestion> {
    let category = match request.quiz_category.id {
        ALL_CATEGORIES => None,
        id => Some(id),
    };
    let candidates = get_quiz_candidates(&pool, category, &request.previous_questions).await?;
    let question = candidates.choose(&mut rand::thread_rng()).cloned();

    match &question {
        Some(question) => {
            let label = category.map_or_else(|| "all".to_owned(), |id| id.to_string());
            QUIZ_QUESTIONS_SERVED.with_label_values(&[label.as_str()]).inc();
            tracing::debug!(question_id = question.id, category = %label, "quiz question picked");
        }
        None => tracing::debug!("no questions left"),
    }
    Ok(success(QuizQuestion { question }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_question))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use axum::http::StatusCode;
    use serde_json::json;

    use crate::db::test_support::{empty_pool, insert_question, seed_categories, seeded_pool};
    use crate::server::routes::test_support::{assert_error, post_json, send};

    #[tokio::test]
    async fn any_category_returns_an_unseen_question() {
        let pool = seeded_pool(6).await;

        let (status, body) = send(
            &pool,
            post_json(
                "/quizzes",
                json!({"previous_questions": [1, 2, 3], "quiz_category": {"type": "click", "id": 0}}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let id = body["question"]["id"].as_i64().unwrap();
        assert!([4, 5, 6].contains(&id));
    }

    #[tokio::test]
    async fn every_question_asked_ends_the_quiz() {
        let pool = seeded_pool(8).await;
        let previous: Vec<i64> = (1..=8).collect();

        let (status, body) = send(
            &pool,
            post_json(
                "/quizzes",
                json!({"previous_questions": previous, "quiz_category": {"id": 0}}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true, "question": false}));
    }

    #[tokio::test]
    async fn single_question_category_always_yields_it() {
        let pool = empty_pool().await;
        seed_categories(&pool).await;
        insert_question(&pool, "What is the largest lake in Africa?", 3).await;
        let only = insert_question(&pool, "La Giaconda is better known as what?", 2).await;

        for _ in 0..5 {
            let (status, body) = send(
                &pool,
                post_json(
                    "/quizzes",
                    json!({"previous_questions": [], "quiz_category": {"type": "Art", "id": "2"}}),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["question"]["id"], only);
            assert_eq!(body["question"]["category"], 2);
        }
    }

    #[tokio::test]
    async fn playing_through_a_category_visits_each_question_once() {
        let pool = seeded_pool(18).await;
        let mut previous: Vec<i64> = Vec::new();

        loop {
            let (_, body) = send(
                &pool,
                post_json(
                    "/quizzes",
                    json!({"previous_questions": previous, "quiz_category": {"id": 4}}),
                ),
            )
            .await;
            if body["question"] == false {
                break;
            }
            assert_eq!(body["question"]["category"], 4);
            previous.push(body["question"]["id"].as_i64().unwrap());
        }

        let unique: HashSet<i64> = previous.iter().copied().collect();
        assert_eq!(previous.len(), 3);
        assert_eq!(unique.len(), 3);
    }

    #[tokio::test]
    async fn long_history_of_asked_questions_is_accepted() {
        let pool = seeded_pool(4).await;
        let previous: Vec<i64> = (1..40_000).filter(|id| *id != 3).collect();

        let (status, body) = send(
            &pool,
            post_json(
                "/quizzes",
                json!({"previous_questions": previous, "quiz_category": {"id": 0}}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["question"]["id"], 3);
    }

    #[tokio::test]
    async fn missing_category_is_unprocessable() {
        let pool = seeded_pool(3).await;

        let (status, body) =
            send(&pool, post_json("/quizzes", json!({"previous_questions": []}))).await;
        assert_error(status, &body, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
