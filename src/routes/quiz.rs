use serde::Serialize;
use tracing::{Level, event, instrument};

use handle_errors::Error;

use crate::store::Store;
use crate::types::question::Question;
use crate::types::quiz::{CategoryFilter, QuizRequest, Selection, select_next};

/// `question` is `null` once the session has seen every candidate.
#[derive(Debug, Serialize)]
struct NextQuestion<'a> {
    success: bool,
    question: Option<&'a Question>,
}

#[instrument]
pub async fn play_quiz(
    store: Store,
    request: QuizRequest,
) -> Result<impl warp::Reply, warp::Rejection> {
    let (filter, excluded) = request.validate().map_err(warp::reject::custom)?;

    let candidates = match filter {
        CategoryFilter::All => store.get_questions().await,
        CategoryFilter::Category(id) => {
            if store
                .get_category(id)
                .await
                .map_err(warp::reject::custom)?
                .is_none()
            {
                return Err(warp::reject::custom(Error::CategoryNotFound(id.0)));
            }
            store.get_questions_by_category(id).await
        }
    }
    .map_err(warp::reject::custom)?;

    let selection = select_next(&candidates, &excluded, &mut rand::thread_rng());
    match &selection {
        Selection::Next(question) => {
            event!(Level::INFO, question = question.id.0, shown = excluded.len())
        }
        Selection::Exhausted => {
            event!(Level::INFO, candidates = candidates.len(), "quiz exhausted")
        }
    }

    Ok(warp::reply::json(&NextQuestion {
        success: true,
        question: selection.question(),
    }))
}
