use std::collections::HashMap;

use serde::Serialize;
use tracing::{Level, event, instrument};

use crate::store::Store;
use crate::types::category::{CategoryMap, category_map};
use crate::types::pagination::{extract_pagination, paginate};
use crate::types::question::{NewQuestion, Question, QuestionId};
use crate::types::search::{SearchRequest, SearchTerm, matches};

#[derive(Debug, Serialize)]
struct QuestionPage<'a> {
    success: bool,
    questions: &'a [Question],
    total_questions: i64,
    categories: CategoryMap,
    current_category: Option<String>,
}

#[derive(Debug, Serialize)]
struct SearchResults<'a> {
    success: bool,
    questions: &'a [&'a Question],
    total_questions: i64,
    current_category: Option<String>,
}

#[derive(Debug, Serialize)]
struct Created {
    success: bool,
    created: QuestionId,
    total_questions: i64,
}

#[derive(Debug, Serialize)]
struct Deleted {
    success: bool,
    deleted: QuestionId,
    total_questions: i64,
}

#[instrument]
pub async fn get_questions(
    params: HashMap<String, String>,
    store: Store,
    page_size: u32,
) -> Result<impl warp::Reply, warp::Rejection> {
    event!(Level::INFO, "querying questions");
    let pagination = extract_pagination(params).map_err(warp::reject::custom)?;

    let questions = store.get_questions().await.map_err(warp::reject::custom)?;
    let categories = store.get_categories().await.map_err(warp::reject::custom)?;
    event!(Level::INFO, pagination = ?pagination, total = questions.len());

    Ok(warp::reply::json(&QuestionPage {
        success: true,
        questions: paginate(&questions, pagination.page, page_size),
        total_questions: questions.len() as i64,
        categories: category_map(categories),
        current_category: None,
    }))
}

#[instrument]
pub async fn search_questions(
    params: HashMap<String, String>,
    store: Store,
    page_size: u32,
    request: SearchRequest,
) -> Result<impl warp::Reply, warp::Rejection> {
    let term =
        SearchTerm::parse(request.search_term.as_deref()).map_err(warp::reject::custom)?;
    let pagination = extract_pagination(params).map_err(warp::reject::custom)?;

    let questions = store.get_questions().await.map_err(warp::reject::custom)?;
    let found: Vec<&Question> = questions.iter().filter(|q| matches(q, &term)).collect();
    event!(Level::INFO, term = term.as_str(), matches = found.len());

    Ok(warp::reply::json(&SearchResults {
        success: true,
        questions: paginate(&found, pagination.page, page_size),
        total_questions: questions.len() as i64,
        current_category: None,
    }))
}

#[instrument]
pub async fn add_question(
    store: Store,
    new_question: NewQuestion,
) -> Result<impl warp::Reply, warp::Rejection> {
    let new_question = new_question.validate().map_err(warp::reject::custom)?;

    if store
        .get_category(new_question.category)
        .await
        .map_err(warp::reject::custom)?
        .is_none()
    {
        return Err(warp::reject::custom(handle_errors::Error::CategoryNotFound(
            new_question.category.0,
        )));
    }

    let question = store
        .add_question(new_question)
        .await
        .map_err(warp::reject::custom)?;
    let total_questions = store.count_questions().await.map_err(warp::reject::custom)?;
    event!(Level::INFO, id = question.id.0, "question created");

    Ok(warp::reply::json(&Created {
        success: true,
        created: question.id,
        total_questions,
    }))
}

#[instrument]
pub async fn delete_question(id: i32, store: Store) -> Result<impl warp::Reply, warp::Rejection> {
    store
        .delete_question(QuestionId(id))
        .await
        .map_err(warp::reject::custom)?;
    let total_questions = store.count_questions().await.map_err(warp::reject::custom)?;
    event!(Level::INFO, id, "question deleted");

    Ok(warp::reply::json(&Deleted {
        success: true,
        deleted: QuestionId(id),
        total_questions,
    }))
}
