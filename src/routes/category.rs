use std::collections::HashMap;

use serde::Serialize;
use tracing::{Level, event, instrument};

use handle_errors::Error;

use crate::store::Store;
use crate::types::category::{CategoryId, CategoryMap, category_map};
use crate::types::pagination::{extract_pagination, paginate};
use crate::types::question::Question;

#[derive(Debug, Serialize)]
struct Categories {
    success: bool,
    categories: CategoryMap,
}

#[derive(Debug, Serialize)]
struct CategoryQuestions<'a> {
    success: bool,
    questions: &'a [Question],
    total_questions: i64,
    current_category: String,
}

#[instrument]
pub async fn get_categories(store: Store) -> Result<impl warp::Reply, warp::Rejection> {
    let categories = store.get_categories().await.map_err(warp::reject::custom)?;

    Ok(warp::reply::json(&Categories {
        success: true,
        categories: category_map(categories),
    }))
}

#[instrument]
pub async fn get_category_questions(
    id: i32,
    params: HashMap<String, String>,
    store: Store,
    page_size: u32,
) -> Result<impl warp::Reply, warp::Rejection> {
    let pagination = extract_pagination(params).map_err(warp::reject::custom)?;

    let category = match store
        .get_category(CategoryId(id))
        .await
        .map_err(warp::reject::custom)?
    {
        Some(category) => category,
        None => return Err(warp::reject::custom(Error::CategoryNotFound(id))),
    };

    let questions = store
        .get_questions_by_category(category.id)
        .await
        .map_err(warp::reject::custom)?;
    let total_questions = store.count_questions().await.map_err(warp::reject::custom)?;
    event!(Level::INFO, category = %category.kind, found = questions.len());

    Ok(warp::reply::json(&CategoryQuestions {
        success: true,
        questions: paginate(&questions, pagination.page, page_size),
        total_questions,
        current_category: category.kind,
    }))
}
