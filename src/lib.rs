#![warn(clippy::all)]
pub use handle_errors;
use tracing_subscriber::fmt::format::FmtSpan;
use warp::{Filter, Reply, http::Method};

mod store;
use store::Store;
pub mod config;
mod routes;
pub mod types;
use routes::category::{get_categories, get_category_questions};
use routes::question::{add_question, delete_question, get_questions, search_questions};
use routes::quiz::play_quiz;

fn build_routes(
    store: Store,
    page_size: u32,
) -> impl Filter<Extract = impl Reply> + Clone {
    let store_filter = warp::any().map(move || store.clone());
    let page_size_filter = warp::any().map(move || page_size);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type", "authorization"])
        .allow_methods(&[Method::DELETE, Method::GET, Method::POST]);

    // Paths are matched before methods so unknown paths reject as 404, not 405.
    let get_categories = warp::path("categories")
        .and(warp::path::end())
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(get_categories);

    let get_category_questions = warp::path("categories")
        .and(warp::path::param::<i32>())
        .and(warp::path("questions"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query())
        .and(store_filter.clone())
        .and(page_size_filter.clone())
        .and_then(get_category_questions);

    let get_questions = warp::path("questions")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query())
        .and(store_filter.clone())
        .and(page_size_filter.clone())
        .and_then(get_questions)
        .with(warp::trace(|info| {
            tracing::info_span!(
                "get_questions_request",
                method = %info.method(),
                path = %info.path(),
                id = %uuid::Uuid::new_v4(),
            )
        }));

    let add_question = warp::path("questions")
        .and(warp::path::end())
        .and(warp::post())
        .and(store_filter.clone())
        .and(warp::body::json())
        .and_then(add_question);

    let search_questions = warp::path("questions")
        .and(warp::path("search"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::query())
        .and(store_filter.clone())
        .and(page_size_filter.clone())
        .and(warp::body::json())
        .and_then(search_questions);

    let delete_question = warp::path("questions")
        .and(warp::path::param::<i32>())
        .and(warp::path::end())
        .and(warp::delete())
        .and(store_filter.clone())
        .and_then(delete_question);

    let play_quiz = warp::path("quiz")
        .and(warp::path::end())
        .and(warp::post())
        .and(store_filter.clone())
        .and(warp::body::json())
        .and_then(play_quiz);

    get_categories
        .or(get_category_questions)
        .or(get_questions)
        .or(add_question)
        .or(search_questions)
        .or(delete_question)
        .or(play_quiz)
        .with(cors)
        .with(warp::trace::request())
        .recover(handle_errors::return_error)
}

pub async fn setup_store(config: &config::Config) -> Result<Store, handle_errors::Error> {
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        format!(
            "handle_errors={},trivia={},warp={}",
            config.log_level, config.log_level, config.log_level
        )
    });

    tracing_subscriber::fmt()
        .with_env_filter(log_filter)
        // span close events carry the time spent in each route
        .with_span_events(FmtSpan::CLOSE)
        .init();

    let store = Store::new(&config.database_url())
        .await
        .map_err(handle_errors::Error::DatabaseQueryError)?;

    sqlx::migrate!()
        .run(&store.connection)
        .await
        .map_err(handle_errors::Error::MigrationError)?;

    Ok(store)
}

pub async fn run(config: config::Config, store: Store) {
    let routes = build_routes(store, config.page_size);
    warp::serve(routes).run(([0, 0, 0, 0], config.port)).await;
}
