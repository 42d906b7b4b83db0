use std::num::ParseIntError;

use serde::Serialize;
use tracing::{Level, event};
use warp::{
    Rejection, Reply,
    filters::{body::BodyDeserializeError, cors::CorsForbidden},
    http::StatusCode,
    reject::{MethodNotAllowed, Reject},
};

#[derive(Debug)]
pub enum Error {
    ParseError(ParseIntError),
    InvalidPage,
    EmptySearchTerm,
    MissingQuizField(&'static str),
    InvalidQuestion,
    CategoryNotFound(i32),
    QuestionNotFound(i32),
    DatabaseQueryError(sqlx::Error),
    MigrationError(sqlx::migrate::MigrateError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &*self {
            Error::ParseError(err) => write!(f, "Cannot parse parameter: {}", err),
            Error::InvalidPage => write!(f, "Page must be a positive integer"),
            Error::EmptySearchTerm => write!(f, "Search term must not be empty"),
            Error::MissingQuizField(field) => write!(f, "Missing field: {}", field),
            Error::InvalidQuestion => {
                write!(f, "Question, answer, category and difficulty are required")
            }
            Error::CategoryNotFound(id) => write!(f, "Category {} not found", id),
            Error::QuestionNotFound(id) => write!(f, "Question {} does not exist", id),
            Error::DatabaseQueryError(_) => write!(f, "Cannot update, invalid data"),
            Error::MigrationError(_) => write!(f, "Cannot migrate data"),
        }
    }
}

impl Reject for Error {}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::ParseError(_)
            | Error::InvalidPage
            | Error::EmptySearchTerm
            | Error::MissingQuizField(_)
            | Error::InvalidQuestion => StatusCode::BAD_REQUEST,
            Error::CategoryNotFound(_) => StatusCode::NOT_FOUND,
            Error::QuestionNotFound(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::DatabaseQueryError(_) | Error::MigrationError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// JSON body sent with every failed request.
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: u16,
    message: String,
}

fn error_reply(
    status: StatusCode,
    message: String,
) -> warp::reply::WithStatus<warp::reply::Json> {
    let body = ErrorBody {
        success: false,
        error: status.as_u16(),
        message,
    };
    warp::reply::with_status(warp::reply::json(&body), status)
}

fn canonical_reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Unknown Error")
        .to_string()
}

pub async fn return_error(r: Rejection) -> Result<impl Reply, Rejection> {
    if let Some(error) = r.find::<Error>() {
        let status = error.status();
        if status.is_server_error() {
            // already logged with its source where it was raised
            Ok(error_reply(status, canonical_reason(status)))
        } else {
            event!(Level::WARN, "{}", error);
            Ok(error_reply(status, error.to_string()))
        }
    } else if let Some(error) = r.find::<BodyDeserializeError>() {
        event!(Level::WARN, "{}", error);
        Ok(error_reply(StatusCode::BAD_REQUEST, error.to_string()))
    } else if let Some(error) = r.find::<CorsForbidden>() {
        Ok(error_reply(StatusCode::FORBIDDEN, error.to_string()))
    } else if r.find::<MethodNotAllowed>().is_some() {
        let status = StatusCode::METHOD_NOT_ALLOWED;
        Ok(error_reply(status, canonical_reason(status)))
    } else if r.is_not_found() {
        let status = StatusCode::NOT_FOUND;
        Ok(error_reply(status, canonical_reason(status)))
    } else {
        // Let warp answer the remaining built-in rejections (415, 413, ...)
        event!(Level::WARN, "unhandled rejection: {:?}", r);
        Err(r)
    }
}

#[cfg(test)]
mod handle_errors_tests {
    use super::*;

    async fn render(r: Rejection) -> (StatusCode, serde_json::Value) {
        let res = return_error(r).await.unwrap().into_response();
        let status = res.status();
        let bytes = warp::hyper::body::to_bytes(res.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn client_errors_echo_their_message() {
        let (status, body) = render(warp::reject::custom(Error::EmptySearchTerm)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], 400);
        assert_eq!(body["message"], "Search term must not be empty");
    }

    #[tokio::test]
    async fn missing_question_is_unprocessable() {
        let (status, body) = render(warp::reject::custom(Error::QuestionNotFound(864))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], 422);
    }

    #[tokio::test]
    async fn database_errors_are_not_leaked() {
        let error = Error::DatabaseQueryError(sqlx::Error::PoolTimedOut);
        let (status, body) = render(warp::reject::custom(error)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal Server Error");
    }

    #[tokio::test]
    async fn fixed_reasons_and_error_messages_share_the_envelope() {
        let (status, body) = render(warp::reject::custom(Error::CategoryNotFound(78))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Category 78 not found");

        let (status, body) = render(warp::reject::not_found()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Not Found");
    }

    #[test]
    fn unknown_status_falls_back_to_generic_reason() {
        let status = StatusCode::from_u16(599).unwrap();
        assert_eq!(canonical_reason(status), "Unknown Error");
    }

    #[tokio::test]
    async fn unknown_routes_are_not_found() {
        let (status, body) = render(warp::reject::not_found()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Not Found");
    }
}
