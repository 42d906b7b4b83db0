use sqlx::{
    Row,
    postgres::{PgPool, PgPoolOptions, PgRow},
};

use handle_errors::Error;

use crate::types::{
    category::{Category, CategoryId},
    question::{Question, QuestionId, ValidQuestion},
};

#[derive(Debug, Clone)]
pub struct Store {
    pub connection: PgPool,
}

fn question_from_row(row: PgRow) -> Question {
    Question {
        id: QuestionId(row.get("id")),
        text: row.get("question"),
        answer: row.get("answer"),
        category: CategoryId(row.get("category")),
        difficulty: row.get("difficulty"),
    }
}

fn category_from_row(row: PgRow) -> Category {
    Category {
        id: CategoryId(row.get("id")),
        kind: row.get("type"),
    }
}

fn query_error(e: sqlx::Error) -> Error {
    tracing::event!(tracing::Level::ERROR, "{:?}", e);
    Error::DatabaseQueryError(e)
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self, sqlx::Error> {
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(db_url)
            .await?;

        Ok(Store {
            connection: db_pool,
        })
    }

    pub async fn get_questions(&self) -> Result<Vec<Question>, Error> {
        sqlx::query("SELECT * FROM questions ORDER BY id")
            .map(question_from_row)
            .fetch_all(&self.connection)
            .await
            .map_err(query_error)
    }

    pub async fn get_questions_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Question>, Error> {
        sqlx::query("SELECT * FROM questions WHERE category = $1 ORDER BY id")
            .bind(category_id.0)
            .map(question_from_row)
            .fetch_all(&self.connection)
            .await
            .map_err(query_error)
    }

    pub async fn count_questions(&self) -> Result<i64, Error> {
        sqlx::query("SELECT COUNT(*) AS total FROM questions")
            .map(|row: PgRow| row.get::<i64, _>("total"))
            .fetch_one(&self.connection)
            .await
            .map_err(query_error)
    }

    pub async fn get_categories(&self) -> Result<Vec<Category>, Error> {
        sqlx::query("SELECT * FROM categories ORDER BY id")
            .map(category_from_row)
            .fetch_all(&self.connection)
            .await
            .map_err(query_error)
    }

    pub async fn get_category(&self, category_id: CategoryId) -> Result<Option<Category>, Error> {
        sqlx::query("SELECT * FROM categories WHERE id = $1")
            .bind(category_id.0)
            .map(category_from_row)
            .fetch_optional(&self.connection)
            .await
            .map_err(query_error)
    }

    pub async fn add_question(&self, new_question: ValidQuestion) -> Result<Question, Error> {
        sqlx::query(
            "INSERT INTO questions (question, answer, category, difficulty)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id, question, answer, category, difficulty",
        )
        .bind(new_question.text)
        .bind(new_question.answer)
        .bind(new_question.category.0)
        .bind(new_question.difficulty)
        .map(question_from_row)
        .fetch_one(&self.connection)
        .await
        .map_err(query_error)
    }

    pub async fn delete_question(&self, question_id: QuestionId) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(question_id.0)
            .execute(&self.connection)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(Error::QuestionNotFound(question_id.0));
        }
        Ok(())
    }
}
