use clap::Parser;
use std::env;

use crate::types::pagination::DEFAULT_PAGE_SIZE;

/// Trivia question bank web service
#[derive(Parser, Debug, PartialEq)]
#[clap(author, version, about, long_about = None)]
pub struct Config {
    /// Which errors we want to log (info, warn or error)
    #[clap(short, long, default_value = "warn")]
    pub log_level: String,
    /// Which PORT the server is listening to
    #[clap(short, long, default_value = "8080")]
    pub port: u16,
    /// Database user
    #[clap(long, default_value = "postgres")]
    pub db_user: String,
    /// Database password
    #[clap(long, default_value = "postgres")]
    pub db_password: String,
    /// URL for the postgres database
    #[clap(long, default_value = "localhost")]
    pub db_host: String,
    /// PORT number for the database connection
    #[clap(long, default_value = "5432")]
    pub db_port: u16,
    /// Database name
    #[clap(long, default_value = "trivia")]
    pub db_name: String,
    /// Number of questions returned per page
    #[clap(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,
}

fn env_number<T>(key: &str, fallback: T) -> Result<T, handle_errors::Error>
where
    T: std::str::FromStr<Err = std::num::ParseIntError>,
{
    match env::var(key) {
        Ok(value) => value.parse::<T>().map_err(handle_errors::Error::ParseError),
        Err(_) => Ok(fallback),
    }
}

impl Config {
    pub fn new() -> Result<Config, handle_errors::Error> {
        Config::parse().with_env()
    }

    /// Environment variables take precedence over command line flags.
    pub fn with_env(self) -> Result<Config, handle_errors::Error> {
        let port = env_number("PORT", self.port)?;
        let db_port = env_number("POSTGRES_PORT", self.db_port)?;
        let page_size = env_number("QUESTIONS_PER_PAGE", self.page_size)?;

        let db_user = env::var("POSTGRES_USER").unwrap_or(self.db_user);
        let db_password = env::var("POSTGRES_PASSWORD").unwrap_or(self.db_password);
        let db_host = env::var("POSTGRES_HOST").unwrap_or(self.db_host);
        let db_name = env::var("POSTGRES_DB").unwrap_or(self.db_name);

        Config {
            log_level: self.log_level,
            port,
            db_user,
            db_password,
            db_host,
            db_port,
            db_name,
            page_size,
        }
        .validate()
    }

    fn validate(self) -> Result<Config, handle_errors::Error> {
        if self.page_size == 0 {
            return Err(handle_errors::Error::InvalidPage);
        }
        Ok(self)
    }

    pub fn database_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.db_user, self.db_password, self.db_host, self.db_port, self.db_name
        )
    }
}
