//! Conversions into [`AppError`] and its HTTP rendering

use super::app_error::AppError;

/// Classification of a database failure. Driver messages are never copied
/// into the client-facing message.
#[cfg(feature = "sqlx")]
impl From<&sqlx::Error> for AppError {
    fn from(err: &sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::not_found("Record not found"),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::service_unavailable("Database unavailable")
            }
            // https://www.postgresql.org/docs/current/errcodes-appendix.html
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some("23505") => AppError::conflict("Duplicate key value"),
                Some("57P01" | "57P02" | "57P03") => {
                    AppError::service_unavailable("Database unavailable")
                }
                _ => AppError::internal("Database error"),
            },
            _ => AppError::internal("Database error"),
        }
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::from(&err).with_source(err)
    }
}

#[cfg(feature = "axum")]
mod http_response {
    use axum::Json;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use serde::Serialize;

    use super::AppError;

    /// RFC 7807 problem details
    #[derive(Serialize)]
    struct Problem<'a> {
        #[serde(rename = "type")]
        type_uri: String,
        title: &'static str,
        status: u16,
        detail: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        action: Option<&'a str>,
    }

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status = StatusCode::from_u16(self.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

            let problem = Problem {
                type_uri: format!("https://httpstatuses.io/{}", self.status_code()),
                title: self.kind().as_str(),
                status: self.status_code(),
                detail: self.message(),
                action: self.action(),
            };

            let mut response = (status, Json(problem)).into_response();
            response.headers_mut().insert(
                axum::http::header::CONTENT_TYPE,
                axum::http::HeaderValue::from_static("application/problem+json"),
            );
            response
        }
    }
}
