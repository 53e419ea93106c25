use actix_web::{error::ResponseError, HttpResponse};
use derive_more::Display;
use diesel::result::{DatabaseErrorKind, Error as DBError};
use std::convert::From;

#[derive(Debug, Display, PartialEq)]
pub enum ServiceError {
    #[display(fmt = "Internal Server Error: {}", _0)]
    InternalServerError(String),

    #[display(fmt = "BadRequest: {}", _0)]
    BadRequest(String),

    #[display(fmt = "NotFound: {}", _0)]
    NotFound(String),

    #[display(fmt = "Conflict: {}", _0)]
    Conflict(String),
}

const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error, Please try later";

impl ServiceError {
    /// a 500 with the generic message, for failures the client can't do anything about
    pub fn internal() -> ServiceError {
        ServiceError::InternalServerError(INTERNAL_ERROR_MESSAGE.to_string())
    }
}

/// Every error body has the same shape: `{"message": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse<'a> {
    pub message: &'a str,
}

// impl ResponseError trait allows to convert our errors into http responses with appropriate data
impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::InternalServerError(ref message) => {
                HttpResponse::InternalServerError().json(ErrorResponse { message })
            }
            ServiceError::BadRequest(ref message) => {
                HttpResponse::BadRequest().json(ErrorResponse { message })
            }
            ServiceError::NotFound(ref message) => {
                HttpResponse::NotFound().json(ErrorResponse { message })
            }
            ServiceError::Conflict(ref message) => {
                HttpResponse::Conflict().json(ErrorResponse { message })
            }
        }
    }
}

impl From<DBError> for ServiceError {
    fn from(error: DBError) -> ServiceError {
        error!("db error: {}", error);
        match error {
            DBError::NotFound => ServiceError::NotFound("Not Found".to_string()),
            DBError::DatabaseError(kind, info) => {
                if let DatabaseErrorKind::UniqueViolation = kind {
                    let message = info.details().unwrap_or_else(|| info.message()).to_string();
                    return ServiceError::Conflict(message);
                }
                ServiceError::internal()
            }
            _ => ServiceError::internal(),
        }
    }
}

impl From<r2d2::Error> for ServiceError {
    fn from(error: r2d2::Error) -> ServiceError {
        error!("r2d2 connection pool error: {}", error);
        ServiceError::internal()
    }
}

impl From<actix_threadpool::BlockingError<ServiceError>> for ServiceError {
    fn from(error: actix_threadpool::BlockingError<ServiceError>) -> ServiceError {
        match error {
            actix_threadpool::BlockingError::Error(error) => error,
            actix_threadpool::BlockingError::Canceled => {
                error!("actix threadpool canceled the blocking operation");
                ServiceError::internal()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn status_codes() {
        let cases = vec![
            (ServiceError::internal(), StatusCode::INTERNAL_SERVER_ERROR),
            (ServiceError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ServiceError::Conflict("x".into()), StatusCode::CONFLICT),
        ];

        for (error, status) in cases {
            assert_eq!(error.error_response().status(), status);
        }
    }

    #[test]
    fn blocking_errors_keep_the_inner_error() {
        let error = actix_threadpool::BlockingError::Error(ServiceError::NotFound(
            "missing".to_string(),
        ));

        assert_eq!(
            ServiceError::from(error),
            ServiceError::NotFound("missing".to_string())
        );

        let canceled: actix_threadpool::BlockingError<ServiceError> =
            actix_threadpool::BlockingError::Canceled;

        assert_eq!(ServiceError::from(canceled), ServiceError::internal());
    }

    #[test]
    fn diesel_not_found_is_a_404() {
        assert_eq!(
            ServiceError::from(DBError::NotFound),
            ServiceError::NotFound("Not Found".to_string())
        );
    }
}
