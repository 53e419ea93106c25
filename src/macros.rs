/// Return the request with HTTP 400
#[macro_export]
macro_rules! bad_request {
    ($message:expr) => {
        return Err(crate::errors::ServiceError::BadRequest(
            $message.to_string(),
        ))
    };
}

/// Return the request with HTTP 404
#[macro_export]
macro_rules! not_found {
    ($message:expr) => {
        return Err(crate::errors::ServiceError::NotFound($message.to_string()))
    };
}

/// Answer the request with HTTP 200 and the object as response body
#[macro_export]
macro_rules! http_ok_json {
    ($object:expr) => {
        return Ok(actix_web::web::HttpResponse::Ok().json($object))
    };
}
