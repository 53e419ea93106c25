use std::pin::Pin;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_service::{Service, Transform};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::web::Data;
use actix_web::http::StatusCode;
use actix_web::{get, web};
use actix_web::{Error, ResponseError};
use futures::future::{ok, Ready};
use futures::Future;

use crate::db;
use crate::games::Game;
use crate::server::Response;

/// Request counters, shared by every worker
#[derive(Debug, Default)]
pub struct Stats {
    pub requests: AtomicU32,
    /// answered with a 4xx, mostly bodies that failed validation
    pub rejected: AtomicU32,
    /// answered with a 5xx
    pub errors: AtomicU32,
}

impl Stats {
    pub fn new() -> Stats {
        Stats::default()
    }

    fn record(&self, status: StatusCode) {
        if status.is_client_error() {
            self.rejected.fetch_add(1, Ordering::Relaxed);
        } else if status.is_server_error() {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub requests: u32,
    pub rejected: u32,
    pub errors: u32,
    pub active_games: i64,
    pub active_db_connections: u32,
    pub idle_db_connections: u32,
}

#[get("/stats")]
pub async fn route(stats: Data<Stats>, pool: Data<db::Pool>) -> Response {
    let state = pool.state();
    let stats = stats.into_inner();

    let active_games = web::block(move || {
        let conn = pool.get()?;
        Game::active_count(&conn)
    })
    .await?;

    http_ok_json!(StatsResponse {
        requests: stats.requests.load(Ordering::Relaxed),
        rejected: stats.rejected.load(Ordering::Relaxed),
        errors: stats.errors.load(Ordering::Relaxed),
        active_games,
        active_db_connections: state.connections,
        idle_db_connections: state.idle_connections,
    });
}

/// Wraps the whole app and tallies how each request was answered
#[derive(Debug, Clone)]
pub struct RequestCounter {
    stats: Arc<Stats>,
}

impl RequestCounter {
    pub fn new(stats: Arc<Stats>) -> RequestCounter {
        RequestCounter { stats }
    }
}

impl<S, B> Transform<S> for RequestCounter
where
    S: Service<Request = ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
{
    type Request = ServiceRequest;
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = CountedService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(CountedService {
            service,
            stats: self.stats.clone(),
        })
    }
}

#[derive(Debug)]
pub struct CountedService<S> {
    service: S,
    stats: Arc<Stats>,
}

impl<S, B> Service for CountedService<S>
where
    S: Service<Request = ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
{
    type Request = ServiceRequest;
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: ServiceRequest) -> Self::Future {
        self.stats.requests.fetch_add(1, Ordering::Relaxed);

        let stats = self.stats.clone();
        let answer = self.service.call(request);

        Box::pin(async move {
            let answer = answer.await;

            // errors that escape the handlers still end up as a response
            let status = match &answer {
                Ok(response) => response.status(),
                Err(error) => error.as_response_error().status_code(),
            };
            stats.record(status);

            answer
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App, HttpResponse};

    #[actix_rt::test]
    async fn tallies_requests_by_outcome() {
        let stats = Arc::new(Stats::new());

        let mut app = test::init_service(
            App::new()
                .wrap(RequestCounter::new(stats.clone()))
                .route("/ok", web::get().to(|| async { HttpResponse::Ok().finish() }))
                .route(
                    "/broken",
                    web::get().to(|| async { HttpResponse::InternalServerError().finish() }),
                ),
        )
        .await;

        for uri in &["/ok", "/ok", "/broken"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            test::call_service(&mut app, req).await;
        }

        let req = test::TestRequest::get().uri("/missing").to_request();
        let resp = test::call_service(&mut app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        assert_eq!(stats.requests.load(Ordering::Relaxed), 4);
        assert_eq!(stats.rejected.load(Ordering::Relaxed), 1);
        assert_eq!(stats.errors.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn successes_are_not_tallied() {
        let stats = Stats::new();

        stats.record(StatusCode::OK);
        stats.record(StatusCode::BAD_REQUEST);
        stats.record(StatusCode::SERVICE_UNAVAILABLE);

        assert_eq!(stats.rejected.load(Ordering::Relaxed), 1);
        assert_eq!(stats.errors.load(Ordering::Relaxed), 1);
    }
}
