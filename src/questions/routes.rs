use actix_web::get;
use actix_web::web;
use actix_web::web::Data;

use crate::errors::ServiceError;
use crate::questions::QuestionFile;
use crate::server;

#[get("/preguntas/pregunta")]
async fn random_question(questions: Data<QuestionFile>) -> server::Response {
    let question = web::block(move || questions.random().map_err(ServiceError::from)).await?;

    http_ok_json!(question);
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(random_question);
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use serde_json::{json, Value};

    use crate::questions::tests::question_file;
    use crate::questions::QuestionFile;

    #[actix_rt::test]
    async fn serves_a_question() {
        let file = question_file("route", r#"[{ "pregunta": "¿2 + 2?", "respuesta": 4 }]"#);
        let mut app =
            test::init_service(App::new().data(file).configure(super::register)).await;

        let req = test::TestRequest::get().uri("/preguntas/pregunta").to_request();
        let resp = test::call_service(&mut app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "pregunta": "¿2 + 2?", "respuesta": 4 }));
    }

    #[actix_rt::test]
    async fn missing_file_is_an_internal_error() {
        let mut app = test::init_service(
            App::new()
                .data(QuestionFile::new("/definitely/not/here/preguntas.json"))
                .service(web::scope("/api").configure(super::register)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/preguntas/pregunta")
            .to_request();
        let resp = test::call_service(&mut app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "message": "No se pudo obtener la pregunta" }));
    }

    #[actix_rt::test]
    async fn empty_file_is_an_internal_error() {
        let file = question_file("route-empty", "[]");
        let mut app =
            test::init_service(App::new().data(file).configure(super::register)).await;

        let req = test::TestRequest::get().uri("/preguntas/pregunta").to_request();
        let resp = test::call_service(&mut app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "No se pudo obtener la pregunta");
    }
}
