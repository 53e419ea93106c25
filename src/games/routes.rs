use actix_web::web;
use actix_web::web::{Data, Json};
use actix_web::{get, post};

use crate::db;
use crate::games::models::{Game, GameCreated, GameIdRequest, NewGameRequest};
use crate::server;
use crate::validator::Validate;

#[derive(Debug, Serialize)]
struct Status {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct Message {
    message: String,
}

#[get("/games/status")]
async fn status() -> server::Response {
    http_ok_json!(Status { status: "true" });
}

#[post("/games/new-game")]
async fn create(body: Json<NewGameRequest>, pool: Data<db::Pool>) -> server::Response {
    let new_game = body.into_inner().validate()?;

    let game = web::block(move || {
        let conn = pool.get()?;
        Game::create(&new_game, &conn)
    })
    .await?;

    info!("created game {} ({})", game.game_id, game.game_title);

    http_ok_json!(GameCreated {
        message: "Juego registrado exitosamente",
        game,
    });
}

#[post("/games/info-game")]
async fn find(body: Json<GameIdRequest>, pool: Data<db::Pool>) -> server::Response {
    let game_id = body.into_inner().validate()?;

    let game = web::block(move || {
        let conn = pool.get()?;
        Game::find_by_id(&game_id, &conn)
    })
    .await?;

    http_ok_json!(game);
}

#[post("/games/end-game")]
async fn end(body: Json<GameIdRequest>, pool: Data<db::Pool>) -> server::Response {
    let game_id = body.into_inner().validate()?;

    let game = web::block(move || {
        let conn = pool.get()?;
        Game::end(&game_id, &conn)
    })
    .await?;

    info!("ended game {}", game.game_id);

    http_ok_json!(Message {
        message: format!(
            "El juego con el id: {} y sus equipos han sido finalizados exitosamente",
            game.game_id
        ),
    });
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(status);
    cfg.service(create);
    cfg.service(find);
    cfg.service(end);
}
