use actix_web::post;
use actix_web::web;
use actix_web::web::{Data, Json};

use crate::db;
use crate::server;
use crate::teams::models::{
    ChairAssigned, MemberRequest, MembershipChange, NewTeamRequest, TeamIdRequest, TeamResponse,
};
use crate::teams::Team;
use crate::validator::Validate;

#[post("/games/new-team")]
async fn create(body: Json<NewTeamRequest>, pool: Data<db::Pool>) -> server::Response {
    let new_team = body.into_inner().validate()?;

    let team = web::block(move || {
        let conn = pool.get()?;
        Team::create(&new_team, &conn)
    })
    .await?;

    info!("registered team {} for game {}", team.team_id, team.game_id);

    http_ok_json!(TeamResponse {
        message: "Equipo registrado exitosamente",
        team,
    });
}

#[post("/games/join-team")]
async fn join(body: Json<MemberRequest>, pool: Data<db::Pool>) -> server::Response {
    let action = body.into_inner().validate()?;
    let (team_id, member_id) = (action.team_id.clone(), action.member_id.clone());

    let slot = web::block(move || {
        let conn = pool.get()?;
        Team::join(&action.team_id, &action.member_id, &conn)
    })
    .await?;

    debug!("member {} joined team {} in {}", member_id, team_id, slot);

    http_ok_json!(MembershipChange {
        message: "Miembro registrado exitosamente en el equipo",
        team_id,
        slot,
        member_id: Some(member_id),
    });
}

#[post("/games/leave-team")]
async fn leave(body: Json<MemberRequest>, pool: Data<db::Pool>) -> server::Response {
    let action = body.into_inner().validate()?;
    let team_id = action.team_id.clone();

    let slot = web::block(move || {
        let conn = pool.get()?;
        Team::leave(&action.team_id, &action.member_id, &conn)
    })
    .await?;

    http_ok_json!(MembershipChange {
        message: "Miembro eliminado exitosamente del equipo",
        team_id,
        slot,
        member_id: None,
    });
}

#[post("/games/info-team")]
async fn find(body: Json<TeamIdRequest>, pool: Data<db::Pool>) -> server::Response {
    let team_id = body.into_inner().validate()?;

    let team = web::block(move || {
        let conn = pool.get()?;
        Team::find_by_id(&team_id, &conn)
    })
    .await?;

    http_ok_json!(TeamResponse {
        message: "Información del equipo obtenida exitosamente",
        team,
    });
}

#[post("/games/sit-chair")]
async fn sit_chair(body: Json<MemberRequest>, pool: Data<db::Pool>) -> server::Response {
    let action = body.into_inner().validate()?;
    let (team_id, member_id) = (action.team_id.clone(), action.member_id.clone());

    web::block(move || {
        let conn = pool.get()?;
        Team::sit_chair(&action.team_id, &action.member_id, &conn)
    })
    .await?;

    http_ok_json!(ChairAssigned {
        message: "Miembro asignado exitosamente a team_memberChair",
        team_id,
        team_member_chair: member_id,
    });
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(create);
    cfg.service(join);
    cfg.service(leave);
    cfg.service(find);
    cfg.service(sit_chair);
}
