use diesel::prelude::*;
use diesel::result::Error as DBError;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::db;
use crate::errors::ServiceError;
use crate::games::Game;
use crate::ids;
use crate::schema::team;
use crate::teams::roster::{Roster, Slot};
use crate::validator::{optional_id, present, Validate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, Identifiable)]
#[table_name = "team"]
#[primary_key(team_id)]
pub struct Team {
    pub team_id: String,
    pub team_name: Option<String>,
    #[serde(rename = "team_ownerID")]
    pub team_owner_id: String,
    pub game_id: String,
    #[serde(rename = "team_member1ID")]
    pub team_member1_id: Option<String>,
    #[serde(rename = "team_member2ID")]
    pub team_member2_id: Option<String>,
    #[serde(rename = "team_member3ID")]
    pub team_member3_id: Option<String>,
    #[serde(rename = "team_memberChair")]
    pub team_member_chair: Option<String>,
    /// false once the game the team plays in has ended
    pub team_status: bool,
}

#[derive(Debug, Insertable)]
#[table_name = "team"]
struct NewTeam<'a> {
    team_id: &'a str,
    team_name: Option<&'a str>,
    team_owner_id: &'a str,
    game_id: &'a str,
    team_status: bool,
}

/// A validated **POST /api/games/new-team** request
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTeam {
    pub name: Option<String>,
    pub owner_id: String,
    pub game_id: String,
}

///
/// **POST /api/games/new-team**
///
/// The team name is optional, the owner and game are not.
///
/// ``` shell
/// curl --location --request POST 'localhost:3000/api/games/new-team' \
///     --header 'Content-Type: application/json' \
///     --data-raw '{
///         "team_name": "Los Sabios",
///         "team_ownerID": "u-117",
///         "game_id": "2410417"
///     }'
/// ```
#[derive(Debug, Deserialize)]
pub struct NewTeamRequest {
    pub team_name: Option<String>,
    #[serde(rename = "team_ownerID", default, deserialize_with = "optional_id")]
    pub team_owner_id: Option<String>,
    #[serde(default, deserialize_with = "optional_id")]
    pub game_id: Option<String>,
}

/// Body of **POST /api/games/info-team**
#[derive(Debug, Deserialize)]
pub struct TeamIdRequest {
    #[serde(default, deserialize_with = "optional_id")]
    pub team_id: Option<String>,
}

/// Body of the requests that act on one member of a team:
/// joining, leaving and taking the chair.
#[derive(Debug, Deserialize)]
pub struct MemberRequest {
    #[serde(default, deserialize_with = "optional_id")]
    pub team_id: Option<String>,
    #[serde(rename = "team_memberID", default, deserialize_with = "optional_id")]
    pub team_member_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberAction {
    pub team_id: String,
    pub member_id: String,
}

#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub team: Team,
}

/// Answer to a member joining or leaving, keyed by the slot that changed:
/// `{"message": "...", "team_id": "...", "team_member2ID": "u-117"}`
#[derive(Debug)]
pub struct MembershipChange {
    pub message: &'static str,
    pub team_id: String,
    pub slot: Slot,
    /// `None` when the slot was freed
    pub member_id: Option<String>,
}

impl Serialize for MembershipChange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("message", self.message)?;
        map.serialize_entry("team_id", &self.team_id)?;
        map.serialize_entry(self.slot.field_name(), &self.member_id)?;
        map.end()
    }
}

#[derive(Debug, Serialize)]
pub struct ChairAssigned {
    pub message: &'static str,
    pub team_id: String,
    #[serde(rename = "team_memberChair")]
    pub team_member_chair: String,
}

impl Team {
    /// Registers a team for a game.
    ///
    /// The game row stays locked until the team is inserted and counted,
    /// so concurrent registrations can't push a game over its capacity.
    #[tracing::instrument(name = "Team::create", skip(conn))]
    pub fn create(new_team: &CreateTeam, conn: &db::Conn) -> Result<Team, ServiceError> {
        conn.transaction::<Team, ServiceError, _>(|| {
            let game = Game::find_for_update(&new_team.game_id, conn)?;

            if !game.is_active() {
                not_found!(format!("El juego con el id: {} ya finalizo", game.game_id));
            }

            game.register_team(conn)?;

            ids::insert_with_fresh_id(conn, |team_id| {
                diesel::insert_into(team::table)
                    .values(&NewTeam {
                        team_id,
                        team_name: new_team.name.as_deref(),
                        team_owner_id: &new_team.owner_id,
                        game_id: &game.game_id,
                        team_status: true,
                    })
                    .get_result::<Team>(conn)
            })
        })
    }

    pub fn find_by_id(team_id: &str, conn: &db::Conn) -> Result<Team, ServiceError> {
        let found = team::table
            .filter(team::team_id.eq(team_id))
            .first::<Team>(conn)
            .optional()?;

        match found {
            Some(team) => Ok(team),
            None => not_found!(format!("No se encontró el equipo con el id: {}", team_id)),
        }
    }

    fn find_for_update(team_id: &str, conn: &db::Conn) -> Result<Team, ServiceError> {
        let found = team::table
            .filter(team::team_id.eq(team_id))
            .for_update()
            .first::<Team>(conn)
            .optional()?;

        match found {
            Some(team) => Ok(team),
            None => not_found!(format!("No se encontró el equipo con el id: {}", team_id)),
        }
    }

    /// Puts the member in the first free slot of an active team
    #[tracing::instrument(name = "Team::join", skip(conn))]
    pub fn join(team_id: &str, member_id: &str, conn: &db::Conn) -> Result<Slot, ServiceError> {
        conn.transaction::<Slot, ServiceError, _>(|| {
            let team = Team::find_for_update(team_id, conn)?;

            if !team.team_status {
                bad_request!(format!("El equipo con el id: {} no está activo", team_id));
            }

            let mut roster = team.roster();

            if roster.slot_of(member_id).is_some() {
                bad_request!("El miembro ya pertenece a este equipo");
            }

            let slot = match roster.join(member_id) {
                Some(slot) => slot,
                None => bad_request!("El equipo ya está lleno"),
            };

            team.set_member(slot, Some(member_id), conn)?;

            debug!("team {} has {} members", team_id, roster.len());

            Ok(slot)
        })
    }

    /// Frees the slot the member occupies
    #[tracing::instrument(name = "Team::leave", skip(conn))]
    pub fn leave(team_id: &str, member_id: &str, conn: &db::Conn) -> Result<Slot, ServiceError> {
        conn.transaction::<Slot, ServiceError, _>(|| {
            let team = Team::find_for_update(team_id, conn)?;

            let slot = match team.roster().leave(member_id) {
                Some(slot) => slot,
                None => not_found!("El miembro no pertenece a este equipo"),
            };

            team.set_member(slot, None, conn)?;

            Ok(slot)
        })
    }

    /// Hands the chair to `member_id`, whoever held it before.
    /// Membership of the team isn't required to take the chair.
    #[tracing::instrument(name = "Team::sit_chair", skip(conn))]
    pub fn sit_chair(team_id: &str, member_id: &str, conn: &db::Conn) -> Result<(), ServiceError> {
        let team = Team::find_by_id(team_id, conn)?;

        let updated = diesel::update(&team)
            .set(team::team_member_chair.eq(member_id))
            .execute(conn)?;

        if updated == 0 {
            bad_request!("No se pudo actualizar el campo team_memberChair");
        }

        Ok(())
    }

    pub fn roster(&self) -> Roster {
        Roster::new([
            self.team_member1_id.clone(),
            self.team_member2_id.clone(),
            self.team_member3_id.clone(),
        ])
    }

    fn set_member(&self, slot: Slot, member_id: Option<&str>, conn: &db::Conn) -> Result<(), DBError> {
        let target = diesel::update(self);

        match slot {
            Slot::First => target.set(team::team_member1_id.eq(member_id)).execute(conn)?,
            Slot::Second => target.set(team::team_member2_id.eq(member_id)).execute(conn)?,
            Slot::Third => target.set(team::team_member3_id.eq(member_id)).execute(conn)?,
        };

        Ok(())
    }
}

impl Validate for NewTeamRequest {
    type Valid = CreateTeam;

    fn validate(self) -> Result<CreateTeam, ServiceError> {
        match (present(self.team_owner_id), present(self.game_id)) {
            (Some(owner_id), Some(game_id)) => Ok(CreateTeam {
                name: present(self.team_name).map(|name| name.trim().to_string()),
                owner_id,
                game_id,
            }),
            _ => bad_request!("Faltan datos requeridos"),
        }
    }
}

impl Validate for TeamIdRequest {
    type Valid = String;

    fn validate(self) -> Result<String, ServiceError> {
        match present(self.team_id) {
            Some(team_id) => Ok(team_id),
            None => bad_request!("El team_id es requerido"),
        }
    }
}

impl Validate for MemberRequest {
    type Valid = MemberAction;

    fn validate(self) -> Result<MemberAction, ServiceError> {
        match (present(self.team_id), present(self.team_member_id)) {
            (Some(team_id), Some(member_id)) => Ok(MemberAction { team_id, member_id }),
            _ => bad_request!("El team_id y el team_memberID son requeridos"),
        }
    }
}
