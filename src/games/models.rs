use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::db;
use crate::errors::ServiceError;
use crate::ids;
use crate::schema::{game, team};
use crate::validator::{optional_id, present, Validate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, Identifiable)]
#[table_name = "game"]
#[primary_key(game_id)]
pub struct Game {
    pub game_id: String,
    pub game_title: String,
    #[serde(rename = "game_maxTeams")]
    pub game_max_teams: i32,
    #[serde(rename = "game_regTeams")]
    pub game_reg_teams: i32,
    /// true while the game is being played, false once it has been ended
    pub game_status: bool,
    #[serde(rename = "game_dateStart")]
    pub game_date_start: DateTime<Utc>,
    #[serde(rename = "game_dateEnd")]
    pub game_date_end: Option<DateTime<Utc>>,
}

#[derive(Debug, Insertable)]
#[table_name = "game"]
struct NewGame<'a> {
    game_id: &'a str,
    game_title: &'a str,
    game_max_teams: i32,
    game_reg_teams: i32,
    game_status: bool,
    game_date_start: DateTime<Utc>,
    game_date_end: Option<DateTime<Utc>>,
}

/// A validated **POST /api/games/new-game** request
#[derive(Debug, Clone, PartialEq)]
pub struct CreateGame {
    pub title: String,
    pub max_teams: i32,
}

///
/// **POST /api/games/new-game**
///
/// ``` shell
/// curl --location --request POST 'localhost:3000/api/games/new-game' \
///     --header 'Content-Type: application/json' \
///     --data-raw '{
///         "game_title": "Trivia Night",
///         "game_maxTeams": 2
///     }'
/// ```
#[derive(Debug, Deserialize)]
pub struct NewGameRequest {
    pub game_title: Option<String>,
    #[serde(rename = "game_maxTeams")]
    pub game_max_teams: Option<i32>,
}

/// Body of every request that points at a single game,
/// i.e. **POST /api/games/info-game** and **POST /api/games/end-game**
#[derive(Debug, Deserialize)]
pub struct GameIdRequest {
    #[serde(default, deserialize_with = "optional_id")]
    pub game_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GameCreated {
    pub message: &'static str,
    #[serde(flatten)]
    pub game: Game,
}

impl Game {
    #[tracing::instrument(name = "Game::create", skip(conn))]
    pub fn create(new_game: &CreateGame, conn: &db::Conn) -> Result<Game, ServiceError> {
        ids::insert_with_fresh_id(conn, |game_id| {
            diesel::insert_into(game::table)
                .values(&NewGame {
                    game_id,
                    game_title: &new_game.title,
                    game_max_teams: new_game.max_teams,
                    game_reg_teams: 0,
                    game_status: true,
                    game_date_start: Utc::now(),
                    game_date_end: None,
                })
                .get_result::<Game>(conn)
        })
    }

    pub fn find_by_id(game_id: &str, conn: &db::Conn) -> Result<Game, ServiceError> {
        let found = game::table
            .filter(game::game_id.eq(game_id))
            .first::<Game>(conn)
            .optional()?;

        match found {
            Some(game) => Ok(game),
            None => not_found!(format!("No se encontró el juego con el id: {}", game_id)),
        }
    }

    /// Same as `find_by_id`, but keeps the row locked until the surrounding transaction ends
    pub fn find_for_update(game_id: &str, conn: &db::Conn) -> Result<Game, ServiceError> {
        let found = game::table
            .filter(game::game_id.eq(game_id))
            .for_update()
            .first::<Game>(conn)
            .optional()?;

        match found {
            Some(game) => Ok(game),
            None => not_found!(format!("No se encontró el juego con el id: {}", game_id)),
        }
    }

    /// Ends the game and every team registered for it.
    ///
    /// Both updates happen in one transaction, a failure leaves the game untouched.
    #[tracing::instrument(name = "Game::end", skip(conn))]
    pub fn end(game_id: &str, conn: &db::Conn) -> Result<Game, ServiceError> {
        conn.transaction::<Game, ServiceError, _>(|| {
            let current = Game::find_for_update(game_id, conn)?;

            if !current.game_status {
                bad_request!(format!(
                    "El juego con el id: {} ya está finalizado",
                    game_id
                ));
            }

            let ended: Game = diesel::update(&current)
                .set((
                    game::game_status.eq(false),
                    game::game_date_end.eq(Some(Utc::now())),
                ))
                .get_result(conn)?;

            let teams = diesel::update(team::table.filter(team::game_id.eq(game_id)))
                .set(team::team_status.eq(false))
                .execute(conn)?;

            debug!("ended game {} and {} of its teams", game_id, teams);

            Ok(ended)
        })
    }

    /// Registers one more team for this game, refusing once the game is full
    pub fn register_team(&self, conn: &db::Conn) -> Result<(), ServiceError> {
        if !self.has_capacity() {
            bad_request!("El juego ya alcanzó el número máximo de equipos registrados");
        }

        diesel::update(self)
            .set(game::game_reg_teams.eq(game::game_reg_teams + 1))
            .execute(conn)?;

        Ok(())
    }

    /// the amount of games that haven't been ended yet
    pub fn active_count(conn: &db::Conn) -> Result<i64, ServiceError> {
        let count = game::table
            .filter(game::game_status.eq(true))
            .count()
            .get_result::<i64>(conn)?;

        Ok(count)
    }

    pub fn is_active(&self) -> bool {
        self.game_status
    }

    pub fn has_capacity(&self) -> bool {
        self.game_reg_teams < self.game_max_teams
    }
}

impl Validate for NewGameRequest {
    type Valid = CreateGame;

    fn validate(self) -> Result<CreateGame, ServiceError> {
        let (title, max_teams) = match (present(self.game_title), self.game_max_teams) {
            (Some(title), Some(max_teams)) => (title, max_teams),
            _ => bad_request!("Faltan datos requeridos"),
        };

        if max_teams <= 0 {
            bad_request!("game_maxTeams debe ser mayor que cero");
        }

        Ok(CreateGame {
            title: title.trim().to_string(),
            max_teams,
        })
    }
}

impl Validate for GameIdRequest {
    type Valid = String;

    fn validate(self) -> Result<String, ServiceError> {
        match present(self.game_id) {
            Some(game_id) => Ok(game_id),
            None => bad_request!("El game_id es requerido"),
        }
    }
}
