table! {
    game (game_id) {
        game_id -> Varchar,
        game_title -> Varchar,
        game_max_teams -> Int4,
        game_reg_teams -> Int4,
        game_status -> Bool,
        game_date_start -> Timestamptz,
        game_date_end -> Nullable<Timestamptz>,
    }
}

table! {
    team (team_id) {
        team_id -> Varchar,
        team_name -> Nullable<Varchar>,
        team_owner_id -> Varchar,
        game_id -> Varchar,
        team_member1_id -> Nullable<Varchar>,
        team_member2_id -> Nullable<Varchar>,
        team_member3_id -> Nullable<Varchar>,
        team_member_chair -> Nullable<Varchar>,
        team_status -> Bool,
    }
}

joinable!(team -> game (game_id));

allow_tables_to_appear_in_same_query!(
    game,
    team,
);
