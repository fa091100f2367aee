pub mod game_state;
pub mod record;
