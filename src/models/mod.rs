pub mod game;
pub mod score;
pub mod user;

pub use game::Game;
pub use score::{GameScore, NewGameScore, ScoreSubmission};
pub use user::BasicUserData;
