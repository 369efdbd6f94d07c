pub mod service;
pub mod store;

pub use service::GameScoreService;
pub use store::{PgScoreStore, ScoreStore};
