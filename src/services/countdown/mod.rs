mod error;
mod list;
mod refresh;
mod repository;
mod seed;
mod store;

pub use error::{CountdownError, CountdownResult};
pub use list::{
    CountdownList, CountdownRow, EditOutcome, EditRequest, ListEvent, ListState, RolloverSummary,
};
pub use refresh::{MidnightRefresh, MidnightTick};
pub use repository::CountdownRepository;
pub use seed::{default_seed_countdowns, seed_defaults, seed_defaults_if_needed, SeedCountdown};
pub use store::{CountdownStore, SqliteCountdownStore};
