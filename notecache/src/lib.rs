pub mod auth;
pub mod clock;
pub mod config;
pub mod data;
mod lib_constants;
pub mod live_query;
pub mod logging;
pub mod repository;
pub mod rng;
pub mod storage;
pub mod user_id;
pub mod util;
#[cfg(test)] pub mod testing;
