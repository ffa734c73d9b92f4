pub mod abi;
pub mod app_state;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod rpc;
pub mod utils;

pub use app_state::AppState;
pub use error::QueryError;
