//! HTTP front end

mod router;
mod server;

pub use router::{AppState, INVALID_WALLET_MESSAGE, create_router};
pub use server::Server;
