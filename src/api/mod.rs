mod extract;
mod handlers;
mod routes;
mod state;

pub use extract::{Member, MEMBER_ID_HEADER};
pub use routes::create_router;
pub use state::AppState;
