//! # passvault-server
//!
//! REST API for account-scoped vault entries and key parts.
//!
//! Every request passes the auth gate, which classifies the bearer token as
//! anonymous, authenticated or rejected and attaches that outcome to the
//! request. Handlers read it through [`middleware::RequestContext`] together
//! with the request deadline.
//!
//! ## Endpoints
//!
//! | Method | Path | Auth |
//! |--------|------|------|
//! | GET | `/healthz` | none |
//! | POST | `/save` | required |
//! | GET | `/get/{entry_id}` | required |
//! | GET | `/list` | required |
//! | PUT | `/update/{entry_id}` | required |
//! | DELETE | `/delete/{entry_id}` | required |
//! | POST, GET, DELETE | `/key-part` | required |
//! | POST | `/register` | required, only with `sso` configured |

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;
pub mod telemetry;
pub mod validation;

pub use error::ApiError;
pub use routes::create_router;
pub use server::{build_app, serve};
pub use state::AppState;
