use crate::handlers::{client, entry, health, key_part};
use crate::middleware::auth_gate;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

/// All API routes behind the auth gate. `/register` exists only when an
/// identity service is configured.
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/healthz", get(health::healthz))
        .route("/save", post(entry::save_entry))
        .route("/get/{entry_id}", get(entry::get_entry))
        .route("/list", get(entry::list_entries))
        .route("/update/{entry_id}", put(entry::update_entry))
        .route("/delete/{entry_id}", delete(entry::delete_entry))
        .route(
            "/key-part",
            post(key_part::store_key_part)
                .get(key_part::retrieve_key_part)
                .delete(key_part::delete_key_part),
        );

    if state.registrar.is_some() {
        router = router.route("/register", post(client::register_client));
    }

    router
        .layer(middleware::from_fn_with_state(state.clone(), auth_gate))
        .with_state(state)
}
