use axum::{routing::get, Router};

pub mod crud;
pub mod customers;
pub mod dashboard;
pub mod expenses;
pub mod orders;
pub mod products;
pub mod salaries;
pub mod staff;
pub mod system;
pub mod users;

/// Endpoints reachable without a token.
pub fn public_router() -> Router {
    Router::new()
        .route("/", get(system::root))
        .nest("/user", users::public_router())
}

/// Endpoints that require a logged-in caller.
pub fn router() -> Router {
    Router::new()
        .nest("/product", products::router())
        .nest("/customer", customers::router())
        .nest("/staff", staff::router())
        .nest("/salary", salaries::router())
        .nest("/expense", expenses::router())
        .nest("/order", orders::router())
        .nest("/dashboard", dashboard::router())
        .nest("/user", users::protected_router())
}
