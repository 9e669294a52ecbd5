//! Back office API: product, client and supplier endpoints plus the
//! application wiring shared by the binary and the integration tests.

pub mod app;
pub mod models;
pub mod repositories;
pub mod routes;

pub use app::create_app;
pub use repositories::Collections;
