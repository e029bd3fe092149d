//! CLI command implementations.

pub mod init;
pub mod routes;
pub mod verify;

mod project;

pub use init::init_project;
pub use routes::{list_routes, show_route};
pub use verify::verify_project;
