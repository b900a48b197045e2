pub mod import_routes;
pub mod web;

pub use import_routes::handle_import_routes;
pub use web::handle_web;
