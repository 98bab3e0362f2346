//! API endpoint modules.

pub mod dashboard;
pub mod health;
pub mod lookups;
pub mod openapi;
pub mod reports;

pub use dashboard::configure_routes as configure_dashboard_routes;
pub use health::configure_health_routes;
pub use lookups::configure_routes as configure_lookup_routes;
pub use openapi::ApiDoc;
pub use reports::configure_routes as configure_report_routes;
