pub mod analytics;

pub mod clock;

pub mod dashboard;

pub mod day_activities;

pub mod submissions;

pub mod system;

pub use analytics::configure_analytics_routes;
pub use clock::configure_clock_routes;
pub use dashboard::configure_dashboard_routes;
pub use day_activities::configure_day_activities_routes;
pub use submissions::configure_submissions_routes;
pub use system::configure_system_routes;
