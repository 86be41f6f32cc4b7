pub mod analytics;
pub mod clock;
pub mod dashboard;
pub mod day_activities;
pub mod submissions;
pub mod system;

pub use analytics::AnalyticsService;
pub use clock::ClockService;
pub use dashboard::DashboardService;
pub use day_activities::DayActivitiesService;
pub use submissions::SubmissionService;
pub use system::SystemService;
