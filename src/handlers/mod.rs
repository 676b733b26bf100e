pub mod attendance_handlers;
pub mod auth_handlers;
pub mod meeting_handlers;
pub mod mom_handlers;
pub mod user_handlers;
