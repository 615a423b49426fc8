pub mod day_window;
pub mod expiring_member;
pub mod member_email;
pub mod notification_outcome;
pub mod subscription_status;
