mod authorization;
mod health_check;
mod notifications;
mod subscription_reminder;

pub use authorization::TriggerToken;
pub use health_check::health_check;
pub use notifications::handle_send_notifications;
pub use subscription_reminder::handle_subscription_reminder;
