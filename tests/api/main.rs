mod health_check;
mod notifications;
mod subscription_reminder;
