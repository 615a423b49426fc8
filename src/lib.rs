pub mod config;
pub mod domain;
pub mod email_client;
pub mod email_template;
pub mod member_store;
pub mod notification;
pub mod reminder;
pub mod routes;
pub mod scheduler;
pub mod startup;
pub mod telemetry;
