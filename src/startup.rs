use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::net::TcpListener;
use std::sync::Arc;
use tokio_cron_scheduler::{JobScheduler, JobSchedulerError};
use tracing_actix_web::TracingLogger;

use crate::config::{DatabaseSettings, Settings};
use crate::email_client::{EmailClient, NotificationChannel};
use crate::member_store::PgMemberStore;
use crate::reminder::ReminderSweep;
use crate::routes::{
    handle_send_notifications, handle_subscription_reminder, health_check, TriggerToken,
};
use crate::scheduler::start_reminder_schedule;
use crate::telemetry::TelemetryError;

pub struct Application {
    pub port: u16,
    pub server: Server,
    scheduler: Option<JobScheduler>,
}

#[derive(thiserror::Error, Debug)]
pub enum StartupError {
    #[error("Failed to load the configuration.")]
    Configuration(#[from] ::config::ConfigError),
    #[error("Failed to initialise telemetry.")]
    Telemetry(#[from] TelemetryError),
    #[error("Sender email is not valid: {0}")]
    InvalidSender(String),
    #[error("Failed to build the email client.")]
    EmailClient(#[from] reqwest::Error),
    #[error("Failed to start the reminder schedule: {0:?}")]
    Scheduler(JobSchedulerError),
    #[error("Failed to bind the address.")]
    Io(#[from] std::io::Error),
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, StartupError> {
        let email_client: Arc<dyn NotificationChannel> = Arc::new(build_email_client(&config)?);
        let sweep = build_reminder_sweep(&config, email_client.clone());

        let scheduler = if config.reminder.schedule_enabled {
            let scheduler = start_reminder_schedule(&config.reminder.cron_schedule, sweep.clone())
                .await
                .map_err(StartupError::Scheduler)?;

            Some(scheduler)
        } else {
            None
        };

        let listener = TcpListener::bind(config.get_address())?;
        let port = listener.local_addr()?.port();
        let trigger_token = TriggerToken(config.reminder.trigger_token.clone());
        let server = run(listener, sweep, email_client, trigger_token)?;

        Ok(Self {
            port,
            server,
            scheduler,
        })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        let result = self.server.await;

        if let Some(mut scheduler) = self.scheduler {
            if let Err(err) = scheduler.shutdown().await {
                tracing::error!("Failed to stop the reminder schedule: {:?}", err);
            }
        }

        result
    }
}

pub fn run(
    listener: TcpListener,
    sweep: ReminderSweep,
    email_client: Arc<dyn NotificationChannel>,
    trigger_token: TriggerToken,
) -> Result<Server, std::io::Error> {
    let sweep = web::Data::new(sweep);
    let email_client: web::Data<dyn NotificationChannel> = web::Data::from(email_client);
    let trigger_token = web::Data::new(trigger_token);

    let server = HttpServer::new(move || {
        // App is where your application logic lives: routing, middlewares, request handler, etc
        App::new()
            // 'wrap' method adds a middleware to the App. This specific middleware provide incoming
            // request logger
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route(
                "/cron/subscription-reminder",
                web::get().to(handle_subscription_reminder),
            )
            .route(
                "/notifications/send",
                web::post().to(handle_send_notifications),
            )
            .app_data(sweep.clone())
            .app_data(email_client.clone())
            .app_data(trigger_token.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

pub fn build_email_client(config: &Settings) -> Result<EmailClient, StartupError> {
    let sender_email = config
        .get_email_client_sender()
        .map_err(StartupError::InvalidSender)?;

    let email_client = EmailClient::new(
        config.email_client.base_url.clone(),
        sender_email,
        config.email_client.sender_name.clone(),
        config.email_client.api_key.clone(),
        Some(config.email_client.get_timeout()),
    )?;

    Ok(email_client)
}

pub fn build_reminder_sweep(
    config: &Settings,
    channel: Arc<dyn NotificationChannel>,
) -> ReminderSweep {
    let member_store = PgMemberStore::new(get_connection_db_pool(&config.database));

    ReminderSweep::new(Arc::new(member_store), channel)
}

pub fn get_connection_db_pool(config: &DatabaseSettings) -> Pool<Postgres> {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(config.get_db_options())
}
