mod chat;
mod error;
mod job_schedulers;
mod reminder;
mod shared;
mod status;
mod telegram;
mod wizard;

use actix_web::{dev::Server, web, App, HttpServer};
use dory_reminder_infra::DoryContext;
use job_schedulers::{start_send_reminders_job, start_updates_poller};
use std::net::TcpListener;
use tokio::sync::watch;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub use job_schedulers::poll_updates_once;
pub use reminder::deliver_due_reminders::{DeliverDueRemindersUseCase, DeliverySummary};
pub use shared::usecase::{execute, UseCase};
pub use telegram::router::{dispatch, handle_update, Action, Command, Incoming};

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    status::configure_routes(cfg);
    telegram::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
    shutdown: watch::Sender<bool>,
}

impl Application {
    pub async fn new(context: DoryContext) -> Result<Self, std::io::Error> {
        let (server, port) = Application::configure_server(context.clone()).await?;
        let (shutdown, _) = watch::channel(false);
        Application::start_job_schedulers(context, &shutdown);

        Ok(Self {
            server,
            port,
            shutdown,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    fn start_job_schedulers(context: DoryContext, shutdown: &watch::Sender<bool>) {
        if context.config.telegram_polling && context.config.telegram_token.is_some() {
            start_updates_poller(context.clone(), shutdown.subscribe());
        }
        start_send_reminders_job(context, shutdown.subscribe());
    }

    async fn configure_server(context: DoryContext) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();

        let server = HttpServer::new(move || {
            let ctx = context.clone();

            App::new()
                .wrap(TracingLogger::default())
                .app_data(web::Data::new(ctx))
                .service(web::scope("/api/v1").configure(configure_server_api))
        })
        .listen(listener)?
        .workers(4)
        .run();

        Ok((server, port))
    }

    /// Serves until the server stops, then stops the background jobs
    pub async fn start(self) -> Result<(), std::io::Error> {
        let res = self.server.await;
        info!("Server stopped, shutting down background jobs");
        let _ = self.shutdown.send(true);
        res
    }
}
