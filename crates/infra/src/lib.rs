mod config;
mod repos;
mod services;
mod sessions;
mod system;

pub use config::Config;
pub use repos::{IChatRepo, IReminderRepo, InMemoryChatRepo, InMemoryReminderRepo, Repos, UpdateResult};
pub use services::*;
pub use sessions::SessionStore;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};
use services::telegram::{IMessenger, IUpdateSource, InMemoryMessenger, InMemoryUpdateSource, TelegramBotApi};
use tracing::{info, warn};

#[derive(Clone)]
pub struct DoryContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub sessions: Arc<SessionStore>,
    pub messenger: Arc<dyn IMessenger>,
    pub updates: Arc<dyn IUpdateSource>,
}

impl DoryContext {
    /// Context with in-memory storage and transport, used by tests and
    /// by the `inmemory` mode. `messenger` records everything sent.
    pub fn create_inmemory(messenger: Arc<dyn IMessenger>) -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            sessions: Arc::new(SessionStore::new()),
            messenger,
            updates: Arc::new(InMemoryUpdateSource::new()),
        }
    }

    async fn create(params: ContextParams) -> Self {
        let repos = match params.postgres_connection_string {
            Some(connection_string) => Repos::create_postgres(&connection_string)
                .await
                .expect("Postgres credentials must be set and valid"),
            None => {
                info!("Using in-memory repositories. Reminders will be lost on restart.");
                Repos::create_inmemory()
            }
        };

        let config = Config::new();
        let (messenger, updates): (Arc<dyn IMessenger>, Arc<dyn IUpdateSource>) =
            match &config.telegram_token {
                Some(token) => {
                    let api = Arc::new(TelegramBotApi::new(token.clone()));
                    (api.clone(), api)
                }
                None => {
                    warn!("No TELEGRAM_TOKEN configured, outgoing messages are only recorded in memory");
                    (
                        Arc::new(InMemoryMessenger::new()),
                        Arc::new(InMemoryUpdateSource::new()),
                    )
                }
            };

        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            sessions: Arc::new(SessionStore::new()),
            messenger,
            updates,
        }
    }
}

struct ContextParams {
    pub postgres_connection_string: Option<String>,
}

/// Will setup the infrastructure context given the environment.
/// Postgres is used when `DATABASE_URL` is set unless the first
/// command line argument is `inmemory`.
pub async fn setup_context() -> DoryContext {
    DoryContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
    })
    .await
}

fn get_psql_connection_string() -> Option<String> {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1].eq("inmemory") {
        return None;
    }
    std::env::var(PSQL_CONNECTION_STRING).ok()
}
