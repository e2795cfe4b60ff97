//! Per-request injectors on top of an application root.
//!
//! Logs at `info` by default; run with `RUST_LOG=wasil_container=debug` to
//! watch mappings and lookups too.

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wasil::prelude::*;

// === Services ===

trait Logger: Send + Sync {
    fn log(&self, msg: &str);
}
interface!(dyn Logger);

struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, msg: &str) {
        println!("[LOG] {msg}");
    }
}
implements!(ConsoleLogger => dyn Logger);

#[derive(Clone)]
struct Config {
    database_url: String,
}

#[derive(Clone, Default)]
struct UserId(u64);

#[derive(Clone)]
struct Database {
    url: String,
    logger: Arc<dyn Logger>,
}

impl Database {
    fn query(&self, sql: &str) -> String {
        self.logger.log(&format!("Executing: {sql}"));
        format!("Results from {}", self.url)
    }
}

#[derive(Clone)]
struct UserRepository {
    db: Database,
    user: UserId,
}

impl UserRepository {
    fn current_user(&self) -> String {
        self.db
            .query(&format!("SELECT * FROM users WHERE id = {}", self.user.0))
    }
}

// === Module ===

struct AppModule;

impl Module for AppModule {
    fn configure(&self, injector: &Injector) {
        injector
            .map_value(Config {
                database_url: "postgres://localhost/app".into(),
            })
            .map_value(Arc::new(ConsoleLogger))
            .map_provider(|config: Config, logger: Arc<dyn Logger>| Database {
                url: config.database_url,
                logger,
            })
            .map_provider(|db: Database, user: UserId| UserRepository { db, user });
    }
}

// === Handler filled by field ===

#[derive(Default, Inject)]
struct ProfilePage {
    #[inject]
    user: UserId,
    rendered: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let app = Arc::new(Injector::with_label("app"));
    app.install(&AppModule);

    for id in [7, 42] {
        let request = app.child(format!("request-{id}"));
        request.map_value(UserId(id));
        info!(injector = request.label(), user = id, "Handling request");

        // UserRepository is mapped on `app` but sees this request's UserId.
        let found = request.invoke(|repo: UserRepository| repo.current_user())?;
        println!("{found}");

        let mut page = ProfilePage::default();
        request.apply(&mut page)?;
        page.rendered += 1;
        println!("profile of user {} rendered {} time(s)", page.user.0, page.rendered);
    }

    match app.require::<UserRepository>() {
        Ok(_) => println!("unexpected: app has no UserId"),
        Err(err) => warn!(error = %err, "UserRepository needs a request scope"),
    }

    Ok(())
}
