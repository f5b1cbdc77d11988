#![forbid(unsafe_code)]

mod assets;
mod config;
mod router;

use std::{net::SocketAddr, sync::Arc};

use diesel_async::{
    pooled_connection::{deadpool::Pool, AsyncDieselConnectionManager},
    AsyncPgConnection,
};
use dotenvy::dotenv;
use listenfd::ListenFd;
use web::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let mut listenfd = ListenFd::from_env();

    let tcp_socket: Option<std::net::TcpListener> = match listenfd.take_tcp_listener(0) {
        Ok(socket) => socket,
        Err(_) => None,
    };

    let config = config::process_config()?;
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database.uri);
    let db_pool = Pool::builder(manager).build()?;

    {
        let mut connection = db_pool.get().await?;
        db::migrations::run_migrations(&mut connection).await?; // run all pending migrations
    }

    let addr: SocketAddr = format!("{}:{}", config.web.host, config.web.port).parse()?;
    let state = Arc::new(AppState::new(db_pool, config));
    let app = router::app(state);

    match tcp_socket {
        // cargo-watch thing
        Some(listener) => {
            log::info!("Listening on inherited socket {:?}", listener.local_addr()?);
            axum::Server::from_tcp(listener)?
                .serve(app.into_make_service())
                .await?
        }
        None => {
            log::info!("Listening on {}", addr);
            axum::Server::bind(&addr)
                .serve(app.into_make_service())
                .await?
        }
    };

    Ok(())
}
