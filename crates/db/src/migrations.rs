use diesel_async::AsyncPgConnection;
use lazy_static::lazy_static;

lazy_static! {
    static ref MIGRATIONS: diesel_async_migrations::EmbeddedMigrations =
        diesel_async_migrations::embed_migrations!("migrations");
}

/// Applies every migration under `crates/db/migrations` that hasn't run yet.
pub async fn run_migrations(conn: &mut AsyncPgConnection) -> anyhow::Result<()> {
    MIGRATIONS.run_pending_migrations(conn).await?;
    Ok(())
}
