use web::config::Config;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Reads `KAGEMARKS_CONFIG` (or `config.toml`). `DATABASE_URL` wins over the
/// file's database uri so deployments can keep secrets out of it.
pub fn process_config() -> anyhow::Result<Config> {
    let path = std::env::var("KAGEMARKS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let raw = std::fs::read_to_string(&path)
        .map_err(|err| anyhow::anyhow!("can't read config {}: {}", path, err))?;
    let mut config: Config = toml::from_str(&raw)?;

    if let Ok(uri) = std::env::var("DATABASE_URL") {
        config.database.uri = uri;
    }

    Ok(config)
}
