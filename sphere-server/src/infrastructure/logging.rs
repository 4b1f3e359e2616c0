use anyhow::{Context, Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

/// Инициализирует глобальный подписчик логов. `RUST_LOG` имеет приоритет;
/// без него настроенный уровень применяется к коду сервиса, а болтливые
/// зависимости приглушаются до `warn`.
pub fn init_logging(default_level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directives(default_level))
            .with_context(|| format!("invalid log level {default_level:?}"))?,
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|err| anyhow!("failed to init logging: {err}"))
}

fn default_directives(level: &str) -> String {
    format!("{level},sqlx=warn,hyper=warn")
}
