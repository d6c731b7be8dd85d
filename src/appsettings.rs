use config::{Config, ConfigError, Environment, File};
use salon_models::settings::Settings;

/// `appsettings.toml`, then `appsettings.local.toml`, then `APP__*`
/// environment variables (`APP__SERVER__PORT=9000`).
pub fn load() -> Result<Settings, ConfigError> {
    let settings = Config::builder()
        .add_source(File::with_name("appsettings").required(false))
        .add_source(File::with_name("appsettings.local").required(false))
        .add_source(
            Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
