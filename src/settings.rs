use secrecy::SecretString;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    pub url: SecretString,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_connections: u32,
}

/// Reads settings from defaults, an optional `trivia.*` file in the working
/// directory, `TRIVIA_*` variables (`TRIVIA_APPLICATION__PORT=8080`) and
/// finally `DATABASE_URL`.
pub fn get_settings() -> Result<Settings, config::ConfigError> {
    dotenv::dotenv().ok();
    load(config::File::with_name("trivia").required(false))
}

fn load<S>(file: S) -> Result<Settings, config::ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    config::Config::builder()
        .set_default("application.host", "0.0.0.0")?
        .set_default("application.port", 5000)?
        .set_default("database.url", "sqlite:trivia.db")?
        .set_default("database.max_connections", 5)?
        .add_source(file)
        .add_source(
            config::Environment::with_prefix("TRIVIA")
                .prefix_separator("_")
                .separator("__"),
        )
        .set_override_option("database.url", dotenv::var("DATABASE_URL").ok())?
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn file_values_override_defaults() {
        let file = config::File::from_str(
            r#"
[application]
port = "8080"

[database]
max_connections = 2
            "#,
            config::FileFormat::Toml,
        );
        let settings = load(file).unwrap();

        assert_eq!(settings.application.address(), "0.0.0.0:8080");
        assert_eq!(settings.database.max_connections, 2);
        if dotenv::var("DATABASE_URL").is_err() {
            assert_eq!(settings.database.url.expose_secret(), "sqlite:trivia.db");
        }
    }

    #[test]
    fn database_url_is_not_printed() {
        let file = config::File::from_str(
            "[database]\nurl = \"sqlite:/srv/secret.db\"",
            config::FileFormat::Toml,
        );
        let settings = load(file).unwrap();
        assert!(!format!("{settings:?}").contains("secret.db"));
    }
}
