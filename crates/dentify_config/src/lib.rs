use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::PathBuf;

pub mod models;
pub use models::*;

/// Loads the layered application configuration.
///
/// Sources, later ones winning: `config/default`, `config/{RUN_ENV}`,
/// then environment variables prefixed with `DENTIFY` using `__` as the
/// section separator (e.g. `DENTIFY_SERVER__PORT=8080`).
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| "DENTIFY".to_string());

    let config_root = config_root();
    let default_path = config_root.join("config/default");
    let env_path = config_root.join(format!("config/{}", run_env));

    let builder = Config::builder()
        .add_source(File::with_name(default_path.to_string_lossy().as_ref()).required(false))
        .add_source(File::with_name(env_path.to_string_lossy().as_ref()).required(false))
        .add_source(Environment::with_prefix(&prefix).separator("__"));

    let config: AppConfig = builder.build()?.try_deserialize()?;
    Ok(config)
}

fn config_root() -> PathBuf {
    // During `cargo run`/`cargo test` resolve relative to the workspace root,
    // otherwise relative to the current directory of the deployed binary.
    match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir)
            .ancestors()
            .nth(2)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
        Err(_) => PathBuf::from("."),
    }
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures the dotenv file is loaded into the process environment exactly once.
///
/// `DOTENV_OVERRIDE` points at an alternative file; otherwise `.env` is used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = std::env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clinic_config_defaults_are_optional() {
        let config: AppConfig = serde_json::from_str(
            r#"{"server": {"host": "127.0.0.1", "port": 8080}}"#,
        )
        .unwrap();
        assert!(config.clinic.is_none());
        assert!(config.calendar.is_none());
        assert!(!config.use_calendar_sync);
    }

    #[test]
    fn clinic_config_parses_schedule_fields() {
        let json = r#"{
            "server": {"host": "0.0.0.0", "port": 8080},
            "use_calendar_sync": true,
            "clinic": {
                "time_zone": "Asia/Kolkata",
                "working_days": ["Mon", "Tue", "Wed", "Thu", "Fri"],
                "open_time": "09:00",
                "close_time": "17:00",
                "slot_duration_minutes": 30,
                "buffer_minutes": 0,
                "practitioners": ["dr.rao@example.com"]
            },
            "calendar": {"base_url": "https://calendar.example.com/v1"}
        }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        let clinic = config.clinic.unwrap();
        assert_eq!(clinic.open_time.as_deref(), Some("09:00"));
        assert_eq!(clinic.slot_duration_minutes, Some(30));
        assert_eq!(clinic.practitioners.len(), 1);
        assert!(config.use_calendar_sync);
    }
}
