use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::env;
use std::path::PathBuf;
pub mod models;
pub use models::*;

/// Loads the unified application configuration.
///
/// Sources, in order of precedence: `config/default.*`, `config/<RUN_ENV>.*`,
/// then environment variables with the `ROOFLINE` prefix and `__` separator.
/// Secrets marked `secret_from_env` in the files are injected from the
/// environment afterwards.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| "ROOFLINE".to_string());

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_default());
    let workspace_root = manifest_dir
        .ancestors()
        .nth(2) // go from crates/roofline_config to workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_default();

    let default_path = workspace_root.join("config/default");
    let env_path = workspace_root.join(format!("config/{}", run_env));

    let builder = Config::builder()
        .add_source(File::with_name(default_path.to_str().unwrap_or("config/default")).required(false))
        .add_source(File::with_name(env_path.to_str().unwrap_or("config/debug")).required(false))
        .add_source(Environment::with_prefix(&prefix).separator("__"));

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    Ok(apply_env_overrides_from_marker(raw_config))
}

/// Recursively replaces all "secret_from_env" string values with environment variable values
fn inject_env_secrets(value: &mut Value) {
    fn walk(path: Vec<String>, obj: &mut Value) {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    walk(new_path, v);
                }
            }
            Value::String(s) if s == "secret_from_env" => {
                let env_key = path.join("_").to_uppercase();
                if let Ok(env_val) = std::env::var(&env_key) {
                    *obj = Value::String(env_val);
                } else {
                    eprintln!("Warning: env var {} not found for secret_from_env", env_key);
                }
            }
            _ => {}
        }
    }

    walk(vec![], value);
}

/// Applies environment overrides based on "secret_from_env" markers in serialized config
pub fn apply_env_overrides_from_marker(config: AppConfig) -> AppConfig {
    let mut json = serde_json::to_value(&config).expect("AppConfig must be serializable");
    inject_env_secrets(&mut json);
    serde_json::from_value(json).expect("AppConfig must remain deserializable")
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// This function checks if the dotenv file has already been loaded using a `OnceCell`.
/// If not, it attempts to load the dotenv file named by `DOTENV_OVERRIDE`, falling
/// back to a file named ".env".
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

    fn minimal_config() -> AppConfig {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            use_scheduling: true,
            use_timeslots: false,
            use_crm: true,
            crm_api: Some(CrmApiConfig {
                base_url: "https://crm.example/api:main".to_string(),
                v2_base_url: None,
                contacts_base_url: None,
                api_token: Some("secret_from_env".to_string()),
                location_id: Some("1".to_string()),
            }),
            scheduling: None,
            timeslots: None,
        }
    }

    #[test]
    fn secret_marker_is_replaced_from_env() {
        std::env::set_var("CRM_API_API_TOKEN", "tok-123");
        let config = apply_env_overrides_from_marker(minimal_config());
        assert_eq!(
            config.crm_api.unwrap().api_token.as_deref(),
            Some("tok-123")
        );
        std::env::remove_var("CRM_API_API_TOKEN");
    }

    #[test]
    fn non_marker_values_are_untouched() {
        let config = apply_env_overrides_from_marker(AppConfig {
            crm_api: Some(CrmApiConfig {
                api_token: Some("literal-token".to_string()),
                ..minimal_config().crm_api.unwrap()
            }),
            ..minimal_config()
        });
        assert_eq!(
            config.crm_api.unwrap().api_token.as_deref(),
            Some("literal-token")
        );
    }
}
