use core_config::{
    AppInfo, ConfigError, FromEnv, app_info, env_or_default, server::ServerConfig,
};

// Import MongoDB config from the database library
use database::mongodb::MongoConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Collection names for each entity kind
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionsConfig {
    pub users: String,
    pub admins: String,
}

impl FromEnv for CollectionsConfig {
    /// - USERS_COLLECTION: defaults to `users`
    /// - ADMINS_COLLECTION: defaults to `admins`
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            users: env_or_default("USERS_COLLECTION", "users"),
            admins: env_or_default("ADMINS_COLLECTION", "admins"),
        })
    }
}

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub collections: CollectionsConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let app = app_info!();
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?.with_app_name(app.name);
        let server = ServerConfig::from_env()?;
        let collections = CollectionsConfig::from_env()?;

        Ok(Self {
            app,
            mongodb,
            server,
            collections,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_with_defaults() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("MONGODB_DATABASE", Some("rest_api")),
                ("USERS_COLLECTION", None),
                ("ADMINS_COLLECTION", None),
                ("APP_ENV", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.app.name, "rest_api");
                assert_eq!(config.mongodb.database(), "rest_api");
                assert_eq!(config.mongodb.app_name.as_deref(), Some("rest_api"));
                assert_eq!(config.collections.users, "users");
                assert_eq!(config.collections.admins, "admins");
                assert_eq!(config.environment, Environment::Development);
            },
        );
    }

    #[test]
    fn test_config_custom_collections() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("MONGODB_DATABASE", Some("rest_api")),
                ("USERS_COLLECTION", Some("people")),
                ("ADMINS_COLLECTION", Some("operators")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.collections.users, "people");
                assert_eq!(config.collections.admins, "operators");
            },
        );
    }

    #[test]
    fn test_config_requires_database() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("MONGODB_DATABASE", None),
                ("MONGO_DATABASE", None),
            ],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(err.to_string().contains("MONGODB_DATABASE"));
            },
        );
    }
}
