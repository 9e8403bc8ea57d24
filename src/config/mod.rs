use serde::Deserialize;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub admin: AdminConfig,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

// Настройки базы данных
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

// Настройки админки: путь, общий пароль и политика пустых загрузок
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub route: String,
    pub password: String,
    /// Отклонять CSV без единой валидной строки вместо очистки таблицы
    pub reject_empty_upload: bool,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            route: "admin".to_string(),
            password: "admin".to_string(),
            reject_empty_upload: false,
        }
    }
}

impl AdminConfig {
    /// Полный путь админки, например `/admin`
    pub fn path(&self) -> String {
        format!("/{}", self.route)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} has invalid value '{value}': {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Собирает конфиг из произвольного источника ключей (env, map в тестах)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let admin_route = var("ADMIN_ROUTE", "admin");
        validate_route(&admin_route)?;

        Ok(Config {
            app: AppConfig {
                host: var("HOST", "0.0.0.0"),
                port: parse("PORT", var("PORT", "8000"))?,
                rust_log: var("RUST_LOG", "seat_finder=debug,tower_http=debug"),
            },
            database: DatabaseConfig {
                url: var("DATABASE_URL", "sqlite://seats.db"),
                pool_size: parse("DB_POOL_SIZE", var("DB_POOL_SIZE", "5"))?,
            },
            admin: AdminConfig {
                route: admin_route,
                password: var("PASS", "admin"),
                reject_empty_upload: parse("REJECT_EMPTY_UPLOAD", var("REJECT_EMPTY_UPLOAD", "false"))?,
            },
        })
    }
}

fn parse<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key,
        reason: e.to_string(),
        value,
    })
}

// Сегмент пути должен быть непустым и без спецсимволов роутера
fn validate_route(route: &str) -> Result<(), ConfigError> {
    let valid = !route.is_empty()
        && route
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key: "ADMIN_ROUTE",
            value: route.to_string(),
            reason: "expected a single path segment of [A-Za-z0-9_-]".to_string(),
        })
    }
}
