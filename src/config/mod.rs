use serde::Deserialize;
use std::env;
use std::time::Duration;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub api: ApiConfig,
    pub cache: CacheConfig,
    pub seating: SeatingConfig,
    pub features: FeatureFlags,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub rust_log: String,
}

// Настройки REST API бэкенда
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub token: Option<String>,
}

// Настройки локального кеша проданных мест
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub dir: String,
}

// Таймеры страницы выбора мест
#[derive(Debug, Clone, Deserialize)]
pub struct SeatingConfig {
    pub poll_interval_secs: u64,
    pub contention_interval_secs: u64,
    pub sweep_interval_secs: u64,
    pub hold_timeout_mins: u64,
}

// Feature flags для включения/выключения функциональности
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    pub enable_contention_sim: bool,
}

impl SeatingConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn contention_interval(&self) -> Duration {
        Duration::from_secs(self.contention_interval_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn hold_timeout(&self) -> Duration {
        Duration::from_secs(self.hold_timeout_mins * 60)
    }
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            app: AppConfig {
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "ticket_client=debug".to_string()),
            },
            api: ApiConfig {
                base_url: env::var("API_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:5000/api".to_string()),
                timeout_seconds: env::var("API_TIMEOUT_SECONDS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .expect("API_TIMEOUT_SECONDS must be a valid number"),
                token: env::var("API_TOKEN").ok(),
            },
            cache: CacheConfig {
                dir: env::var("SOLD_CACHE_DIR").unwrap_or_else(|_| ".cache/sold".to_string()),
            },
            seating: SeatingConfig {
                poll_interval_secs: env::var("POLL_INTERVAL_SECS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .expect("POLL_INTERVAL_SECS must be a valid number"),
                contention_interval_secs: env::var("CONTENTION_INTERVAL_SECS")
                    .unwrap_or_else(|_| "4".to_string())
                    .parse()
                    .expect("CONTENTION_INTERVAL_SECS must be a valid number"),
                sweep_interval_secs: env::var("SWEEP_INTERVAL_SECS")
                    .unwrap_or_else(|_| "1".to_string())
                    .parse()
                    .expect("SWEEP_INTERVAL_SECS must be a valid number"),
                hold_timeout_mins: env::var("HOLD_TIMEOUT_MINS")
                    .unwrap_or_else(|_| "15".to_string())
                    .parse()
                    .expect("HOLD_TIMEOUT_MINS must be a valid number"),
            },
            features: FeatureFlags {
                enable_contention_sim: env::var("ENABLE_CONTENTION_SIM")
                    .unwrap_or_else(|_| "true".to_string())
                    .parse()
                    .expect("ENABLE_CONTENTION_SIM must be true or false"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hold_timeout_is_minutes() {
        let cfg = SeatingConfig {
            poll_interval_secs: 5,
            contention_interval_secs: 4,
            sweep_interval_secs: 1,
            hold_timeout_mins: 15,
        };
        assert_eq!(cfg.poll_interval(), Duration::from_secs(5));
        assert_eq!(cfg.hold_timeout(), Duration::from_secs(900));
    }
}
