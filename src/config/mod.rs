use crate::error::{Error, Result};
use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Minimum tantivy writer budget
const MIN_WRITER_MEMORY: usize = 15_000_000;

const DEFAULT_CORS_ORIGINS: &str = "http://ufscheduler.com,https://ufscheduler.com,\
http://www.ufscheduler.com,https://www.ufscheduler.com,http://localhost:3000";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub search: SearchConfig,
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_rate_limit: u64,
    /// Allowed CORS origins; `*` allows any origin
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub courses_dir: PathBuf,
    pub file_suffix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub index_path: PathBuf,
    pub writer_memory_bytes: usize,
    pub max_prefix_expansions: usize,
    pub rebuild_on_start: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub default_page_size: usize,
    pub max_page_size: usize,
    pub max_request_body_size: usize,
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: FromStr>(name: &str, default: &str) -> Result<T> {
    env_or(name, default)
        .parse()
        .map_err(|_| Error::Config(format!("Invalid {name} value")))
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let cors_origins = env_or("CORS_ORIGINS", DEFAULT_CORS_ORIGINS)
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Settings {
            server: ServerConfig {
                host: env_or("HOST", "0.0.0.0"),
                port: env_parse("PORT", "5000")?,
                api_rate_limit: env_parse("API_RATE_LIMIT", "100")?,
                cors_origins,
            },
            catalog: CatalogConfig {
                courses_dir: env_or("COURSES_DIR", "courses").into(),
                file_suffix: env_or("COURSE_FILE_SUFFIX", "_final.json"),
            },
            search: SearchConfig {
                index_path: env_or("INDEX_PATH", "./data/index").into(),
                writer_memory_bytes: env_parse("INDEX_WRITER_MEMORY", "50000000")?,
                max_prefix_expansions: env_parse("MAX_PREFIX_EXPANSIONS", "10000")?,
                rebuild_on_start: env_parse("REBUILD_INDEX", "false")?,
            },
            pagination: PaginationConfig {
                default_page_size: env_parse("DEFAULT_PAGE_SIZE", "20")?,
                max_page_size: env_parse("MAX_PAGE_SIZE", "500")?,
                max_request_body_size: env_parse("MAX_REQUEST_BODY_SIZE", "1048576")?,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("Port must be non-zero".to_string()));
        }

        if self.server.api_rate_limit == 0 {
            return Err(Error::Config("API rate limit must be non-zero".to_string()));
        }

        for origin in &self.server.cors_origins {
            if origin != "*" && HeaderValue::from_str(origin).is_err() {
                return Err(Error::Config(format!("Invalid CORS origin: {origin}")));
            }
        }

        if self.catalog.file_suffix.is_empty() {
            return Err(Error::Config("Course file suffix must not be empty".to_string()));
        }

        if self.search.writer_memory_bytes < MIN_WRITER_MEMORY {
            return Err(Error::Config(format!(
                "Index writer memory must be at least {MIN_WRITER_MEMORY} bytes"
            )));
        }

        if self.search.max_prefix_expansions == 0 {
            return Err(Error::Config(
                "Max prefix expansions must be non-zero".to_string(),
            ));
        }

        if self.pagination.default_page_size == 0
            || self.pagination.default_page_size > self.pagination.max_page_size
        {
            return Err(Error::Config(
                "Default page size must be between 1 and the max page size".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_settings() -> Settings {
    Settings {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
            api_rate_limit: 100,
            cors_origins: vec!["http://localhost:3000".to_string()],
        },
        catalog: CatalogConfig {
            courses_dir: "/tmp/courses".into(),
            file_suffix: "_final.json".to_string(),
        },
        search: SearchConfig {
            index_path: "/tmp/index".into(),
            writer_memory_bytes: 50_000_000,
            max_prefix_expansions: 10_000,
            rebuild_on_start: false,
        },
        pagination: PaginationConfig {
            default_page_size: 20,
            max_page_size: 500,
            max_request_body_size: 1_048_576,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_validation() {
        let mut settings = test_settings();
        assert!(settings.validate().is_ok());

        settings.server.port = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_page_size_bounds() {
        let mut settings = test_settings();
        settings.pagination.default_page_size = 600;
        assert!(settings.validate().is_err());

        settings.pagination.default_page_size = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_invalid_cors_origin() {
        let mut settings = test_settings();
        settings.server.cors_origins = vec!["http://bad\norigin".to_string()];
        assert!(settings.validate().is_err());

        settings.server.cors_origins = vec!["*".to_string()];
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_writer_memory_floor() {
        let mut settings = test_settings();
        settings.search.writer_memory_bytes = 1_000_000;
        assert!(settings.validate().is_err());
    }
}
