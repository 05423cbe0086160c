/// Server configuration
///
/// # Environment variables
///
/// Every setting can be overridden from the environment:
///
/// | Variable | Default | Notes |
/// |----------|---------|-------|
/// | WORK_DIR | /var/lib/washbay | database, mirror and log files |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | LOG_LEVEL | info | tracing filter directive |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/washbay HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding the SQLite file, the mirror and logs
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    /// tracing filter directive
    pub log_level: String,
}

impl Config {
    /// Load from environment variables, defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/washbay".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn database_path(&self) -> String {
        format!("{}/washbay.db", self.work_dir)
    }

    pub fn mirror_path(&self) -> String {
        format!("{}/mirror.redb", self.work_dir)
    }

    pub fn log_dir(&self) -> String {
        format!("{}/logs", self.work_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_paths() {
        let config = Config {
            work_dir: "/tmp/wb".into(),
            http_port: 3000,
            environment: "development".into(),
            log_level: "info".into(),
        };
        assert_eq!(config.database_path(), "/tmp/wb/washbay.db");
        assert_eq!(config.mirror_path(), "/tmp/wb/mirror.redb");
        assert_eq!(config.log_dir(), "/tmp/wb/logs");
        assert!(config.is_development());
        assert!(!config.is_production());
    }
}
