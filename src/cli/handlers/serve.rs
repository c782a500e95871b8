//! Serve command handler

use crate::config::settings::Settings;
use crate::error::AppResult;
use crate::server::Server;

pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Runs the server, or with `dry_run` only reports the resolved settings.
    pub async fn execute(self, dry_run: bool) -> AppResult<()> {
        if dry_run {
            return self.validate_only();
        }
        Server::new(self.config).run().await.map_err(Into::into)
    }

    fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;

        let server = &self.config.server;
        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", server.address());
        println!("✓ REST API prefix: {}", server.api_prefix);
        println!(
            "✓ Verification email: {}",
            if self.config.smtp.enabled {
                format!("SMTP via {}:{}", self.config.smtp.host, self.config.smtp.port)
            } else {
                "logged only (smtp.enabled = false)".to_string()
            }
        );
        println!(
            "✓ Migrations on startup: {}",
            if self.config.database.auto_migrate { "yes" } else { "no" }
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn valid_config() -> Settings {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/splitpay".to_string();
        config
    }

    #[tokio::test]
    async fn dry_run_accepts_valid_settings() {
        assert!(ServeCommandHandler::new(valid_config()).execute(true).await.is_ok());
    }

    #[tokio::test]
    async fn dry_run_reports_the_invalid_key() {
        let mut config = valid_config();
        config.server.api_prefix = "api/".to_string();

        match ServeCommandHandler::new(config).execute(true).await {
            Err(AppError::Configuration { key, .. }) => assert_eq!(key, "server.api_prefix"),
            other => panic!("expected configuration error, got {other:?}"),
        }
    }
}
