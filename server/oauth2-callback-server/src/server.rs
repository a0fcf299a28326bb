use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing::info;

use crate::callback::handle_request;
use crate::config::ServerConfig;
use crate::error::CallbackError;

/// Loopback listener serving the callback route until the process exits.
pub struct CallbackServer {
    config: ServerConfig,
}

/// A listener that already owns its port.
pub struct BoundServer {
    config: ServerConfig,
    server: Server,
}

impl CallbackServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn bind(self) -> Result<BoundServer, CallbackError> {
        let addr = self.config.bind_addr();

        let server = HttpServer::new(|| App::new().default_service(web::to(handle_request)))
            .bind(addr)
            .map_err(|source| CallbackError::Bind { addr, source })?
            .disable_signals()
            .run();

        info!("Callback server bound to {}", addr);
        Ok(BoundServer {
            config: self.config,
            server,
        })
    }
}

impl BoundServer {
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn handle(&self) -> actix_web::dev::ServerHandle {
        self.server.handle()
    }

    pub async fn run(self) -> Result<(), CallbackError> {
        self.server
            .await
            .with_context(|| format!("Server error on {}", self.config.bind_addr()))?;
        Ok(())
    }
}
