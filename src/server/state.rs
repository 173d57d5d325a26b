use axum::extract::FromRef;

use crate::admin::AdminGate;
use crate::content::ContentService;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub content: Arc<ContentService>,
    pub admin_gate: Arc<AdminGate>,
}

impl FromRef<ServerState> for Arc<ContentService> {
    fn from_ref(input: &ServerState) -> Self {
        input.content.clone()
    }
}

impl FromRef<ServerState> for Arc<AdminGate> {
    fn from_ref(input: &ServerState) -> Self {
        input.admin_gate.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
