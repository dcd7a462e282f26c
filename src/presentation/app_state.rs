// Application state for HTTP handlers
use crate::application::chart_service::ChartService;
use crate::infrastructure::config::ChartDefaults;
use crate::infrastructure::poller::PollStatus;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub chart_service: ChartService,
    pub poll_status: Arc<RwLock<PollStatus>>,
    pub chart_defaults: ChartDefaults,
}
