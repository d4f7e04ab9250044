// Application state for HTTP handlers
use crate::application::summary_cache::SummaryCache;
use crate::application::zone_service::ZoneService;

#[derive(Clone)]
pub struct AppState {
    pub zone_service: ZoneService,
    pub summary_cache: SummaryCache,
}
