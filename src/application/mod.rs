// Application layer - use cases and collaborator contracts
pub mod clock;
pub mod poller;
pub mod readings_source;
pub mod session_store;
pub mod summary_cache;
pub mod zone_service;
