pub mod request_context;
pub mod request_logging;
pub mod trusted_host;
