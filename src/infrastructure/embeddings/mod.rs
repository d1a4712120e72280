pub mod clip_service;
pub mod noop;
