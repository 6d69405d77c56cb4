//! Usage: Application layer (logging/startup wiring for host processes).

pub mod logging;
