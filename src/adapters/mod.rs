// Adapters layer: concrete implementations for external systems (audit API, host table, storage).

pub mod connector;
pub mod http;
pub mod storage;
