//! Ports (trait boundaries) for external dependencies.
//!
//! These traits are owned by the domain and implemented by adapters, so the
//! learning code never depends on a concrete storage format or output sink.

pub mod observer;
pub mod repository;

pub use observer::Observer;
pub use repository::ValueTableRepository;
