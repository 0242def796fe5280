//! Drug module: three-layer architecture (entity in `models`, repository, service).

pub mod repository;
pub mod repo;
pub mod service;

pub use service::DrugService;
