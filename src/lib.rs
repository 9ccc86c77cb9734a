pub mod compactor;
pub mod engine;
pub mod limits;
pub mod model;
pub mod observability;
pub mod rest;
pub mod wal;
