//! Snapshot persistence on the local filesystem.

mod json_repository;

pub use json_repository::JsonSnapshotRepository;
