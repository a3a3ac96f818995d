//! Document store implementations

mod local;

pub use local::LocalDocumentStore;
