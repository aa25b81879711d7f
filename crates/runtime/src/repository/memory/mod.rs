//! In-memory repository implementations for testing and headless embedding.

mod state;

pub use state::InMemorySaveRepository;
