//! InMemory Repository 実装

mod matchmaking;

pub use matchmaking::InMemoryMatchmakingRepository;
