//! Tetris engine (workspace facade crate).
//!
//! Re-exports the rules engine, the session layer and the shared types so callers can
//! depend on a single package. The implementation lives in dedicated crates under `crates/`.

pub use tetris_engine_core as core;
pub use tetris_engine_session as session;
pub use tetris_engine_types as types;
