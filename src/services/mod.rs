pub mod gating;
pub mod session_store;

pub use gating::{Access, AccessPolicy};
pub use session_store::{FileStorage, MemoryStorage, SessionStorage, SessionStore};
