//! Session and persistence module
//!
//! Everything between the pure simulation in `blockfall-core` and a front
//! end: where saves live ([`store`]), what they look like ([`codec`]), and
//! when they are written ([`session`]).
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{MemoryStore, Session, SessionConfig};
//! use blockfall_types::GameAction;
//!
//! let mut session = Session::new(MemoryStore::new(), &SessionConfig::default());
//! session.continue_or_new_game();
//!
//! session.apply(GameAction::Pause);
//! assert!(session.has_saved_game());
//! ```

pub mod codec;
pub mod session;
pub mod store;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use codec::{decode_snapshot, encode_snapshot};
pub use session::{AutosavePolicy, Session, SessionConfig};
pub use store::{FileStore, MemoryStore, SaveStore, StoreError};
