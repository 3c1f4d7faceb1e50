//! Password hashing adapters.

mod pbkdf2_hasher;

pub use pbkdf2_hasher::{DEFAULT_ROUNDS, MIN_ROUNDS, Pbkdf2Hasher};
