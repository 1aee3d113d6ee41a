//! Persistence collaborators: the `PartyDirectory` trait and the
//! in-memory backend used by the CLI driver and tests.

pub mod codes;
pub mod memory;
pub mod traits;

pub use codes::generate_code;
pub use memory::InMemoryDirectory;
pub use traits::PartyDirectory;
