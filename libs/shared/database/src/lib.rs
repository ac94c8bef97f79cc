pub mod error;
pub mod memory;
pub mod store;
pub mod supabase;

pub use error::StoreError;
pub use memory::InMemoryStore;
pub use store::EntityStore;
pub use supabase::{SupabaseClient, SupabaseStore};

#[cfg(feature = "mocks")]
pub use store::MockEntityStore;
