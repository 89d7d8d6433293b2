// SPDX-License-Identifier: MIT OR Apache-2.0

#[cfg(feature = "memory")]
mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;
#[cfg(test)]
mod tests;
mod traits;

#[cfg(feature = "memory")]
pub use memory::IdentitiesMemoryStore;
#[cfg(feature = "memory")]
pub(crate) use memory::IdentitiesSnapshot;
pub use traits::IdentityStore;
