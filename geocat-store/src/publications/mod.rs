// SPDX-License-Identifier: MIT OR Apache-2.0

#[cfg(feature = "memory")]
mod memory;
mod models;
#[cfg(feature = "sqlite")]
mod sqlite;
mod traits;

#[cfg(feature = "memory")]
pub use memory::PublicationsMemoryStore;
#[cfg(feature = "memory")]
pub(crate) use memory::PublicationsSnapshot;
pub use models::{Publications, StoreFilter};
pub use traits::PublicationStore;
