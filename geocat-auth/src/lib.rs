// SPDX-License-Identifier: MIT OR Apache-2.0

//! Access control for geocat publications.
//!
//! Every publication has a set of roles which can read and a set of roles which can write it. A
//! role is a user, a workspace acting as a group or the `EVERYONE` pseudo-role. Before any access
//! rights are persisted they run through a fixed chain of checks:
//!
//! 1. All names resolve to a known user, a known workspace or `EVERYONE`.
//! 2. At least one role can write.
//! 3. Whoever can write can also read.
//! 4. An acting user who could write before can still write afterwards.
//! 5. The owner of the publication can still write afterwards.
//!
//! The first failing check aborts the chain, nothing gets persisted in that case.
mod access;
mod identity;
mod rights;
#[cfg(test)]
mod test_utils;

pub use access::{can_read, can_write};
pub use identity::{IdentityProvider, ResolveError, resolve_role, validate_identifiers};
pub use rights::{
    RightsChange, RightsError, check_rights, project_effective_roles, require_actor_retains_write,
    require_nonempty_writer, require_owner_retains_write, require_writers_can_read,
};
