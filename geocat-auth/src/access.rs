// SPDX-License-Identifier: MIT OR Apache-2.0

use geocat_core::{Actor, Publication, covers};

/// Returns `true` if the actor is allowed to read the publication.
pub fn can_read(publication: &Publication, actor: &Actor) -> bool {
    covers(&publication.access_rights.read, actor)
}

/// Returns `true` if the actor is allowed to write the publication.
pub fn can_write(publication: &Publication, actor: &Actor) -> bool {
    covers(&publication.access_rights.write, actor)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use geocat_core::{
        AccessRights, Actor, Publication, PublicationKey, PublicationType, Role, Timestamp,
    };
    use uuid::Uuid;

    use super::{can_read, can_write};

    fn publication(read: &[Role], write: &[Role]) -> Publication {
        Publication {
            key: PublicationKey::new("ws", PublicationType::Map, "map"),
            uuid: Uuid::nil(),
            title: "map".into(),
            style_type: None,
            bounding_box: None,
            owner: Some("alice".into()),
            access_rights: AccessRights::new(
                BTreeSet::from_iter(read.iter().cloned()),
                BTreeSet::from_iter(write.iter().cloned()),
            ),
            last_change: Timestamp::default(),
            sequence: 1,
        }
    }

    #[test]
    fn public_read_private_write() {
        let alice = Role::User("alice".into());
        let publication = publication(&[alice.clone(), Role::Everyone], &[alice]);

        assert!(can_read(&publication, &Actor::Anonymous));
        assert!(can_read(&publication, &Actor::user("bob")));
        assert!(can_write(&publication, &Actor::user("alice")));
        assert!(!can_write(&publication, &Actor::user("bob")));
        assert!(!can_write(&publication, &Actor::Anonymous));
    }

    #[test]
    fn workspace_group_roles() {
        let team = Role::Workspace("team".into());
        let publication = publication(&[team.clone()], &[team]);

        assert!(can_read(&publication, &Actor::user("team")));
        assert!(!can_read(&publication, &Actor::Anonymous));
        assert!(!can_write(&publication, &Actor::user("alice")));
    }
}
