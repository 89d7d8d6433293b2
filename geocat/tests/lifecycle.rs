// SPDX-License-Identifier: MIT OR Apache-2.0

use std::time::Duration;

use futures_test::task::noop_context;
use geocat::test_utils::{memory_registry, setup_logging};
use geocat::{
    Actor, BoundingBox, EVERYONE, ErrorCode, IdentityProvider, NewPublication, OrderBy,
    PublicationKey, PublicationPatch, PublicationQuery, PublicationType, Registry, StyleType,
};
use geocat_store::identities::IdentityStore;
use geocat_store::publications::PublicationStore;
use geocat_store::sqlite::SqliteStore;
use geocat_store::traits::Transaction;
use mock_instant::thread_local::MockClock;
use tokio::pin;

const ALICE: &str = "alice";

#[tokio::test]
async fn insert_update_delete() {
    setup_logging();
    MockClock::set_system_time(Duration::from_secs(100));

    let registry = memory_registry(&[ALICE]).await;
    let alice = Actor::user(ALICE);
    let bbox = BoundingBox::new(14.0, 49.0, 15.0, 50.0).unwrap();

    let new = NewPublication::new("rivers")
        .title("Řeky")
        .style_type(StyleType::Sld)
        .bounding_box(bbox)
        .read([EVERYONE])
        .write([ALICE]);
    let uuid = new.uuid;

    let inserted = registry
        .insert_publication(&alice, ALICE, PublicationType::Layer, new.clone())
        .await
        .unwrap();
    assert_eq!(inserted.uuid, uuid);
    assert_eq!(inserted.title, "Řeky");
    assert_eq!(inserted.style_type, Some(StyleType::Sld));
    assert_eq!(inserted.bounding_box, Some(bbox));
    assert_eq!(u64::from(inserted.last_change), 100_000_000);

    let key = PublicationKey::new(ALICE, PublicationType::Layer, "rivers");
    assert_eq!(
        registry.get_publication(&key).await.unwrap(),
        Some(inserted.clone())
    );
    assert_eq!(
        registry.get_publication_by_uuid(&uuid).await.unwrap(),
        Some(inserted.clone())
    );

    // Same key.
    let err = registry
        .insert_publication(&alice, ALICE, PublicationType::Layer, new)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyExists);

    // Same uuid under another key.
    let err = registry
        .insert_publication(
            &alice,
            ALICE,
            PublicationType::Map,
            NewPublication::new("rivers")
                .uuid(uuid)
                .read([ALICE])
                .write([ALICE]),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyExists);

    // Same name with another type is a different publication.
    registry
        .insert_publication(
            &alice,
            ALICE,
            PublicationType::Map,
            NewPublication::new("rivers").read([ALICE]).write([ALICE]),
        )
        .await
        .unwrap();

    MockClock::advance_system_time(Duration::from_secs(1));
    let updated = registry
        .update_publication(
            &alice,
            &key,
            PublicationPatch::new().title("Rivers").style_type(None),
        )
        .await
        .unwrap();
    assert_eq!(updated.uuid, uuid);
    assert_eq!(updated.title, "Rivers");
    assert_eq!(updated.style_type, None);
    assert_eq!(updated.bounding_box, Some(bbox));
    assert_eq!(updated.access_rights, inserted.access_rights);
    assert_eq!(u64::from(updated.last_change), 101_000_000);
    assert_eq!(updated.sequence, inserted.sequence);

    MockClock::advance_system_time(Duration::from_secs(1));
    let cleared = registry.set_bounding_box(&key, None).await.unwrap();
    assert_eq!(cleared.bounding_box, None);
    assert_eq!(u64::from(cleared.last_change), 102_000_000);
    assert_eq!(cleared.uuid, uuid);

    let deleted = registry.delete_publication(&key).await.unwrap();
    assert_eq!(deleted, cleared);

    let err = registry.delete_publication(&key).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);

    let err = registry
        .update_publication(&alice, &key, PublicationPatch::new().title("Gone"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);

    let err = registry.set_bounding_box(&key, Some(bbox)).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);

    assert_eq!(registry.get_publication_by_uuid(&uuid).await.unwrap(), None);
}

#[tokio::test]
async fn delete_whole_workspace() {
    setup_logging();
    let registry = memory_registry(&[ALICE, "bob"]).await;

    for (workspace, publication_type, name) in [
        (ALICE, PublicationType::Layer, "b"),
        (ALICE, PublicationType::Map, "a"),
        (ALICE, PublicationType::Layer, "a"),
        ("bob", PublicationType::Layer, "a"),
    ] {
        registry
            .insert_publication(
                &Actor::user(workspace),
                workspace,
                publication_type,
                NewPublication::new(name).read([EVERYONE]).write([EVERYONE]),
            )
            .await
            .unwrap();
    }

    let layers = registry
        .delete_publications(ALICE, Some(PublicationType::Layer))
        .await
        .unwrap();
    let names: Vec<&str> = layers.iter().map(|publication| publication.name()).collect();
    assert_eq!(names, vec!["b", "a"]);

    let rest = registry.delete_publications(ALICE, None).await.unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].publication_type(), PublicationType::Map);

    let infos = registry
        .get_publication_infos(&PublicationQuery::new())
        .await
        .unwrap();
    assert_eq!(infos.len(), 1);
    assert!(infos.keys().all(|key| key.workspace == "bob"));

    assert!(
        registry
            .delete_publications(ALICE, None)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn sqlite_registry() {
    setup_logging();

    let registry = Registry::builder().max_connections(1).build().await.unwrap();

    let permit = registry.store().begin().await.unwrap();
    registry.store().ensure_user(ALICE).await.unwrap();
    registry.store().ensure_workspace("team").await.unwrap();
    registry.store().commit(permit).await.unwrap();

    let alice = Actor::user(ALICE);
    for (name, title) in [("b", "B title"), ("a", "A title")] {
        registry
            .insert_publication(
                &alice,
                ALICE,
                PublicationType::Layer,
                NewPublication::new(name)
                    .title(title)
                    .read([EVERYONE])
                    .write([ALICE, "team"]),
            )
            .await
            .unwrap();
    }

    let infos = registry
        .get_publication_infos(&PublicationQuery::new().order_by(OrderBy::Title))
        .await
        .unwrap();
    let titles: Vec<&str> = infos
        .values()
        .map(|publication| publication.title.as_str())
        .collect();
    assert_eq!(titles, vec!["A title", "B title"]);

    // Insertion order without any ordering requested.
    let infos = registry
        .get_publication_infos(&PublicationQuery::new().workspace(ALICE))
        .await
        .unwrap();
    let names: Vec<&str> = infos.keys().map(|key| key.name.as_str()).collect();
    assert_eq!(names, vec!["b", "a"]);

    let key = PublicationKey::new(ALICE, PublicationType::Layer, "a");
    let err = registry
        .update_publication(&alice, &key, PublicationPatch::new().read([ALICE]))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::WriteWithoutRead);

    // The failed update was rolled back and the store is usable afterwards.
    let updated = registry
        .update_publication(&alice, &key, PublicationPatch::new().read([ALICE, "team"]))
        .await
        .unwrap();
    assert_eq!(
        updated.access_rights.read_names(),
        [ALICE, "team"].into_iter().collect()
    );
    assert_eq!(registry.get_publication(&key).await.unwrap(), Some(updated));

    let err = registry
        .insert_publication(
            &alice,
            ALICE,
            PublicationType::Layer,
            NewPublication::new("a").read([ALICE]).write([ALICE]),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyExists);

    registry.delete_publication(&key).await.unwrap();
    let err = registry.delete_publication(&key).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
}

async fn sqlite_catalog() -> Registry<SqliteStore<'static>, SqliteStore<'static>> {
    let registry = Registry::builder().max_connections(1).build().await.unwrap();

    let permit = registry.store().begin().await.unwrap();
    registry.store().ensure_user(ALICE).await.unwrap();
    registry.store().commit(permit).await.unwrap();

    registry
}

async fn uncommitted_changes_stay_invisible<S, I>(registry: &Registry<S, I>)
where
    S: PublicationStore + Transaction<Error = <S as PublicationStore>::Error>,
    I: IdentityProvider,
{
    let inserted = registry
        .insert_publication(
            &Actor::user(ALICE),
            ALICE,
            PublicationType::Layer,
            NewPublication::new("roads").read([EVERYONE]).write([ALICE]),
        )
        .await
        .unwrap();
    let key = inserted.key.clone();
    let query = PublicationQuery::new();

    // Another caller deletes the publication and did not commit yet.
    let permit = registry.store().begin().await.unwrap();
    registry.store().delete_publication(&key).await.unwrap();

    let infos = registry.get_publication_infos(&query);
    let lookup = registry.get_publication(&key);
    pin!(infos);
    pin!(lookup);

    let mut cx = noop_context();
    assert!(infos.as_mut().poll(&mut cx).is_pending());
    assert!(lookup.as_mut().poll(&mut cx).is_pending());

    registry.store().rollback(permit).await.unwrap();

    // Both reads see the state before the rolled back deletion.
    assert_eq!(infos.await.unwrap().len(), 1);
    assert_eq!(lookup.await.unwrap(), Some(inserted));

    let permit = registry.store().begin().await.unwrap();
    registry.store().delete_publication(&key).await.unwrap();
    registry.store().commit(permit).await.unwrap();

    assert!(registry.get_publication_infos(&query).await.unwrap().is_empty());
    assert_eq!(registry.get_publication(&key).await.unwrap(), None);
}

#[tokio::test]
async fn reads_skip_uncommitted_changes() {
    setup_logging();

    uncommitted_changes_stay_invisible(&memory_registry(&[ALICE]).await).await;
    uncommitted_changes_stay_invisible(&sqlite_catalog().await).await;
}

async fn store_bounding_boxes<S, I>(registry: &Registry<S, I>)
where
    S: PublicationStore + Transaction<Error = <S as PublicationStore>::Error>,
    I: IdentityProvider,
{
    let alice = Actor::user(ALICE);
    let point = BoundingBox::new(3000.0, 3000.0, 3000.0, 3000.0).unwrap();
    let area = BoundingBox::try_from((2000.0, 2000.0, 4000.0, 4000.0)).unwrap();
    let world = BoundingBox::new(-180.0, -90.0, 180.0, 90.0).unwrap();

    let inserted = registry
        .insert_publication(
            &alice,
            ALICE,
            PublicationType::Layer,
            NewPublication::new("point")
                .bounding_box(point)
                .read([EVERYONE])
                .write([ALICE]),
        )
        .await
        .unwrap();
    assert_eq!(inserted.bounding_box, Some(point));
    let key = inserted.key;

    let updated = registry
        .update_publication(
            &alice,
            &key,
            PublicationPatch::new().bounding_box(Some(area)),
        )
        .await
        .unwrap();
    assert_eq!(updated.bounding_box, Some(area));

    registry.set_bounding_box(&key, Some(world)).await.unwrap();

    // Every stored box can be read back and the whole catalog stays queryable.
    let infos = registry
        .get_publication_infos(
            &PublicationQuery::new().bbox_filter(BoundingBox::new(-1.0, -1.0, 1.0, 1.0).unwrap()),
        )
        .await
        .unwrap();
    assert_eq!(infos.len(), 1);
    assert_eq!(infos[&key].bounding_box, Some(world));
    assert_eq!(
        registry.get_publication(&key).await.unwrap().unwrap().bounding_box,
        Some(world)
    );
}

#[tokio::test]
async fn bounding_boxes_stay_valid() {
    setup_logging();

    // Inverted or non-finite boxes can't be constructed and never reach the registry.
    assert!(BoundingBox::new(10.0, 10.0, 0.0, 0.0).is_err());
    assert!(BoundingBox::try_from((0.0, 0.0, f64::INFINITY, 1.0)).is_err());

    store_bounding_boxes(&memory_registry(&[ALICE]).await).await;
    store_bounding_boxes(&sqlite_catalog().await).await;
}
