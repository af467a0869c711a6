mod common;

use std::time::Duration;

use cloudnote_core::models::{EditorType, NewNote, NoteUpdate, ShareRequest};
use cloudnote_core::query::{ListFilter, PageRequest, Sort};
use cloudnote_core::{Error, Field};

use common::{harness, register};

#[tokio::test]
async fn create_then_get_round_trips_every_field() {
    let h = harness();
    let owner = register(&h.services.users, "owner@x.com").await;

    let payload = NewNote {
        title: "Reading list".to_string(),
        content: Some("# Books\n- Dune".to_string()),
        tags: Some(vec!["books".to_string(), "2026".to_string()]),
        folder: Some("Personal".to_string()),
        color: Some("blue".to_string()),
        is_pinned: Some(true),
        is_favorite: Some(true),
        is_public: Some(false),
        editor_type: Some(EditorType::Markdown),
        shared_with: Some(vec!["friend@x.com".to_string()]),
        owner_id: None,
    };
    let created = h.services.notes.create(&owner, payload).await.unwrap();
    let fetched = h.services.notes.get_by_id(&owner, &created.id).await.unwrap();

    assert_eq!(fetched.title, "Reading list");
    assert_eq!(fetched.content, "# Books\n- Dune");
    assert_eq!(fetched.tags, vec!["books", "2026"]);
    assert_eq!(fetched.folder, "Personal");
    assert_eq!(fetched.color, "blue");
    assert!(fetched.is_pinned && fetched.is_favorite && !fetched.is_public);
    assert_eq!(fetched.editor_type, EditorType::Markdown);
    assert_eq!(fetched.shared_with, vec!["friend@x.com"]);
    assert_eq!(fetched.owner_id, owner.id);
    assert_eq!(fetched.created_at, created.created_at);
}

#[tokio::test]
async fn delete_succeeds_once() {
    let h = harness();
    let owner = register(&h.services.users, "owner@x.com").await;
    let note = h.services.notes.create(&owner, NewNote::titled("Temp")).await.unwrap();

    h.services.notes.delete(&owner, &note.id).await.unwrap();
    assert!(matches!(
        h.services.notes.delete(&owner, &note.id).await,
        Err(Error::NotFoundOrForbidden)
    ));
}

#[tokio::test]
async fn owner_cannot_be_reassigned() {
    let h = harness();
    let owner = register(&h.services.users, "owner@x.com").await;
    let other = register(&h.services.users, "other@x.com").await;
    let note = h.services.notes.create(&owner, NewNote::titled("Mine")).await.unwrap();

    let update = NoteUpdate {
        owner_id: Some(other.id.clone()),
        ..Default::default()
    };
    let updated = h.services.notes.update(&owner, &note.id, update).await.unwrap();
    assert_eq!(updated.owner_id, owner.id);

    let stored = h.services.notes.get_by_id(&owner, &note.id).await.unwrap();
    assert_eq!(stored.owner_id, owner.id);
    assert!(matches!(
        h.services.notes.get_by_id(&other, &note.id).await,
        Err(Error::NotFoundOrForbidden)
    ));
}

#[tokio::test]
async fn pagination_is_clamped() {
    let h = harness();
    let owner = register(&h.services.users, "owner@x.com").await;
    for i in 0..120 {
        h.services
            .notes
            .create(&owner, NewNote::titled(format!("Note {i}")))
            .await
            .unwrap();
    }

    let page = h
        .services
        .notes
        .list(&owner, &ListFilter::default(), PageRequest::new(Some(500), None), Sort::default())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 100);
    assert_eq!(page.total, 120);

    let page = h
        .services
        .notes
        .list(&owner, &ListFilter::default(), PageRequest::new(Some(-5), None), Sort::default())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 50);
    assert_eq!(page.limit, 50);

    let page = h
        .services
        .notes
        .list(&owner, &ListFilter::default(), PageRequest::new(None, Some(-10)), Sort::default())
        .await
        .unwrap();
    assert_eq!(page.skip, 0);
    assert_eq!(page.page_count(), 3);
}

#[tokio::test]
async fn unknown_sort_falls_back_to_recently_updated() {
    let h = harness();
    let owner = register(&h.services.users, "owner@x.com").await;
    let mut ids = Vec::new();
    for title in ["first", "second", "third"] {
        let note = h.services.notes.create(&owner, NewNote::titled(title)).await.unwrap();
        ids.push(note.id);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let update = NoteUpdate {
        content: Some("edited".to_string()),
        ..Default::default()
    };
    h.services.notes.update(&owner, &ids[0], update).await.unwrap();

    let list = |sort: &'static str| {
        let notes = h.services.notes.clone();
        let owner = owner.clone();
        async move {
            notes
                .list(&owner, &ListFilter::default(), PageRequest::default(), Sort::parse(sort))
                .await
                .unwrap()
                .items
                .into_iter()
                .map(|n| n.id)
                .collect::<Vec<_>>()
        }
    };

    let fallback = list("nonsense").await;
    assert_eq!(fallback, list("-updatedAt").await);
    assert_eq!(fallback, vec![ids[0].clone(), ids[2].clone(), ids[1].clone()]);
}

#[tokio::test]
async fn list_never_includes_other_owners_notes() {
    let h = harness();
    let owner = register(&h.services.users, "owner@x.com").await;
    let other = register(&h.services.users, "other@x.com").await;

    let theirs = h.services.notes.create(&other, NewNote::titled("Public")).await.unwrap();
    let request = ShareRequest {
        is_public: Some(true),
        emails: Some(vec![owner.email.clone()]),
    };
    h.services.sharing.set_sharing(&other, &theirs.id, request).await.unwrap();
    h.services.notes.create(&owner, NewNote::titled("Mine")).await.unwrap();

    let page = h
        .services
        .notes
        .list(&owner, &ListFilter::default(), PageRequest::default(), Sort::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].title, "Mine");
}

#[tokio::test]
async fn has_shares_and_public_filters() {
    let h = harness();
    let owner = register(&h.services.users, "owner@x.com").await;
    register(&h.services.users, "friend@x.com").await;

    let shared = h.services.notes.create(&owner, NewNote::titled("Shared")).await.unwrap();
    let request = ShareRequest {
        is_public: None,
        emails: Some(vec!["friend@x.com".to_string()]),
    };
    h.services.sharing.set_sharing(&owner, &shared.id, request).await.unwrap();
    let public = NewNote {
        is_public: Some(true),
        ..NewNote::titled("Public")
    };
    h.services.notes.create(&owner, public).await.unwrap();
    h.services.notes.create(&owner, NewNote::titled("Private")).await.unwrap();

    let filter = ListFilter {
        has_shares: Some(true),
        ..Default::default()
    };
    let page = h
        .services
        .notes
        .list(&owner, &filter, PageRequest::default(), Sort::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, shared.id);

    let filter = ListFilter {
        is_public: Some(true),
        ..Default::default()
    };
    let page = h
        .services
        .notes
        .list(&owner, &filter, PageRequest::default(), Sort::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].title, "Public");
}

#[tokio::test]
async fn too_many_tags_are_rejected() {
    let h = harness();
    let owner = register(&h.services.users, "owner@x.com").await;
    let payload = NewNote {
        tags: Some((0..51).map(|i| format!("tag{i}")).collect()),
        ..NewNote::titled("Tagged")
    };
    assert!(matches!(
        h.services.notes.create(&owner, payload).await,
        Err(Error::Validation { field: Field::Tags, .. })
    ));
}
