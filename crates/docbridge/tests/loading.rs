//! Lazy loading behavior of the relation accessor.

mod common;

use std::sync::Arc;

use common::{Metadata, bind_relation, metadata_schema, photo, seed_metadata, store};
use docbridge::prelude::*;

#[test]
fn test_related_document_loads_on_first_access() {
    let store = store();
    seed_metadata(&store, 1, &["sunset", "harbor"]);
    let parent = photo(Some(1), "a.jpg");
    let relation = bind_relation(store, true, &parent);

    assert!(!relation.is_loaded());
    assert!(relation.has_related().unwrap());

    let metadata = relation.get_related().unwrap().unwrap();
    assert_eq!(
        metadata.read().unwrap().keywords,
        vec!["sunset".to_string(), "harbor".to_string()]
    );
    assert_eq!(relation.load_state(), LoadState::LoadedPresent);
}

#[test]
fn test_every_access_returns_the_same_handle() {
    let store = store();
    seed_metadata(&store, 1, &["sunset"]);
    let parent = photo(Some(1), "a.jpg");
    let relation = bind_relation(store, true, &parent);

    let first = relation.get_related().unwrap().unwrap();
    let second = relation.get_related().unwrap().unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    // Mutations through one handle are visible through the other
    first.write().unwrap().keywords.push("extra".into());
    assert_eq!(second.read().unwrap().keywords.len(), 2);
}

#[test]
fn test_missing_document_on_nullable_relation() {
    let parent = photo(Some(1), "a.jpg");
    let relation = bind_relation(store(), true, &parent);

    assert!(!relation.has_related().unwrap());
    assert!(relation.get_related().unwrap().is_none());
    assert_eq!(relation.load_state(), LoadState::LoadedEmpty);
}

#[test]
fn test_missing_document_on_non_nullable_relation_yields_stub() {
    let parent = photo(Some(1), "a.jpg");
    let relation = bind_relation(store(), false, &parent);

    assert!(!relation.has_related().unwrap());
    let stub = relation.get_related().unwrap().unwrap();
    assert!(stub.read().unwrap().id().is_none());
    assert!(stub.read().unwrap().keywords.is_empty());
}

#[test]
fn test_unsaved_parent_resolves_to_empty() {
    let store = store();
    seed_metadata(&store, 1, &["sunset"]);
    let parent = photo(None, "new.jpg");
    let relation = bind_relation(store, true, &parent);

    assert!(!relation.has_related().unwrap());
}

#[test]
fn test_preloaded_relation_skips_the_store() {
    let store = store();
    let id = seed_metadata(&store, 1, &["sunset"]);
    let raw = store.get(Metadata::COLLECTION, &id).unwrap();

    // Hand the loader's result straight to the accessor, then empty the
    // store to prove no further query happens.
    store.delete_one(Metadata::COLLECTION, &id).unwrap();

    let parent = photo(Some(1), "a.jpg");
    let relation = HasDocumentRelation::<Metadata>::new(metadata_schema(true), store)
        .bind_context(&parent, Some(raw))
        .unwrap();

    assert_eq!(relation.load_state(), LoadState::LoadedPresent);
    let metadata = relation.get_related().unwrap().unwrap();
    assert_eq!(metadata.read().unwrap().keywords, vec!["sunset".to_string()]);
}

#[test]
fn test_preloaded_empty_result_marks_absent() {
    let store = store();
    seed_metadata(&store, 1, &["would match"]);

    let parent = photo(Some(1), "a.jpg");
    let relation = HasDocumentRelation::<Metadata>::new(metadata_schema(true), store)
        .bind_context(&parent, Some(RawDocument::new()))
        .unwrap();

    // Seeded as loaded-and-absent; the matching stored document is ignored
    assert!(!relation.has_related().unwrap());
}
