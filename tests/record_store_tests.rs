use cardkeep::{CardError, CardFields, RecordStore, Session};
use std::fs;

fn fields(company: &str) -> CardFields {
    CardFields {
        company_name: company.to_string(),
        ..CardFields::default()
    }
}

#[test]
fn ids_increase_by_one_without_restart() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = RecordStore::open(dir.path().join("cards.json"));

    assert_eq!(store.next_id(), 1);
    let ids: Vec<u64> = (0..5)
        .map(|i| {
            store
                .add("alice", fields(&format!("Co {i}")), String::new())
                .unwrap()
                .id
        })
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[test]
fn reopen_resumes_after_persisted_max() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cards.json");
    {
        let mut store = RecordStore::open(&path);
        for _ in 0..3 {
            store.add("alice", fields("Acme"), String::new()).unwrap();
        }
    }

    // Simulate a gap left by an earlier process.
    let mut persisted = RecordStore::load(&path).unwrap();
    persisted.retain(|r| r.id != 2);
    fs::write(&path, serde_json::to_vec(&persisted).unwrap()).unwrap();

    let mut store = RecordStore::open(&path);
    assert_eq!(store.next_id(), 4);
    assert_eq!(store.add("bob", fields("Globex"), String::new()).unwrap().id, 4);
}

#[test]
fn round_trip_preserves_every_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cards.json");
    let original = CardFields {
        company_name: "Acme Ltd".to_string(),
        card_holder: "Jane Roe".to_string(),
        designation: "CTO".to_string(),
        mobile_number: "+91 98765 43210".to_string(),
        email: "jane@acme.example".to_string(),
        website: "https://acme.example".to_string(),
        address: "1 Main St\nSpringfield".to_string(),
        customer_type: "Endeavour".to_string(),
        remarks: "met at Zürich expo, follow up".to_string(),
    };

    let saved = RecordStore::open(&path)
        .add("alice", original.clone(), "business_card_images/card_1.png".to_string())
        .unwrap();

    let reloaded = RecordStore::open(&path);
    assert_eq!(reloaded.records(), &[saved.clone()]);
    let record = &reloaded.records()[0];
    assert_eq!(record.owner, "alice");
    assert_eq!(record.image_path, "business_card_images/card_1.png");
    assert_eq!(record.fields, original);
}

#[test]
fn delete_all_empties_store_and_restarts_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cards.json");
    let mut store = RecordStore::open(&path);
    store.add("alice", fields("Acme"), String::new()).unwrap();
    store.add("alice", fields("Acme"), String::new()).unwrap();

    assert!(store.delete_all().unwrap());
    assert!(!path.exists());
    assert!(RecordStore::load(&path).unwrap().is_empty());
    assert!(store.records().is_empty());
    assert_eq!(store.add("alice", fields("Acme"), String::new()).unwrap().id, 1);
}

#[test]
fn delete_all_without_file_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = RecordStore::open(dir.path().join("cards.json"));
    assert!(!store.delete_all().unwrap());
}

#[test]
fn corrupt_file_fails_load_but_open_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cards.json");
    fs::write(&path, b"{ not a list").unwrap();

    assert!(matches!(
        RecordStore::load(&path),
        Err(CardError::StorageRead { .. })
    ));
    let store = RecordStore::open(&path);
    assert!(store.records().is_empty());
    assert_eq!(store.next_id(), 1);
}

#[test]
fn failed_write_does_not_keep_the_record() {
    let dir = tempfile::tempdir().unwrap();
    // A directory where the file should be makes the final rename fail.
    let path = dir.path().join("cards.json");
    fs::create_dir(&path).unwrap();

    let mut store = RecordStore::open(&path);
    let err = store.add("alice", fields("Acme"), String::new()).unwrap_err();
    assert!(matches!(err, CardError::StorageWrite { .. }));
    assert!(store.records().is_empty());
    assert_eq!(store.next_id(), 1);
}

#[test]
fn owners_see_their_own_records_and_admin_sees_all() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = RecordStore::open(dir.path().join("cards.json"));
    store.add("alice", fields("A1"), String::new()).unwrap();
    store.add("bob", fields("B1"), String::new()).unwrap();
    store.add("alice", fields("A2"), String::new()).unwrap();

    let alice = Session::user("alice");
    let seen: Vec<u64> = store.visible_to(&alice).map(|r| r.id).collect();
    assert_eq!(seen, vec![1, 3]);

    let admin = Session::admin("admin");
    assert_eq!(store.visible_to(&admin).count(), 3);

    assert!(store.get_visible(2, &alice).is_none());
    assert_eq!(store.get_visible(2, &admin).map(|r| r.owner.as_str()), Some("bob"));
}
