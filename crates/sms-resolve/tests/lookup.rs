use std::cell::RefCell;
use std::io::Write;

use sms_model::{Entity, MergeKey};
use sms_resolve::{
    FacilityOutcome, LookupError, LookupService, MemoryLookup, RecipientOutcome,
    StoredRecord, StoredRecordRef, ViewRow, resolve, resolve_with,
};
use sms_standards::TierSelector;

const FIXTURE: &str = r#"{
  "facilities": [
    {
      "_id": "4a6399c98ff78ac7da33b639ed60f458",
      "type": "clinic",
      "name": "Example clinic 1",
      "contact": { "name": "Sam Jones", "phone": "+13125551212" },
      "parent": {
        "type": "health_center",
        "contact": { "name": "Neal Young", "phone": "+17085551212" },
        "parent": {
          "type": "district_hospital",
          "contact": { "name": "Bernie Mac", "phone": "+14155551212" }
        }
      }
    }
  ],
  "records": [
    {
      "key": { "year": "2011", "month": "11", "facility": "4a6399c98ff78ac7da33b639ed60f458" },
      "_id": "777399c98ff78ac7da33b639ed60f422",
      "_rev": "484399c98ff78ac7da33b639ed60f923"
    }
  ]
}"#;

/// Records which phones were queried.
struct CountingLookup {
    inner: MemoryLookup,
    phones: RefCell<Vec<String>>,
}

impl LookupService for CountingLookup {
    fn facility_by_phone(&self, phone: &str) -> Result<Vec<ViewRow<Entity>>, LookupError> {
        self.phones.borrow_mut().push(phone.to_string());
        self.inner.facility_by_phone(phone)
    }

    fn record_by_key(
        &self,
        key: &MergeKey,
    ) -> Result<Vec<ViewRow<StoredRecordRef>>, LookupError> {
        self.inner.record_by_key(key)
    }
}

fn counting(inner: MemoryLookup) -> CountingLookup {
    CountingLookup {
        inner,
        phones: RefCell::new(Vec::new()),
    }
}

#[test]
fn loads_fixture_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(FIXTURE.as_bytes()).expect("write fixture");

    let lookup = MemoryLookup::load(file.path()).expect("load fixture");
    assert_eq!(lookup.facilities.len(), 1);

    let rows = lookup
        .record_by_key(&MergeKey {
            year: "2011".to_string(),
            month: "11".to_string(),
            facility: "4a6399c98ff78ac7da33b639ed60f458".to_string(),
        })
        .expect("record rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].key, vec!["2011", "11", "4a6399c98ff78ac7da33b639ed60f458"]);
    assert_eq!(rows[0].value.rev, "484399c98ff78ac7da33b639ed60f923");
}

#[test]
fn missing_fixture_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = MemoryLookup::load(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, LookupError::Io { .. }));
}

#[test]
fn recipient_phone_not_queried_when_chain_suffices() {
    let lookup = counting(MemoryLookup::from_json(FIXTURE).expect("fixture"));
    let resolution = resolve_with(
        &lookup,
        "+13125551212",
        Some("+15551212"),
        &[TierSelector::Topmost],
    )
    .expect("resolve");

    assert!(matches!(resolution.facility, FacilityOutcome::Found(_)));
    assert_eq!(lookup.phones.borrow().as_slice(), ["+13125551212"]);
    assert!(matches!(resolution.recipients, RecipientOutcome::Chain(_)));
}

#[test]
fn recipient_phone_queried_when_reporter_unknown() {
    let lookup = counting(MemoryLookup::new());
    let resolution = resolve_with(
        &lookup,
        "+13125551212",
        Some("+15551212"),
        &[TierSelector::Topmost],
    )
    .expect("resolve");

    assert_eq!(resolution.facility, FacilityOutcome::NotFound);
    assert_eq!(resolution.recipients, RecipientOutcome::NotFound);
    assert_eq!(
        lookup.phones.borrow().as_slice(),
        ["+13125551212", "+15551212"]
    );
}

#[test]
fn live_resolution_matches_resolution_over_fetched_rows() {
    let gateway_owner = Entity::new("health_center")
        .with_id("hc-1")
        .with_contact("Desk", "+15551212");
    let inner = MemoryLookup::from_json(FIXTURE)
        .expect("fixture")
        .with_facility(gateway_owner);
    let selectors = [TierSelector::EntityType("health_post".to_string())];

    let live = resolve_with(&inner, "+13125551212", Some("+15551212"), &selectors)
        .expect("resolve");

    let mut rows = inner.facility_by_phone("+13125551212").expect("reporter rows");
    rows.extend(inner.facility_by_phone("+15551212").expect("gateway rows"));
    let fetched = resolve(&rows, "+13125551212", Some("+15551212"), &selectors);

    assert_eq!(live, fetched);
    assert!(matches!(live.facility, FacilityOutcome::Found(_)));
    match &live.recipients {
        RecipientOutcome::Direct(tier) => assert_eq!(tier.phone, "+15551212"),
        other => panic!("expected direct recipient, got {other:?}"),
    }
}

#[test]
fn record_by_key_without_match_is_empty() {
    let lookup = MemoryLookup::from_json(FIXTURE).expect("fixture");
    let rows = lookup
        .record_by_key(&MergeKey {
            year: "2011".to_string(),
            month: "12".to_string(),
            facility: "4a6399c98ff78ac7da33b639ed60f458".to_string(),
        })
        .expect("record rows");
    assert!(rows.is_empty());
}

#[test]
fn stored_record_is_also_indexed_by_reported_facility() {
    let clinic_key = MergeKey {
        year: "2011".to_string(),
        month: "11".to_string(),
        facility: "4a6399c98ff78ac7da33b639ed60f458".to_string(),
    };
    let value = StoredRecordRef {
        id: "777399c98ff78ac7da33b639ed60f422".to_string(),
        rev: "484399c98ff78ac7da33b639ed60f923".to_string(),
        related_entities: None,
    };
    let lookup = MemoryLookup::new()
        .with_stored(StoredRecord::new(clinic_key.clone(), value).with_facility_id("facility"));

    let reported = MergeKey {
        facility: "facility".to_string(),
        ..clinic_key.clone()
    };
    assert_eq!(lookup.record_by_key(&clinic_key).expect("rows").len(), 1);
    assert_eq!(lookup.record_by_key(&reported).expect("rows").len(), 1);

    let other_month = MergeKey {
        month: "12".to_string(),
        ..reported
    };
    assert!(lookup.record_by_key(&other_month).expect("rows").is_empty());
}
