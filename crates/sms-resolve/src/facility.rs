//! Facility Resolver: reporter clinic and notification recipients.

use std::collections::BTreeSet;

use sms_model::Entity;
use sms_standards::TierSelector;
use tracing::{debug, warn};

use crate::chain::{ContactChain, Tier};
use crate::lookup::{LookupError, LookupService, ViewRow};

/// Result of resolving one phone number against the facility index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacilityOutcome {
    Found(Box<Entity>),
    NotFound,
    /// Several distinct entities share the phone; none is picked.
    Ambiguous { matches: usize },
}

impl FacilityOutcome {
    pub fn entity(&self) -> Option<&Entity> {
        match self {
            FacilityOutcome::Found(entity) => Some(entity.as_ref()),
            _ => None,
        }
    }
}

/// Who receives the notifications owed for a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientOutcome {
    /// Tiers of the reporter's hierarchy chosen by the form's policy.
    Chain(Vec<Tier>),
    /// Contact found by looking up the message's `sent_to` phone.
    Direct(Tier),
    /// The form asks for no notifications.
    NotRequired,
    NotFound,
}

impl RecipientOutcome {
    pub fn tiers(&self) -> &[Tier] {
        match self {
            RecipientOutcome::Chain(tiers) => tiers,
            RecipientOutcome::Direct(tier) => std::slice::from_ref(tier),
            RecipientOutcome::NotRequired | RecipientOutcome::NotFound => &[],
        }
    }
}

/// Both resolutions for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub facility: FacilityOutcome,
    pub chain: ContactChain,
    pub recipients: RecipientOutcome,
}

/// Pick the entity for `phone` out of facility index rows.
///
/// Rows keyed by other phones are ignored, so rows for several phones may
/// be passed together.
pub fn select_facility(rows: &[ViewRow<Entity>], phone: &str) -> FacilityOutcome {
    let phone = phone.trim();
    let matching: Vec<&Entity> = rows
        .iter()
        .filter(|row| row.key.first().map(|key| key.trim()) == Some(phone))
        .map(|row| &row.value)
        .collect();

    let mut ids = BTreeSet::new();
    let mut distinct: Vec<&Entity> = Vec::new();
    for entity in matching {
        let unseen = match &entity.id {
            Some(id) => ids.insert(id.as_str()),
            None => !distinct.contains(&entity),
        };
        if unseen {
            distinct.push(entity);
        }
    }

    match distinct.as_slice() {
        [] => FacilityOutcome::NotFound,
        [entity] => FacilityOutcome::Found(Box::new((*entity).clone())),
        many => FacilityOutcome::Ambiguous {
            matches: many.len(),
        },
    }
}

/// Resolve the reporter and the recipients from already-fetched rows.
///
/// `rows` should hold the facility index rows for `from` and, when the
/// policy cannot be met from the reporter's chain, for `sent_to`.
pub fn resolve(
    rows: &[ViewRow<Entity>],
    from: &str,
    sent_to: Option<&str>,
    selectors: &[TierSelector],
) -> Resolution {
    let (facility, chain) = reporter(rows, from);
    finish(facility, chain, rows, sent_to, selectors)
}

/// Resolve against a live lookup service.
///
/// Queries the reporter phone, and the recipient phone only when the
/// reporter's chain cannot satisfy the policy.
pub fn resolve_with<L: LookupService + ?Sized>(
    lookup: &L,
    from: &str,
    sent_to: Option<&str>,
    selectors: &[TierSelector],
) -> Result<Resolution, LookupError> {
    let mut rows = lookup.facility_by_phone(from)?;
    let (facility, chain) = reporter(&rows, from);

    let needs_sent_to = !selectors.is_empty() && chain.select(selectors).is_empty();
    if needs_sent_to
        && let Some(sent_to) = sent_to.filter(|phone| phone.trim() != from.trim())
    {
        rows.extend(lookup.facility_by_phone(sent_to)?);
    }

    Ok(finish(facility, chain, &rows, sent_to, selectors))
}

fn reporter(rows: &[ViewRow<Entity>], from: &str) -> (FacilityOutcome, ContactChain) {
    let facility = select_facility(rows, from);
    if let FacilityOutcome::Ambiguous { matches } = &facility {
        warn!(matches, "reporter phone matches several facilities");
    }
    let chain = facility
        .entity()
        .map(ContactChain::from_clinic)
        .unwrap_or_default();
    (facility, chain)
}

fn finish(
    facility: FacilityOutcome,
    chain: ContactChain,
    rows: &[ViewRow<Entity>],
    sent_to: Option<&str>,
    selectors: &[TierSelector],
) -> Resolution {
    let recipients = resolve_recipients(&chain, selectors, rows, sent_to);
    debug!(
        facility_found = facility.entity().is_some(),
        chain_len = chain.len(),
        recipients = recipients.tiers().len(),
        "resolved facility and recipients"
    );
    Resolution {
        facility,
        chain,
        recipients,
    }
}

fn resolve_recipients(
    chain: &ContactChain,
    selectors: &[TierSelector],
    rows: &[ViewRow<Entity>],
    sent_to: Option<&str>,
) -> RecipientOutcome {
    if selectors.is_empty() {
        return RecipientOutcome::NotRequired;
    }
    let picked = chain.select(selectors);
    if !picked.is_empty() {
        return RecipientOutcome::Chain(picked.into_iter().cloned().collect());
    }
    let direct = sent_to
        .map(|phone| select_facility(rows, phone))
        .and_then(|outcome| outcome.entity().cloned())
        .and_then(|entity| ContactChain::single(&entity).closest().cloned());
    match direct {
        Some(tier) => RecipientOutcome::Direct(tier),
        None => RecipientOutcome::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sms_model::entity::{CLINIC, DISTRICT_HOSPITAL, HEALTH_CENTER};

    const REPORTER: &str = "+13125551212";
    const GATEWAY: &str = "+15551212";

    fn clinic() -> Entity {
        Entity::new(CLINIC)
            .with_id("4a6399c98ff78ac7da33b639ed60f458")
            .with_contact("Sam Jones", REPORTER)
            .with_parent(
                Entity::new(HEALTH_CENTER)
                    .with_contact("Neal Young", "+17085551212")
                    .with_parent(
                        Entity::new(DISTRICT_HOSPITAL).with_contact("Bernie Mac", "+14155551212"),
                    ),
            )
    }

    fn row(phone: &str, entity: Entity) -> ViewRow<Entity> {
        ViewRow::new(vec![phone.to_string()], entity)
    }

    #[test]
    fn no_rows_resolves_nothing() {
        let resolution = resolve(&[], REPORTER, Some(GATEWAY), &[TierSelector::Topmost]);
        assert_eq!(resolution.facility, FacilityOutcome::NotFound);
        assert!(resolution.chain.is_empty());
        assert_eq!(resolution.recipients, RecipientOutcome::NotFound);
    }

    #[test]
    fn topmost_tier_receives_notifications() {
        let rows = vec![row(REPORTER, clinic())];
        let resolution = resolve(&rows, REPORTER, Some(GATEWAY), &[TierSelector::Topmost]);
        assert!(resolution.facility.entity().is_some());
        let phones: Vec<&str> = resolution
            .recipients
            .tiers()
            .iter()
            .map(|tier| tier.phone.as_str())
            .collect();
        assert_eq!(phones, vec!["+14155551212"]);
    }

    #[test]
    fn rows_for_other_phones_are_ignored() {
        let rows = vec![row("+19999999999", clinic())];
        let resolution = resolve(&rows, REPORTER, None, &[TierSelector::Topmost]);
        assert_eq!(resolution.facility, FacilityOutcome::NotFound);
    }

    #[test]
    fn duplicate_rows_for_same_entity_are_not_ambiguous() {
        let rows = vec![row(REPORTER, clinic()), row(REPORTER, clinic())];
        assert!(matches!(
            select_facility(&rows, REPORTER),
            FacilityOutcome::Found(_)
        ));
    }

    #[test]
    fn distinct_entities_are_ambiguous() {
        let other = clinic().with_id("other");
        let rows = vec![row(REPORTER, clinic()), row(REPORTER, other)];
        assert_eq!(
            select_facility(&rows, REPORTER),
            FacilityOutcome::Ambiguous { matches: 2 }
        );
    }

    #[test]
    fn recipient_falls_back_to_sent_to() {
        let gateway_owner = Entity::new(HEALTH_CENTER)
            .with_id("hc-1")
            .with_contact("Desk", GATEWAY);
        let rows = vec![row(GATEWAY, gateway_owner)];
        let resolution = resolve(&rows, REPORTER, Some(GATEWAY), &[TierSelector::Topmost]);

        assert_eq!(resolution.facility, FacilityOutcome::NotFound);
        match &resolution.recipients {
            RecipientOutcome::Direct(tier) => assert_eq!(tier.phone, GATEWAY),
            other => panic!("expected direct recipient, got {other:?}"),
        }
    }

    #[test]
    fn empty_policy_needs_no_recipient() {
        let resolution = resolve(&[], REPORTER, Some(GATEWAY), &[]);
        assert_eq!(resolution.recipients, RecipientOutcome::NotRequired);
    }
}
