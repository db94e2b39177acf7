//! Contact chain built by walking a clinic's embedded parents.

use sms_model::Entity;
use sms_standards::TierSelector;
use tracing::warn;

/// Upper bound on the ancestor walk. Real hierarchies are three deep.
pub const MAX_HIERARCHY_DEPTH: usize = 16;

/// One reachable contact in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tier {
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub name: Option<String>,
    pub phone: String,
}

impl Tier {
    fn from_entity(entity: &Entity) -> Option<Self> {
        let phone = entity.contact_phone()?;
        Some(Self {
            entity_type: entity.entity_type.clone(),
            entity_id: entity.id.clone(),
            name: entity.contact_name().map(str::to_string),
            phone: phone.to_string(),
        })
    }
}

/// Tiers with a contact phone, closest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactChain {
    tiers: Vec<Tier>,
}

impl ContactChain {
    /// Walk from `clinic` up through its parents.
    ///
    /// Entities without a contact phone are skipped but the walk continues
    /// past them.
    pub fn from_clinic(clinic: &Entity) -> Self {
        let mut tiers = Vec::new();
        let mut current = Some(clinic);
        let mut depth = 0;
        while let Some(entity) = current {
            if depth == MAX_HIERARCHY_DEPTH {
                warn!(
                    max_depth = MAX_HIERARCHY_DEPTH,
                    "facility hierarchy deeper than limit; ignoring remaining ancestors"
                );
                break;
            }
            tiers.extend(Tier::from_entity(entity));
            current = entity.parent.as_deref();
            depth += 1;
        }
        Self { tiers }
    }

    /// A chain holding a single contact.
    pub fn single(entity: &Entity) -> Self {
        Self {
            tiers: Tier::from_entity(entity).into_iter().collect(),
        }
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn closest(&self) -> Option<&Tier> {
        self.tiers.first()
    }

    pub fn topmost(&self) -> Option<&Tier> {
        self.tiers.last()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Tiers picked by `selectors`, in selector order, each tier at most once.
    pub fn select(&self, selectors: &[TierSelector]) -> Vec<&Tier> {
        let mut picked: Vec<usize> = Vec::new();
        let mut push = |idx: usize| {
            if !picked.contains(&idx) {
                picked.push(idx);
            }
        };
        for selector in selectors {
            match selector {
                TierSelector::Topmost => {
                    if let Some(last) = self.tiers.len().checked_sub(1) {
                        push(last);
                    }
                }
                TierSelector::Closest => {
                    if !self.tiers.is_empty() {
                        push(0);
                    }
                }
                TierSelector::All => (0..self.tiers.len()).for_each(&mut push),
                TierSelector::EntityType(entity_type) => self
                    .tiers
                    .iter()
                    .enumerate()
                    .filter(|(_, tier)| tier.entity_type == *entity_type)
                    .for_each(|(idx, _)| push(idx)),
            }
        }
        picked.into_iter().map(|idx| &self.tiers[idx]).collect()
    }
}
