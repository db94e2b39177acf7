use serde::{Deserialize, Serialize};

pub const CLINIC: &str = "clinic";
pub const HEALTH_CENTER: &str = "health_center";
pub const DISTRICT_HOSPITAL: &str = "district_hospital";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A facility in the clinic hierarchy as stored in the document store.
///
/// Parents are embedded, so a fetched clinic carries its whole ancestor
/// chain. The chain is only ever walked upward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<Entity>>,
}

impl Entity {
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            id: None,
            rev: None,
            entity_type: entity_type.into(),
            name: None,
            contact: None,
            parent: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_contact(mut self, name: impl Into<String>, phone: impl Into<String>) -> Self {
        self.contact = Some(Contact {
            name: Some(name.into()),
            phone: Some(phone.into()),
        });
        self
    }

    pub fn with_parent(mut self, parent: Entity) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// Contact phone, ignoring blank values.
    pub fn contact_phone(&self) -> Option<&str> {
        self.contact
            .as_ref()
            .and_then(|contact| contact.phone.as_deref())
            .map(str::trim)
            .filter(|phone| !phone.is_empty())
    }

    pub fn contact_name(&self) -> Option<&str> {
        self.contact
            .as_ref()
            .and_then(|contact| contact.name.as_deref())
    }
}
