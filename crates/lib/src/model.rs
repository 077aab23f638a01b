use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The unique generated ID of an office.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct OfficeId(pub Uuid);

/// The unique generated ID of a switch, stable across edits of the switch
/// and of its siblings.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct SwitchId(pub Uuid);

impl OfficeId {
    pub fn generate() -> Self {
        OfficeId(Uuid::new_v4())
    }
}

impl SwitchId {
    pub fn generate() -> Self {
        SwitchId(Uuid::new_v4())
    }
}

impl fmt::Display for OfficeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Display for SwitchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for OfficeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(OfficeId)
    }
}

impl FromStr for SwitchId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(SwitchId)
    }
}

/// A physical office location. Sub-offices point at their parent by id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Office {
    pub id: OfficeId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub switches: Vec<Switch>,
    pub is_sub_office: bool,
    pub parent_office: Option<OfficeId>,
}

/// A network switch installed at an office.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Switch {
    pub id: SwitchId,
    pub name: String,
    pub ip_address: String,
    /// File name inside the asset directory, if a picture was uploaded.
    pub picture: Option<String>,
}

/// The user-editable fields of an office. Used both for creation and for
/// full-replace updates.
#[derive(Debug, Clone, PartialEq)]
pub struct OfficeDraft {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub is_sub_office: bool,
    pub parent_office: Option<OfficeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchDraft {
    pub name: String,
    pub ip_address: String,
    pub picture: Option<String>,
}

/// Partial switch update: `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwitchUpdate {
    pub name: Option<String>,
    pub ip_address: Option<String>,
    /// `Some(None)` clears the picture reference.
    pub picture: Option<Option<String>>,
}

impl Office {
    pub fn from_draft(draft: OfficeDraft) -> Self {
        Office {
            id: OfficeId::generate(),
            name: draft.name,
            latitude: draft.latitude,
            longitude: draft.longitude,
            switches: Vec::new(),
            is_sub_office: draft.is_sub_office,
            parent_office: draft.parent_office,
        }
    }

    pub(crate) fn apply_draft(&mut self, draft: OfficeDraft) {
        self.name = draft.name;
        self.latitude = draft.latitude;
        self.longitude = draft.longitude;
        self.is_sub_office = draft.is_sub_office;
        self.parent_office = draft.parent_office;
    }

    pub fn switch(&self, id: SwitchId) -> Option<&Switch> {
        self.switches.iter().find(|switch| switch.id == id)
    }
}

impl Switch {
    pub fn from_draft(draft: SwitchDraft) -> Self {
        Switch {
            id: SwitchId::generate(),
            name: draft.name,
            ip_address: draft.ip_address,
            picture: draft.picture,
        }
    }

    pub(crate) fn apply_update(&mut self, update: SwitchUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(ip_address) = update.ip_address {
            self.ip_address = ip_address;
        }
        if let Some(picture) = update.picture {
            self.picture = picture;
        }
    }
}
