//! Raw user input for offices and switches, validated before it reaches the
//! registry.

use crate::{OfficeDraft, OfficeRegistry, RegistryError, SwitchDraft};

#[derive(Debug, Clone, Default)]
pub struct OfficeForm {
    pub name: String,
    pub latitude: String,
    pub longitude: String,
    pub is_sub_office: bool,
    /// Name of the parent office, as picked by the user.
    pub parent_name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SwitchForm {
    pub name: String,
    pub ip_address: String,
}

fn parse_coordinate(label: &str, raw: &str, limit: f64) -> Result<f64, RegistryError> {
    let value: f64 = raw.trim().parse().map_err(|_| {
        RegistryError::Validation(format!("{} must be a number, got {:?}", label, raw))
    })?;

    if !value.is_finite() || value.abs() > limit {
        return Err(RegistryError::Validation(format!(
            "{} must be between -{} and {}, got {}",
            label, limit, limit, value
        )));
    }
    Ok(value)
}

pub fn parse_latitude(raw: &str) -> Result<f64, RegistryError> {
    parse_coordinate("latitude", raw, 90.0)
}

pub fn parse_longitude(raw: &str) -> Result<f64, RegistryError> {
    parse_coordinate("longitude", raw, 180.0)
}

impl OfficeForm {
    /// Prefills the form with an existing office, the way an edit form
    /// shows current values.
    pub fn from_office(registry: &OfficeRegistry, office: &crate::Office) -> Self {
        OfficeForm {
            name: office.name.clone(),
            latitude: office.latitude.to_string(),
            longitude: office.longitude.to_string(),
            is_sub_office: office.is_sub_office,
            parent_name: office
                .parent_office
                .and_then(|id| registry.get(id))
                .map(|parent| parent.name.clone()),
        }
    }

    /// Validates the raw input and resolves the parent name against the
    /// registry. The parent is ignored unless the sub-office box is ticked.
    pub fn into_draft(self, registry: &OfficeRegistry) -> Result<OfficeDraft, RegistryError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(RegistryError::Validation(
                "office name must not be empty".to_string(),
            ));
        }

        let latitude = parse_latitude(&self.latitude)?;
        let longitude = parse_longitude(&self.longitude)?;

        let parent_office = if self.is_sub_office {
            let parent_name = self
                .parent_name
                .as_deref()
                .map(str::trim)
                .filter(|parent| !parent.is_empty())
                .ok_or_else(|| RegistryError::MissingParent(name.clone()))?;
            let parent = registry
                .find(parent_name)
                .ok_or_else(|| RegistryError::ParentNotFound(parent_name.to_string()))?;
            Some(parent.id)
        } else {
            None
        };

        Ok(OfficeDraft {
            name,
            latitude,
            longitude,
            is_sub_office: self.is_sub_office,
            parent_office,
        })
    }
}

impl SwitchForm {
    pub fn into_draft(self, picture: Option<String>) -> Result<SwitchDraft, RegistryError> {
        let name = self.name.trim().to_string();
        let ip_address = self.ip_address.trim().to_string();
        if name.is_empty() || ip_address.is_empty() {
            return Err(RegistryError::Validation(
                "switch name and IP address are required".to_string(),
            ));
        }

        Ok(SwitchDraft {
            name,
            ip_address,
            picture,
        })
    }
}
