use std::{collections::HashMap, path::PathBuf};

use log::{debug, info, warn};

use crate::{
    AssetStore, OfficeId, OfficeMap, OfficeRegistry, OfficeStore, RegistryError, SessionError,
    SwitchDraft, SwitchForm, SwitchId, SwitchUpdate, render,
};

/// Locations of the registry file and the picture directory.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub data_file: PathBuf,
    pub images_dir: PathBuf,
}

/// An uploaded picture not yet written to the asset directory.
#[derive(Debug, Clone)]
pub struct PictureUpload {
    pub file_name: String,
    pub contents: Vec<u8>,
}

/// Per-office view state: detail toggle and the switch edit buffer.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OfficeView {
    pub show_details: bool,
    /// Switch currently being edited; `None` means the buffer adds a new one.
    pub editing_switch: Option<SwitchId>,
    pub switch_name: String,
    pub ip_address: String,
    pub picture: Option<String>,
}

impl OfficeView {
    fn clear_switch_buffer(&mut self) {
        self.editing_switch = None;
        self.switch_name.clear();
        self.ip_address.clear();
        self.picture = None;
    }
}

/// State of one interactive session over the registry.
///
/// Every mutation goes through [`Session::apply`], which flushes the whole
/// registry to the store once the mutation succeeded.
pub struct Session {
    store: OfficeStore,
    assets: AssetStore,
    registry: OfficeRegistry,
    selected: Option<OfficeId>,
    views: HashMap<OfficeId, OfficeView>,
}

impl Session {
    pub fn open(config: &RegistryConfig) -> Result<Self, SessionError> {
        let store = OfficeStore::new(config.data_file.clone());
        let registry = OfficeRegistry::new(store.load()?);

        let report = registry.integrity_report();
        for name in &report.duplicate_names {
            warn!("Registry contains more than one office named {:?}", name);
        }
        for (name, parent) in &report.dangling_parents {
            warn!("Office {:?} refers to missing parent {}", name, parent);
        }
        for name in &report.missing_parents {
            warn!("Sub-office {:?} has no parent office", name);
        }

        Ok(Session {
            store,
            assets: AssetStore::new(config.images_dir.clone()),
            registry,
            selected: None,
            views: HashMap::new(),
        })
    }

    pub fn registry(&self) -> &OfficeRegistry {
        &self.registry
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Runs a mutation against a copy of the registry and persists it. The
    /// copy replaces the in-memory registry only once the save succeeded, so
    /// a failed mutation or flush leaves both memory and store untouched.
    pub fn apply<T, F>(&mut self, mutation: F) -> Result<T, SessionError>
    where
        F: FnOnce(&mut OfficeRegistry) -> Result<T, RegistryError>,
    {
        let mut staged = self.registry.clone();
        let result = mutation(&mut staged)?;
        self.store.save(staged.offices())?;
        self.registry = staged;

        let registry = &self.registry;
        if let Some(selected) = self.selected {
            if registry.get(selected).is_none() {
                debug!("Selected office {} is gone, clearing selection", selected);
                self.selected = None;
            }
        }
        self.views.retain(|id, _| registry.get(*id).is_some());

        Ok(result)
    }

    pub fn select(&mut self, name: &str) -> Result<OfficeId, SessionError> {
        let id = self
            .registry
            .find(name)
            .map(|office| office.id)
            .ok_or_else(|| RegistryError::OfficeNotFound(name.to_string()))?;
        self.selected = Some(id);
        Ok(id)
    }

    pub fn selected(&self) -> Option<OfficeId> {
        self.selected
    }

    fn selected_or_err(&self) -> Result<OfficeId, SessionError> {
        self.selected.ok_or(SessionError::NoSelection)
    }

    pub fn view(&self, id: OfficeId) -> OfficeView {
        self.views.get(&id).cloned().unwrap_or_default()
    }

    fn view_mut(&mut self, id: OfficeId) -> &mut OfficeView {
        self.views.entry(id).or_default()
    }

    /// Flips the detail toggle of the selected office and returns its new
    /// value.
    pub fn toggle_details(&mut self) -> Result<bool, SessionError> {
        let id = self.selected_or_err()?;
        let view = self.view_mut(id);
        view.show_details = !view.show_details;
        Ok(view.show_details)
    }

    /// Map of the selected office. Fails if a sub-office's parent no longer
    /// exists.
    pub fn render_selected(&self) -> Result<OfficeMap, SessionError> {
        let id = self.selected_or_err()?;
        let office = self
            .registry
            .get(id)
            .ok_or_else(|| RegistryError::office_not_found(id))?;
        let parent = self.registry.parent_of(office)?;
        Ok(render(office, parent))
    }

    /// Loads a switch of the selected office into the edit buffer.
    pub fn begin_switch_edit(&mut self, switch_id: SwitchId) -> Result<(), SessionError> {
        let office_id = self.selected_or_err()?;
        let switch = self
            .registry
            .get(office_id)
            .and_then(|office| office.switch(switch_id))
            .cloned()
            .ok_or(RegistryError::SwitchNotFound {
                office: office_id,
                switch: switch_id,
            })?;

        let view = self.view_mut(office_id);
        view.editing_switch = Some(switch.id);
        view.switch_name = switch.name;
        view.ip_address = switch.ip_address;
        view.picture = switch.picture;
        Ok(())
    }

    pub fn set_switch_buffer(&mut self, form: SwitchForm) -> Result<(), SessionError> {
        let office_id = self.selected_or_err()?;
        let view = self.view_mut(office_id);
        view.switch_name = form.name;
        view.ip_address = form.ip_address;
        Ok(())
    }

    /// Adds or updates a switch of the selected office from the edit
    /// buffer. The picture upload, if any, is stored once the buffer is
    /// valid and the target switch exists. The buffer is cleared on success.
    pub fn submit_switch(
        &mut self,
        picture: Option<PictureUpload>,
    ) -> Result<SwitchId, SessionError> {
        let office_id = self.selected_or_err()?;
        let view = self.view(office_id);
        let form = SwitchForm {
            name: view.switch_name.clone(),
            ip_address: view.ip_address.clone(),
        };

        let draft = form.into_draft(None)?;

        // Resolve the target before touching the asset directory.
        let office = self
            .registry
            .get(office_id)
            .ok_or_else(|| RegistryError::office_not_found(office_id))?;
        if let Some(switch_id) = view.editing_switch {
            if office.switch(switch_id).is_none() {
                return Err(RegistryError::SwitchNotFound {
                    office: office_id,
                    switch: switch_id,
                }
                .into());
            }
        }

        let stored_picture = match picture {
            Some(upload) => Some(self.assets.store(&upload.file_name, &upload.contents)?),
            None => None,
        };

        let switch_id = match view.editing_switch {
            None => {
                let draft = SwitchDraft {
                    picture: stored_picture,
                    ..draft
                };
                self.apply(|registry| registry.add_switch(office_id, draft))?
            }
            Some(switch_id) => {
                let update = SwitchUpdate {
                    name: Some(draft.name),
                    ip_address: Some(draft.ip_address),
                    picture: stored_picture.map(Some),
                };
                self.apply(|registry| registry.update_switch(office_id, switch_id, update))?;
                switch_id
            }
        };

        self.view_mut(office_id).clear_switch_buffer();
        info!("Saved switch {} of office {}", switch_id, office_id);
        Ok(switch_id)
    }
}
