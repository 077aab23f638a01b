use std::collections::HashSet;

use log::debug;

use crate::{
    Office, OfficeDraft, OfficeId, RegistryError, Switch, SwitchDraft, SwitchId, SwitchUpdate,
};

/// What to do with the direct children of an office being deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Remove the children together with the office.
    Cascade,
    /// Keep the children; their parent reference is left dangling.
    Orphan,
}

/// Data-integrity problems found in a loaded registry.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IntegrityReport {
    pub duplicate_names: Vec<String>,
    /// Sub-offices whose parent id does not resolve, with that id.
    pub dangling_parents: Vec<(String, OfficeId)>,
    /// Offices flagged as sub-offices that carry no parent at all.
    pub missing_parents: Vec<String>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.duplicate_names.is_empty()
            && self.dangling_parents.is_empty()
            && self.missing_parents.is_empty()
    }
}

/// Ordered in-memory collection of offices.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OfficeRegistry {
    offices: Vec<Office>,
}

impl OfficeRegistry {
    pub fn new(offices: Vec<Office>) -> Self {
        OfficeRegistry { offices }
    }

    pub fn offices(&self) -> &[Office] {
        &self.offices
    }

    pub fn into_offices(self) -> Vec<Office> {
        self.offices
    }

    pub fn len(&self) -> usize {
        self.offices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offices.is_empty()
    }

    /// Exact, case-sensitive name lookup.
    pub fn find(&self, name: &str) -> Option<&Office> {
        self.offices.iter().find(|office| office.name == name)
    }

    pub fn get(&self, id: OfficeId) -> Option<&Office> {
        self.offices.iter().find(|office| office.id == id)
    }

    fn get_mut(&mut self, id: OfficeId) -> Result<&mut Office, RegistryError> {
        self.offices
            .iter_mut()
            .find(|office| office.id == id)
            .ok_or_else(|| RegistryError::office_not_found(id))
    }

    /// Resolves the parent of a sub-office. A sub-office whose parent no
    /// longer exists yields `ParentNotFound`.
    pub fn parent_of(&self, office: &Office) -> Result<Option<&Office>, RegistryError> {
        if !office.is_sub_office {
            return Ok(None);
        }
        let Some(parent_id) = office.parent_office else {
            return Err(RegistryError::MissingParent(office.name.clone()));
        };
        self.get(parent_id)
            .map(Some)
            .ok_or_else(|| RegistryError::ParentNotFound(parent_id.to_string()))
    }

    pub fn children_of(&self, id: OfficeId) -> impl Iterator<Item = &Office> {
        self.offices
            .iter()
            .filter(move |office| office.parent_office == Some(id))
    }

    pub fn add(&mut self, draft: OfficeDraft) -> Result<OfficeId, RegistryError> {
        self.check_draft(&draft, None)?;
        let office = Office::from_draft(draft);
        let id = office.id;
        debug!("Adding office {} ({})", office.name, id);
        self.offices.push(office);
        Ok(id)
    }

    /// Replaces every editable field of the office. Switches are kept.
    pub fn update(&mut self, id: OfficeId, draft: OfficeDraft) -> Result<(), RegistryError> {
        if self.get(id).is_none() {
            return Err(RegistryError::office_not_found(id));
        }
        self.check_draft(&draft, Some(id))?;
        debug!("Updating office {} ({})", draft.name, id);
        self.get_mut(id)?.apply_draft(draft);
        Ok(())
    }

    /// Removes the office and, depending on `policy`, its direct children.
    /// Returns the removed offices in registry order.
    pub fn delete(
        &mut self,
        id: OfficeId,
        policy: DeletePolicy,
    ) -> Result<Vec<Office>, RegistryError> {
        if self.get(id).is_none() {
            return Err(RegistryError::office_not_found(id));
        }

        let (removed, kept): (Vec<Office>, Vec<Office>) = std::mem::take(&mut self.offices)
            .into_iter()
            .partition(|office| {
                office.id == id
                    || (policy == DeletePolicy::Cascade && office.parent_office == Some(id))
            });
        self.offices = kept;

        debug!(
            "Deleted office {} with policy {:?}; {} office(s) removed",
            id,
            policy,
            removed.len()
        );
        Ok(removed)
    }

    pub fn add_switch(
        &mut self,
        office_id: OfficeId,
        draft: SwitchDraft,
    ) -> Result<SwitchId, RegistryError> {
        let office = self.get_mut(office_id)?;
        let switch = Switch::from_draft(draft);
        let id = switch.id;
        debug!("Adding switch {} ({}) to {}", switch.name, id, office.name);
        office.switches.push(switch);
        Ok(id)
    }

    pub fn update_switch(
        &mut self,
        office_id: OfficeId,
        switch_id: SwitchId,
        update: SwitchUpdate,
    ) -> Result<(), RegistryError> {
        let office = self.get_mut(office_id)?;
        let switch = office
            .switches
            .iter_mut()
            .find(|switch| switch.id == switch_id)
            .ok_or(RegistryError::SwitchNotFound {
                office: office_id,
                switch: switch_id,
            })?;
        switch.apply_update(update);
        debug!("Updated switch {} in {}", switch_id, office_id);
        Ok(())
    }

    pub fn delete_switch(
        &mut self,
        office_id: OfficeId,
        switch_id: SwitchId,
    ) -> Result<Switch, RegistryError> {
        let office = self.get_mut(office_id)?;
        let Some(position) = office.switches.iter().position(|s| s.id == switch_id) else {
            return Err(RegistryError::SwitchNotFound {
                office: office_id,
                switch: switch_id,
            });
        };
        debug!("Deleting switch {} from {}", switch_id, office.name);
        Ok(office.switches.remove(position))
    }

    pub fn integrity_report(&self) -> IntegrityReport {
        let mut report = IntegrityReport::default();
        let mut seen = HashSet::new();

        for office in &self.offices {
            if !seen.insert(office.name.as_str()) && !report.duplicate_names.contains(&office.name)
            {
                report.duplicate_names.push(office.name.clone());
            }

            if office.is_sub_office {
                match office.parent_office {
                    None => report.missing_parents.push(office.name.clone()),
                    Some(parent) if self.get(parent).is_none() => {
                        report.dangling_parents.push((office.name.clone(), parent))
                    }
                    Some(_) => {}
                }
            }
        }

        report
    }

    /// Validates a draft for the office `editing` (or a new office when
    /// `None`): unique non-empty name, consistent sub-office flag, existing
    /// parent and no ancestor cycle.
    fn check_draft(
        &self,
        draft: &OfficeDraft,
        editing: Option<OfficeId>,
    ) -> Result<(), RegistryError> {
        if draft.name.trim().is_empty() {
            return Err(RegistryError::Validation(
                "office name must not be empty".to_string(),
            ));
        }

        if self
            .offices
            .iter()
            .any(|office| office.name == draft.name && Some(office.id) != editing)
        {
            return Err(RegistryError::DuplicateName(draft.name.clone()));
        }

        let parent_id = match (draft.is_sub_office, draft.parent_office) {
            (false, None) => return Ok(()),
            (false, Some(_)) => return Err(RegistryError::UnexpectedParent(draft.name.clone())),
            (true, None) => return Err(RegistryError::MissingParent(draft.name.clone())),
            (true, Some(parent_id)) => parent_id,
        };

        let parent = self
            .get(parent_id)
            .ok_or_else(|| RegistryError::ParentNotFound(parent_id.to_string()))?;

        if let Some(editing) = editing {
            if self.is_ancestor_or_self(editing, parent_id) {
                return Err(RegistryError::ParentCycle {
                    office: draft.name.clone(),
                    parent: parent.name.clone(),
                });
            }
        }

        Ok(())
    }

    /// Walks the parent chain starting at `start` looking for `ancestor`.
    /// Dangling references and pre-existing loops end the walk.
    fn is_ancestor_or_self(&self, ancestor: OfficeId, start: OfficeId) -> bool {
        let mut visited = HashSet::new();
        let mut current = Some(start);

        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            if !visited.insert(id) {
                return false;
            }
            current = self.get(id).and_then(|office| office.parent_office);
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(name: &str) -> OfficeDraft {
        OfficeDraft {
            name: name.to_string(),
            latitude: 40.4168,
            longitude: -3.7038,
            is_sub_office: false,
            parent_office: None,
        }
    }

    fn child(name: &str, parent: OfficeId) -> OfficeDraft {
        OfficeDraft {
            name: name.to_string(),
            latitude: 40.45,
            longitude: -3.69,
            is_sub_office: true,
            parent_office: Some(parent),
        }
    }

    fn family() -> (OfficeRegistry, OfficeId, OfficeId, OfficeId) {
        let mut registry = OfficeRegistry::default();
        let a = registry.add(root("A")).unwrap();
        let b = registry.add(child("B", a)).unwrap();
        let c = registry.add(child("C", a)).unwrap();
        (registry, a, b, c)
    }

    #[test]
    fn add_and_find_by_exact_name() {
        let mut registry = OfficeRegistry::default();
        let id = registry.add(root("HQ")).unwrap();

        assert_eq!(registry.find("HQ").map(|o| o.id), Some(id));
        assert!(registry.find("hq").is_none());
        assert!(registry.find("Missing").is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = OfficeRegistry::default();
        registry.add(root("HQ")).unwrap();

        let err = registry.add(root("HQ")).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName(name) if name == "HQ"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn renaming_onto_another_office_is_rejected() {
        let (mut registry, a, b, _) = family();

        let err = registry.update(b, child("A", a)).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName(_)));

        // Keeping its own name is fine.
        registry.update(b, child("B", a)).unwrap();
    }

    #[test]
    fn sub_office_requires_existing_parent() {
        let mut registry = OfficeRegistry::default();

        let mut draft = root("B");
        draft.is_sub_office = true;
        assert!(matches!(
            registry.add(draft).unwrap_err(),
            RegistryError::MissingParent(_)
        ));

        let err = registry.add(child("B", OfficeId::generate())).unwrap_err();
        assert!(matches!(err, RegistryError::ParentNotFound(_)));

        let a = registry.add(root("A")).unwrap();
        let mut draft = root("C");
        draft.parent_office = Some(a);
        assert!(matches!(
            registry.add(draft).unwrap_err(),
            RegistryError::UnexpectedParent(_)
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn update_replaces_fields_and_keeps_switches() {
        let mut registry = OfficeRegistry::default();
        let id = registry.add(root("HQ")).unwrap();
        registry
            .add_switch(
                id,
                SwitchDraft {
                    name: "core".to_string(),
                    ip_address: "10.0.0.1".to_string(),
                    picture: None,
                },
            )
            .unwrap();

        let mut draft = root("Head Office");
        draft.latitude = 1.5;
        registry.update(id, draft).unwrap();

        let office = registry.get(id).unwrap();
        assert_eq!(office.name, "Head Office");
        assert_eq!(office.latitude, 1.5);
        assert_eq!(office.switches.len(), 1);
    }

    #[test]
    fn update_of_unknown_office_signals_not_found() {
        let mut registry = OfficeRegistry::default();
        let err = registry
            .update(OfficeId::generate(), root("HQ"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn renaming_parent_keeps_children_attached() {
        let (mut registry, a, b, _) = family();
        registry.update(a, root("A renamed")).unwrap();

        let b = registry.get(b).unwrap();
        let parent = registry.parent_of(b).unwrap().unwrap();
        assert_eq!(parent.name, "A renamed");
    }

    #[test]
    fn cascade_delete_removes_direct_children() {
        let (mut registry, a, _, _) = family();
        registry.add(root("D")).unwrap();

        let removed = registry.delete(a, DeletePolicy::Cascade).unwrap();

        let removed: Vec<_> = removed.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(removed, ["A", "B", "C"]);
        for name in ["A", "B", "C"] {
            assert!(registry.find(name).is_none());
        }
        assert!(registry.find("D").is_some());
    }

    #[test]
    fn orphan_delete_leaves_dangling_children() {
        let (mut registry, a, _, _) = family();

        let removed = registry.delete(a, DeletePolicy::Orphan).unwrap();
        assert_eq!(removed.len(), 1);

        for name in ["B", "C"] {
            let office = registry.find(name).unwrap();
            assert_eq!(office.parent_office, Some(a));
            assert!(matches!(
                registry.parent_of(office),
                Err(RegistryError::ParentNotFound(_))
            ));
        }

        let report = registry.integrity_report();
        assert_eq!(report.dangling_parents.len(), 2);
        assert!(!report.is_clean());
    }

    #[test]
    fn delete_unknown_office_signals_not_found() {
        let (mut registry, ..) = family();
        let err = registry
            .delete(OfficeId::generate(), DeletePolicy::Cascade)
            .unwrap_err();
        assert!(matches!(err, RegistryError::OfficeNotFound(_)));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn self_parenting_and_cycles_are_rejected() {
        let (mut registry, a, b, _) = family();
        let grandchild = registry.add(child("B1", b)).unwrap();

        let err = registry.update(a, child("A", a)).unwrap_err();
        assert!(matches!(err, RegistryError::ParentCycle { .. }));

        let err = registry.update(a, child("A", grandchild)).unwrap_err();
        assert!(matches!(err, RegistryError::ParentCycle { .. }));

        // Moving a child under its sibling is fine.
        let c = registry.find("C").unwrap().id;
        registry.update(c, child("C", b)).unwrap();
        assert_eq!(registry.children_of(b).count(), 2);
    }

    #[test]
    fn switch_lifecycle_by_identity() {
        let mut registry = OfficeRegistry::default();
        let hq = registry.add(root("HQ")).unwrap();

        let switch = registry
            .add_switch(
                hq,
                SwitchDraft {
                    name: "edge-1".to_string(),
                    ip_address: "192.168.1.1".to_string(),
                    picture: Some("edge.jpg".to_string()),
                },
            )
            .unwrap();

        registry
            .update_switch(
                hq,
                switch,
                SwitchUpdate {
                    ip_address: Some("192.168.1.2".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        let stored = registry.get(hq).unwrap().switch(switch).unwrap();
        assert_eq!(stored.name, "edge-1");
        assert_eq!(stored.ip_address, "192.168.1.2");
        assert_eq!(stored.picture.as_deref(), Some("edge.jpg"));

        let deleted = registry.delete_switch(hq, switch).unwrap();
        assert_eq!(deleted.id, switch);
        assert!(registry.find("HQ").unwrap().switches.is_empty());

        let err = registry.delete_switch(hq, switch).unwrap_err();
        assert!(matches!(err, RegistryError::SwitchNotFound { .. }));
    }

    #[test]
    fn deleting_switches_while_walking_them_hits_every_one() {
        let mut registry = OfficeRegistry::default();
        let hq = registry.add(root("HQ")).unwrap();
        for n in 0..4 {
            registry
                .add_switch(
                    hq,
                    SwitchDraft {
                        name: format!("sw-{}", n),
                        ip_address: format!("10.0.0.{}", n),
                        picture: None,
                    },
                )
                .unwrap();
        }

        let ids: Vec<SwitchId> = registry
            .get(hq)
            .unwrap()
            .switches
            .iter()
            .map(|s| s.id)
            .collect();
        for id in ids {
            registry.delete_switch(hq, id).unwrap();
        }
        assert!(registry.get(hq).unwrap().switches.is_empty());
    }

    #[test]
    fn integrity_report_flags_duplicates_from_loaded_data() {
        let mut registry = OfficeRegistry::default();
        registry.add(root("HQ")).unwrap();
        let mut offices = registry.into_offices();
        let mut copy = offices[0].clone();
        copy.id = OfficeId::generate();
        offices.push(copy);

        let report = OfficeRegistry::new(offices).integrity_report();
        assert_eq!(report.duplicate_names, vec!["HQ".to_string()]);
    }
}
