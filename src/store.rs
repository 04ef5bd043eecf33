//! In-process contact store with stable identifiers.
//!
//! Ids come from a counter that only moves forward. Deleting a contact
//! leaves a tombstone in its slot, so every other contact keeps the id it
//! was created with and a listing's positions always line up with ids.

use std::collections::BTreeMap;

use tracing::debug;

use crate::contact::{Contact, ContactError, ContactFields, ContactId, ContactPatch, parse_age};

/// Owns every contact slot created during the process lifetime.
///
/// Not synchronised; the API layer wraps it in a mutex.
#[derive(Debug, Default)]
pub struct ContactStore {
    slots: BTreeMap<ContactId, Option<Contact>>,
    next_id: ContactId,
}

impl ContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `fields` and stores them under the next id.
    ///
    /// A rejected contact consumes no id.
    pub fn create(&mut self, fields: ContactFields) -> Result<ContactId, ContactError> {
        let age = parse_age(&fields.age)?;
        let id = self.next_id;
        self.next_id += 1;
        self.slots.insert(id, Some(Contact { id, name: fields.name, email: fields.email, age }));
        debug!(id, "contact created");
        Ok(id)
    }

    pub fn get(&self, id: ContactId) -> Result<&Contact, ContactError> {
        self.slots
            .get(&id)
            .and_then(Option::as_ref)
            .ok_or(ContactError::NotFound(id))
    }

    /// Applies `patch` to a live contact. Nothing changes unless every
    /// supplied field is valid.
    pub fn update(&mut self, id: ContactId, patch: ContactPatch) -> Result<&Contact, ContactError> {
        let contact = self
            .slots
            .get_mut(&id)
            .and_then(Option::as_mut)
            .ok_or(ContactError::NotFound(id))?;

        let age = patch.age.as_deref().map(parse_age).transpose()?;
        if let Some(name) = patch.name {
            contact.name = name;
        }
        if let Some(email) = patch.email {
            contact.email = email;
        }
        if let Some(age) = age {
            contact.age = age;
        }
        debug!(id, "contact updated");
        Ok(contact)
    }

    /// Tombstones a live contact.
    pub fn delete(&mut self, id: ContactId) -> Result<(), ContactError> {
        match self.slots.get_mut(&id) {
            Some(slot) if slot.is_some() => {
                *slot = None;
                debug!(id, "contact deleted");
                Ok(())
            }
            _ => Err(ContactError::NotFound(id)),
        }
    }

    /// Every slot in creation order, tombstones included as `None`.
    pub fn list(&self) -> impl Iterator<Item = (ContactId, Option<&Contact>)> {
        self.slots.iter().map(|(id, slot)| (*id, slot.as_ref()))
    }

    /// Number of live (not tombstoned) contacts.
    pub fn len(&self) -> usize {
        self.slots.values().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> ContactFields {
        ContactFields::new("Alice", "a@x.com", "30")
    }

    fn bob() -> ContactFields {
        ContactFields::new("Bob", "b@x.com", "40")
    }

    fn ids(store: &ContactStore) -> Vec<(ContactId, Option<String>)> {
        store.list().map(|(id, c)| (id, c.map(|c| c.name.clone()))).collect()
    }

    #[test]
    fn assigns_ids_in_creation_order() {
        let mut store = ContactStore::new();
        assert_eq!(store.create(alice()), Ok(0));
        assert_eq!(store.create(bob()), Ok(1));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn rejected_create_stores_nothing_and_consumes_no_id() {
        let mut store = ContactStore::new();
        let err = store.create(ContactFields::new("Eve", "e@x.com", "old")).unwrap_err();
        assert!(matches!(err, ContactError::Validation(_)));
        assert!(store.is_empty());
        assert_eq!(store.list().count(), 0);

        assert_eq!(store.create(alice()), Ok(0));
    }

    #[test]
    fn delete_keeps_other_ids_stable() {
        let mut store = ContactStore::new();
        store.create(alice()).unwrap();
        store.create(bob()).unwrap();
        store.create(ContactFields::new("Carol", "c@x.com", "50")).unwrap();

        store.delete(1).unwrap();

        assert_eq!(
            ids(&store),
            vec![(0, Some("Alice".into())), (1, None), (2, Some("Carol".into()))],
        );
        assert_eq!(store.get(2).map(|c| c.id), Ok(2));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn ids_are_never_reused_after_delete() {
        let mut store = ContactStore::new();
        store.create(alice()).unwrap();
        store.delete(0).unwrap();
        assert_eq!(store.create(bob()), Ok(1));
        assert_eq!(store.get(0), Err(ContactError::NotFound(0)));
    }

    #[test]
    fn delete_of_unknown_or_tombstoned_id_is_not_found() {
        let mut store = ContactStore::new();
        assert_eq!(store.delete(0), Err(ContactError::NotFound(0)));
        store.create(alice()).unwrap();
        store.delete(0).unwrap();
        assert_eq!(store.delete(0), Err(ContactError::NotFound(0)));
    }

    #[test]
    fn update_of_missing_id_leaves_store_unchanged() {
        let mut store = ContactStore::new();
        store.create(alice()).unwrap();
        let before = ids(&store);

        let patch = ContactPatch { age: Some("31".into()), ..ContactPatch::default() };
        assert_eq!(store.update(5, patch.clone()), Err(ContactError::NotFound(5)));

        store.delete(0).unwrap();
        assert_eq!(store.update(0, patch), Err(ContactError::NotFound(0)));
        assert_eq!(before.len(), store.list().count());
    }

    #[test]
    fn update_checks_existence_before_validating() {
        let mut store = ContactStore::new();
        let patch = ContactPatch { age: Some("soon".into()), ..ContactPatch::default() };
        assert_eq!(store.update(3, patch), Err(ContactError::NotFound(3)));
    }

    #[test]
    fn invalid_update_changes_no_field() {
        let mut store = ContactStore::new();
        store.create(alice()).unwrap();

        let patch = ContactPatch {
            name: Some("Alicia".into()),
            email: None,
            age: Some("thirty-one".into()),
        };
        assert!(matches!(store.update(0, patch), Err(ContactError::Validation(_))));

        let alice = store.get(0).unwrap();
        assert_eq!(alice.name, "Alice");
        assert_eq!(alice.age, 30);
    }

    #[test]
    fn update_replaces_only_supplied_fields() {
        let mut store = ContactStore::new();
        store.create(alice()).unwrap();

        let patch = ContactPatch { email: Some("alice@y.org".into()), ..ContactPatch::default() };
        let updated = store.update(0, patch).unwrap();
        assert_eq!(updated.id, 0);
        assert_eq!(updated.name, "Alice");
        assert_eq!(updated.email, "alice@y.org");
        assert_eq!(updated.age, 30);
    }

    #[test]
    fn create_delete_update_walkthrough() {
        let mut store = ContactStore::new();
        assert_eq!(store.create(alice()), Ok(0));
        assert_eq!(store.create(bob()), Ok(1));
        store.delete(0).unwrap();
        assert_eq!(ids(&store), vec![(0, None), (1, Some("Bob".into()))]);

        let patch = ContactPatch { age: Some("41".into()), ..ContactPatch::default() };
        store.update(1, patch).unwrap();

        let listed: Vec<_> = store.list().collect();
        assert_eq!(listed[0], (0, None));
        let (id, bob) = listed[1];
        assert_eq!(id, 1);
        assert_eq!(bob.map(|b| b.age), Some(41));
    }
}
