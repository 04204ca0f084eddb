use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ContactError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Contact {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub notes: String,
}

/// Editable contact fields, before validation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub notes: String,
}

impl ContactDraft {
    pub fn from_contact(contact: &Contact) -> Self {
        Self {
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            notes: contact.notes.clone(),
        }
    }

    fn validate(&self) -> Result<ContactDraft, ContactError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ContactError::NameRequired);
        }
        let email = self.email.trim();
        if !is_valid_email(email) {
            return Err(ContactError::InvalidEmail(email.to_string()));
        }
        let phone = self.phone.trim();
        if !is_valid_phone(phone) {
            return Err(ContactError::InvalidPhone(phone.to_string()));
        }
        Ok(ContactDraft {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            notes: self.notes.trim().to_string(),
        })
    }
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || email.contains(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

fn is_valid_phone(phone: &str) -> bool {
    phone.chars().any(|c| c.is_ascii_digit())
        && phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '.'))
}

/// The address book. Ids are never reused.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ContactBook {
    pub contacts: Vec<Contact>,
    pub next_id: u32,
}

impl Default for ContactBook {
    fn default() -> Self {
        Self {
            contacts: Vec::new(),
            next_id: 1,
        }
    }
}

impl ContactBook {
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn add(&mut self, draft: &ContactDraft) -> Result<&Contact, ContactError> {
        let valid = draft.validate()?;
        let id = self.next_id;
        self.next_id += 1;
        self.contacts.push(Contact {
            id,
            name: valid.name,
            email: valid.email,
            phone: valid.phone,
            notes: valid.notes,
        });
        Ok(&self.contacts[self.contacts.len() - 1])
    }

    pub fn update(&mut self, id: u32, draft: &ContactDraft) -> Result<&Contact, ContactError> {
        let valid = draft.validate()?;
        let contact = self
            .contacts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(ContactError::NotFound(id))?;
        contact.name = valid.name;
        contact.email = valid.email;
        contact.phone = valid.phone;
        contact.notes = valid.notes;
        Ok(contact)
    }

    pub fn delete(&mut self, id: u32) -> Result<Contact, ContactError> {
        let position = self
            .contacts
            .iter()
            .position(|c| c.id == id)
            .ok_or(ContactError::NotFound(id))?;
        Ok(self.contacts.remove(position))
    }

    /// Case-insensitive substring match over every text field. Empty query lists all.
    pub fn search(&self, query: &str) -> Vec<&Contact> {
        let needle = query.trim().to_lowercase();
        self.contacts
            .iter()
            .filter(|c| {
                needle.is_empty()
                    || [&c.name, &c.email, &c.phone, &c.notes]
                        .iter()
                        .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Remove every contact; returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.contacts.len();
        self.contacts.clear();
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, email: &str, phone: &str) -> ContactDraft {
        ContactDraft {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            notes: String::new(),
        }
    }

    #[test]
    fn add_assigns_incrementing_ids() {
        let mut book = ContactBook::default();
        let first = book.add(&draft("Misty", "misty@cerulean.gym", "555-0101")).unwrap().id;
        let second = book.add(&draft("Brock", "brock@pewter.gym", "555 0102")).unwrap().id;
        assert_eq!((first, second), (1, 2));

        book.delete(second).unwrap();
        let third = book.add(&draft("Erika", "erika@celadon.gym", "+1 (555) 0103")).unwrap().id;
        assert_eq!(third, 3);
    }

    #[test]
    fn validation_rejects_bad_fields() {
        let mut book = ContactBook::default();
        assert_eq!(
            book.add(&draft(" ", "a@b.co", "1")).unwrap_err(),
            ContactError::NameRequired
        );
        assert!(matches!(
            book.add(&draft("Misty", "misty.at.gym", "1")),
            Err(ContactError::InvalidEmail(_))
        ));
        assert!(matches!(
            book.add(&draft("Misty", "misty@gym", "1")),
            Err(ContactError::InvalidEmail(_))
        ));
        assert!(matches!(
            book.add(&draft("Misty", "misty@cerulean.gym", "call me")),
            Err(ContactError::InvalidPhone(_))
        ));
        assert!(book.is_empty());
    }

    #[test]
    fn update_and_delete_missing_ids() {
        let mut book = ContactBook::default();
        let d = draft("Misty", "misty@cerulean.gym", "555");
        assert_eq!(book.update(9, &d).unwrap_err(), ContactError::NotFound(9));
        assert_eq!(book.delete(9).unwrap_err(), ContactError::NotFound(9));

        let id = book.add(&d).unwrap().id;
        let renamed = book
            .update(id, &draft("Misty W.", "misty@cerulean.gym", "555"))
            .unwrap();
        assert_eq!(renamed.name, "Misty W.");
    }

    #[test]
    fn search_is_case_insensitive() {
        let mut book = ContactBook::default();
        book.add(&draft("Misty", "misty@cerulean.gym", "555")).unwrap();
        book.add(&draft("Brock", "brock@pewter.gym", "556")).unwrap();

        assert_eq!(book.search("PEWTER").len(), 1);
        assert_eq!(book.search("55").len(), 2);
        assert_eq!(book.search("").len(), 2);
        assert!(book.search("lance").is_empty());
        assert_eq!(book.clear(), 2);
        assert!(book.is_empty());
    }
}
