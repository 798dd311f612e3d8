//! Tag model
//!
//! Tags are free-form labels attached to content. The API accepts them as a
//! JSON array of `{ "name": ... }` objects.

use serde::{Deserialize, Serialize};

/// Tag entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub name: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: None,
            name: name.into(),
        }
    }
}

/// Ordered set of tags as edited on a content form.
///
/// Names are trimmed and lower-cased on insert; blanks and duplicates are
/// rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct TagList(Vec<Tag>);

impl TagList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag, returning whether it was inserted
    pub fn add(&mut self, input: &str) -> bool {
        let name = input.trim().to_lowercase();
        if name.is_empty() || self.contains(&name) {
            return false;
        }
        self.0.push(Tag::new(name));
        true
    }

    /// Remove the tag at `index`, if present
    pub fn remove(&mut self, index: usize) -> Option<Tag> {
        if index < self.0.len() {
            Some(self.0.remove(index))
        } else {
            None
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        let name = name.trim().to_lowercase();
        self.0.iter().any(|t| t.name.to_lowercase() == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }
}

impl<S: AsRef<str>> FromIterator<S> for TagList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = TagList::new();
        for name in iter {
            list.add(name.as_ref());
        }
        list
    }
}

/// Ordered list of subjects. Entries are trimmed; blanks are dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SubjectList(Vec<String>);

impl SubjectList {
    pub fn add(&mut self, input: &str) -> bool {
        let subject = input.trim();
        if subject.is_empty() {
            return false;
        }
        self.0.push(subject.to_string());
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<String> {
        if index < self.0.len() {
            Some(self.0.remove(index))
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for SubjectList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = SubjectList::default();
        for subject in iter {
            list.add(subject.as_ref());
        }
        list
    }
}
