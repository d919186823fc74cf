use shared::domain::{Dog, DogId};
use thiserror::Error;
use url::Url;

/// Query parameter carrying the selection from the dashboard to the match screen.
pub const SELECTED_DOGS_PARAM: &str = "selectedDogs";

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("malformed selectedDogs parameter: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Favorites chosen on the dashboard. Membership is by [`DogId`]; insertion order is kept for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedDogs {
    dogs: Vec<Dog>,
}

impl SelectedDogs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `dog` unless a dog with the same id is already selected, in which case that one is removed.
    /// Returns whether the dog is selected afterwards.
    pub fn toggle(&mut self, dog: Dog) -> bool {
        if let Some(pos) = self.dogs.iter().position(|d| d.id == dog.id) {
            self.dogs.remove(pos);
            false
        } else {
            self.dogs.push(dog);
            true
        }
    }

    pub fn contains(&self, id: &DogId) -> bool {
        self.dogs.iter().any(|d| &d.id == id)
    }

    pub fn ids(&self) -> Vec<DogId> {
        self.dogs.iter().map(|d| d.id.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dog> {
        self.dogs.iter()
    }

    pub fn len(&self) -> usize {
        self.dogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dogs.is_empty()
    }

    pub fn to_query_param(&self) -> Result<String, SelectionError> {
        Ok(serde_json::to_string(&self.dogs)?)
    }

    /// Parses a decoded parameter value; duplicate ids keep their first occurrence.
    pub fn from_query_param(raw: &str) -> Result<Self, SelectionError> {
        let parsed: Vec<Dog> = serde_json::from_str(raw)?;
        Ok(parsed.into_iter().collect())
    }

    /// `base` with the selection appended as a percent-encoded query parameter.
    pub fn navigation_url(&self, base: &Url) -> Result<Url, SelectionError> {
        let mut url = base.clone();
        url.query_pairs_mut()
            .append_pair(SELECTED_DOGS_PARAM, &self.to_query_param()?);
        Ok(url)
    }

    /// Reads the selection back from a navigation URL. A missing parameter is an empty selection.
    pub fn from_url(url: &Url) -> Result<Self, SelectionError> {
        match url
            .query_pairs()
            .find(|(key, _)| key == SELECTED_DOGS_PARAM)
        {
            Some((_, value)) => Self::from_query_param(&value),
            None => Ok(Self::new()),
        }
    }
}

impl FromIterator<Dog> for SelectedDogs {
    fn from_iter<I: IntoIterator<Item = Dog>>(iter: I) -> Self {
        let mut selection = Self::new();
        for dog in iter {
            if !selection.contains(&dog.id) {
                selection.dogs.push(dog);
            }
        }
        selection
    }
}

#[cfg(test)]
#[path = "tests/selection_tests.rs"]
mod tests;
