//! Search form state and the local breed narrowing list.
//!
//! [`SearchFormState`] is immutable: every transition returns a new value, so the
//! dashboard can compare the old and new [`FetchKey`] to decide whether results are stale.

use shared::{domain::SortDirection, protocol::SearchQuery};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchFormState {
    search: String,
    from: u32,
    breeds: Vec<String>,
    sort: SortDirection,
}

/// The part of the form the server sees. Breeds compare as a set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchKey {
    pub from: u32,
    pub sort: SortDirection,
    pub breeds: Vec<String>,
}

impl SearchFormState {
    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn from(&self) -> u32 {
        self.from
    }

    /// Active breed filters in the order they were chosen.
    pub fn breeds(&self) -> &[String] {
        &self.breeds
    }

    pub fn sort(&self) -> SortDirection {
        self.sort
    }

    pub fn has_breed(&self, breed: &str) -> bool {
        self.breeds.iter().any(|b| b == breed)
    }

    pub fn with_search(&self, text: impl Into<String>) -> Self {
        Self {
            search: text.into(),
            ..self.clone()
        }
    }

    /// Adds `breed` to the filter set or removes it, and clears the free-text query.
    pub fn toggle_breed(&self, breed: &str) -> Self {
        let breeds = if self.has_breed(breed) {
            self.breeds.iter().filter(|b| *b != breed).cloned().collect()
        } else {
            let mut breeds = self.breeds.clone();
            breeds.push(breed.to_string());
            breeds
        };
        Self {
            search: String::new(),
            breeds,
            ..self.clone()
        }
    }

    pub fn with_sort(&self, sort: SortDirection) -> Self {
        Self {
            sort,
            ..self.clone()
        }
    }

    pub fn with_offset(&self, from: u32) -> Self {
        Self {
            from,
            ..self.clone()
        }
    }

    pub fn query(&self) -> SearchQuery {
        SearchQuery::new(self.from, self.breeds.clone(), self.sort)
    }

    pub fn fetch_key(&self) -> FetchKey {
        let mut breeds = self.breeds.clone();
        breeds.sort();
        FetchKey {
            from: self.from,
            sort: self.sort,
            breeds,
        }
    }
}

/// Locally cached breed names, narrowed by the free-text query for the dropdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreedFilter {
    available: Vec<String>,
}

impl BreedFilter {
    pub fn new(available: Vec<String>) -> Self {
        Self { available }
    }

    pub fn available(&self) -> &[String] {
        &self.available
    }

    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }

    /// Case-insensitive substring match, keeping server order.
    pub fn matching(&self, text: &str) -> Vec<&str> {
        let needle = text.to_lowercase();
        self.available
            .iter()
            .filter(|breed| breed.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/search_tests.rs"]
mod tests;
