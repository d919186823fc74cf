//! Match screen: posts the selected ids, hydrates the winner, and holds it for the overlay.

use std::sync::Arc;

use shared::domain::{Dog, DogId};
use thiserror::Error;
use tracing::{error, info};

use crate::{selection::SelectedDogs, ClientError, DogApi};

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("no dogs selected")]
    NothingSelected,
    #[error("matched dog {0} could not be loaded")]
    Missing(DogId),
    #[error(transparent)]
    Client(#[from] ClientError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Dashboard,
}

pub struct MatchFlow {
    api: Arc<dyn DogApi>,
    selection: SelectedDogs,
    matched: Option<Dog>,
}

impl MatchFlow {
    pub fn new(api: Arc<dyn DogApi>, selection: SelectedDogs) -> Self {
        Self {
            api,
            selection,
            matched: None,
        }
    }

    pub fn selection(&self) -> &SelectedDogs {
        &self.selection
    }

    /// The matched dog while the confirmation overlay is open.
    pub fn overlay(&self) -> Option<&Dog> {
        self.matched.as_ref()
    }

    pub async fn confirm(&mut self) -> Result<&Dog, MatchError> {
        if self.selection.is_empty() {
            return Err(MatchError::NothingSelected);
        }

        let dog = match self.request_match().await {
            Ok(dog) => dog,
            Err(err) => {
                error!("failed to send liked dogs: {err}");
                return Err(err);
            }
        };
        info!(id = %dog.id, name = %dog.name, "matched");
        let dog: &Dog = self.matched.insert(dog);
        Ok(dog)
    }

    async fn request_match(&self) -> Result<Dog, MatchError> {
        let ids = self.selection.ids();
        let matched = self.api.match_dogs(&ids).await?;
        let dogs = self.api.fetch_by_ids(std::slice::from_ref(&matched)).await?;
        dogs.into_iter()
            .find(|dog| dog.id == matched)
            .ok_or(MatchError::Missing(matched))
    }

    /// Closes the overlay. The selection itself is kept so the same favorites can be matched again.
    pub fn close(&mut self) -> Navigation {
        self.matched = None;
        Navigation::Dashboard
    }
}

#[cfg(test)]
#[path = "tests/matching_tests.rs"]
mod tests;
