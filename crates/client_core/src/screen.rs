use shared::domain::Dog;

/// What the dashboard's main view currently renders.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScreenState {
    #[default]
    Loading,
    Success {
        dogs: Vec<Dog>,
        available_breeds: Vec<String>,
    },
    Error {
        message: String,
    },
}

impl ScreenState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ScreenState::Loading)
    }

    pub fn dogs(&self) -> Option<&[Dog]> {
        match self {
            ScreenState::Success { dogs, .. } => Some(dogs),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ScreenState::Error { message } => Some(message),
            _ => None,
        }
    }
}
