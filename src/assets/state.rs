/// Load state of an asynchronously loaded object.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AssetState<T> {
    #[default]
    Pending,
    Loaded(T),
    Failed {
        reason: String,
    },
}

impl<T> AssetState<T> {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    #[must_use]
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn loaded_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        *self = Self::Failed {
            reason: reason.into(),
        };
    }
}
