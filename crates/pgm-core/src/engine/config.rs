//! Configuration for exhaustive inference.

use crate::engine::errors::ModelError;

/// Limits applied when a [`MarkovNetwork`](crate::MarkovNetwork) is built.
///
/// Exact inference enumerates every full assignment, so cost grows with the
/// product of all domain sizes. Callers that need bounded latency set
/// `max_assignments`; construction then fails fast instead of running long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InferenceConfig {
    /// Maximum number of full assignments to enumerate. `None` disables the cap.
    pub max_assignments: Option<u64>,
}

impl InferenceConfig {
    /// A configuration that refuses models with more than `limit` assignments.
    pub fn capped(limit: u64) -> Self {
        Self {
            max_assignments: Some(limit),
        }
    }

    pub(crate) fn validate(self) -> Result<Self, ModelError> {
        if self.max_assignments == Some(0) {
            return Err(ModelError::InvalidParameter(
                "max_assignments must be > 0".into(),
            ));
        }
        Ok(self)
    }

    /// Checks `count` against the cap.
    pub(crate) fn admit(&self, count: u128) -> Result<(), ModelError> {
        match self.max_assignments {
            Some(limit) if count > u128::from(limit) => {
                Err(ModelError::TooManyAssignments { count, limit })
            }
            _ => Ok(()),
        }
    }
}
