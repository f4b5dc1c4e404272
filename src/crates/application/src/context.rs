use std::fmt::{self, Display};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-request context handed to every catalog operation.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub correlation_id: CorrelationId,
    /// Name of the admin performing the operation
    pub actor: String,
}

impl AppContext {
    pub fn new(actor: &str) -> Self {
        Self {
            correlation_id: CorrelationId::new(),
            actor: actor.to_string(),
        }
    }

    pub fn system() -> Self {
        Self::new("system")
    }
}
