use serde::{Deserialize, Serialize};

/// Declared variable `(declared_type, name)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variable {
    pub declared_type: String,
    pub name: String,
}

impl Variable {
    pub fn new(declared_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            declared_type: declared_type.into(),
            name: name.into(),
        }
    }
}
