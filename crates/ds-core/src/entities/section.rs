use serde::{Deserialize, Serialize};

/// A named grouping of screens or components.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Section {
    pub id: String,
    pub name: String,
}

/// Section reference embedded in item payloads. Only the ID is guaranteed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionRef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}
