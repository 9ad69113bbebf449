use serde::Deserialize;

/// Seating limits. Loaded from the `business_rules` config section.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BusinessRules {
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u32,
    #[serde(default = "default_min_party_size")]
    pub min_party_size: u32,
    #[serde(default = "default_max_party_size")]
    pub max_party_size: u32,
    /// Reject reservations that would overbook their date.
    #[serde(default)]
    pub enforce_capacity: bool,
}

fn default_max_capacity() -> u32 { 50 }
fn default_min_party_size() -> u32 { 1 }
fn default_max_party_size() -> u32 { 12 }

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
            min_party_size: default_min_party_size(),
            max_party_size: default_max_party_size(),
            enforce_capacity: false,
        }
    }
}
