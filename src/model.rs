use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::config::NameMatching;

/// A guest profile recovered from the prospectus table and detail blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestProfileSpec {
    pub name: String,
    pub persona_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expertise: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub potential_topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeSpec {
    pub title: String,
    pub description: String,
    /// May name guests with no matching profile; resolution happens at sync time.
    pub guest_names: Vec<String>,
    pub theme: String,
    /// Raw section inputs the episode was built from.
    pub notes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchBundle {
    pub guests: Vec<GuestProfileSpec>,
    pub episodes: Vec<EpisodeSpec>,
}

impl ResearchBundle {
    /// Profiles keyed by name under `matching`. First profile wins on collision.
    pub fn by_name(&self, matching: NameMatching) -> HashMap<String, &GuestProfileSpec> {
        let mut map = HashMap::with_capacity(self.guests.len());
        for guest in &self.guests {
            map.entry(matching.key(&guest.name)).or_insert(guest);
        }
        map
    }

    /// The first profile whose name matches `name` under `matching`.
    pub fn guest(&self, name: &str, matching: NameMatching) -> Option<&GuestProfileSpec> {
        self.guests.iter().find(|g| matching.same(&g.name, name))
    }
}
