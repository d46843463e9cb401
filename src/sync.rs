use std::collections::HashMap;

use tracing::warn;

use crate::config::NameMatching;
use crate::model::EpisodeSpec;

/// Remote guest ids an episode should be linked to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeLinks {
    pub title: String,
    pub guest_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedGuest {
    pub episode_title: String,
    pub guest_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPlan {
    pub episodes: Vec<EpisodeLinks>,
    pub unresolved: Vec<UnresolvedGuest>,
}

/// Resolve every episode's guest names against the collaborator's
/// name → remote id map. Names with no id are reported, not fatal.
pub fn plan_links(
    episodes: &[EpisodeSpec],
    guest_ids: &HashMap<String, String>,
    matching: NameMatching,
) -> LinkPlan {
    let by_key: HashMap<String, &str> = guest_ids
        .iter()
        .map(|(name, id)| (matching.key(name), id.as_str()))
        .collect();

    let mut plan = LinkPlan::default();
    for episode in episodes {
        let mut ids: Vec<String> = Vec::with_capacity(episode.guest_names.len());
        for name in &episode.guest_names {
            match by_key.get(&matching.key(name)) {
                Some(id) if !ids.iter().any(|existing| existing.as_str() == *id) => ids.push(id.to_string()),
                Some(_) => {}
                None => {
                    warn!(guest = %name, episode = %episode.title, "guest has no remote id; skipping link");
                    plan.unresolved.push(UnresolvedGuest {
                        episode_title: episode.title.clone(),
                        guest_name: name.clone(),
                    });
                }
            }
        }
        plan.episodes.push(EpisodeLinks {
            title: episode.title.clone(),
            guest_ids: ids,
        });
    }
    plan
}
