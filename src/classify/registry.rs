use serde::{Deserialize, Serialize};

/// Curated provider name lists used by the classifier.
///
/// Injected as an immutable configuration value so tests can substitute
/// doubles and deployments can localize to other markets. The default is
/// the Italian household set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRegistry {
    #[serde(default)]
    pub energy: Vec<String>,
    #[serde(default)]
    pub water: Vec<String>,
    #[serde(default)]
    pub telecom: Vec<String>,
    #[serde(default)]
    pub waste: Vec<String>,
    /// Streaming names are recognized but excluded from the utility-bill
    /// test; they classify as subscriptions instead.
    #[serde(default)]
    pub streaming: Vec<String>,
    /// Free-text patterns identifying known family supporters on
    /// incoming transfer descriptions. Empty by default; household
    /// specific.
    #[serde(default)]
    pub supporters: Vec<String>,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self {
            energy: names(&[
                "enel",
                "eni plenitude",
                "plenitude",
                "a2a",
                "edison",
                "iren",
                "hera",
                "acea",
                "sorgenia",
                "octopus",
                "engie",
                "illumia",
            ]),
            water: names(&[
                "acquedotto",
                "smat",
                "abc napoli",
                "gruppo cap",
                "mm spa",
                "publiacqua",
            ]),
            telecom: names(&[
                "tim",
                "vodafone",
                "windtre",
                "wind tre",
                "iliad",
                "fastweb",
                "tiscali",
                "ho mobile",
                "very mobile",
                "postemobile",
                "eolo",
                "sky wifi",
            ]),
            waste: names(&["tari", "amsa", "ama roma", "asia napoli", "alia", "veritas"]),
            streaming: names(&[
                "netflix",
                "spotify",
                "disney",
                "prime video",
                "dazn",
                "now tv",
                "paramount",
                "apple tv",
                "youtube premium",
                "mediaset infinity",
                "tim vision",
                "audible",
                "crunchyroll",
            ]),
            supporters: Vec::new(),
        }
    }
}

impl ProviderRegistry {
    /// True when `text` names a utility provider (energy, water, telecom,
    /// or waste). Streaming names never match here.
    pub fn matches_utility(&self, text: &str) -> bool {
        let haystack = text.to_lowercase();
        if self.streaming.iter().any(|name| haystack.contains(name)) {
            return false;
        }
        [&self.energy, &self.water, &self.telecom, &self.waste]
            .into_iter()
            .any(|list| list.iter().any(|name| haystack.contains(name)))
    }

    pub fn matches_streaming(&self, text: &str) -> bool {
        let haystack = text.to_lowercase();
        self.streaming.iter().any(|name| haystack.contains(name))
    }

    pub fn matches_supporter(&self, text: &str) -> bool {
        let haystack = text.to_lowercase();
        self.supporters
            .iter()
            .any(|name| haystack.contains(&name.to_lowercase()))
    }
}

fn names(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|name| name.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streaming_names_never_match_as_utility() {
        let registry = ProviderRegistry::default();
        assert!(registry.matches_utility("Bolletta Enel Energia"));
        assert!(registry.matches_utility("FASTWEB fibra"));
        assert!(!registry.matches_utility("Netflix abbonamento"));
        assert!(registry.matches_streaming("NETFLIX.COM"));
    }

    #[test]
    fn supporter_patterns_are_configurable() {
        let registry = ProviderRegistry {
            supporters: vec!["nonna maria".into()],
            ..Default::default()
        };
        assert!(registry.matches_supporter("Bonifico da Nonna Maria"));
        assert!(!registry.matches_supporter("Bonifico affitto"));
    }
}
