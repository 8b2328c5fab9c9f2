use serde::{Deserialize, Serialize};

/// Number of statements in every round.
pub const FACTS_PER_SET: usize = 3;

/// A single statement shown to the player, with its hidden verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    pub statement: String,
    /// Carried on the wire as the literal "True" / "False".
    #[serde(with = "truth_label")]
    pub truth_value: bool,
    pub explanation: String,
}

/// The three statements that make up one round.
///
/// Length is fixed by the type: a `facts` array of any other size fails to
/// deserialize. The one-lie rule is checked separately by the sanitizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactSet {
    facts: [Fact; FACTS_PER_SET],
}

impl FactSet {
    #[cfg(test)]
    pub fn new(facts: [Fact; FACTS_PER_SET]) -> Self {
        Self { facts }
    }

    pub fn facts(&self) -> &[Fact; FACTS_PER_SET] {
        &self.facts
    }

    pub fn get(&self, index: usize) -> Option<&Fact> {
        self.facts.get(index)
    }

    pub fn false_count(&self) -> usize {
        self.facts.iter().filter(|f| !f.truth_value).count()
    }

    /// Index of the lie, if there is exactly one.
    pub fn lie_index(&self) -> Option<usize> {
        if self.false_count() != 1 {
            return None;
        }
        self.facts.iter().position(|f| !f.truth_value)
    }
}

/// Maps `truth_value` between the model's string labels and a bool.
/// Anything other than a case-insensitive "true" reads as false.
mod truth_label {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "True" } else { "False" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(label.eq_ignore_ascii_case("true"))
    }
}
