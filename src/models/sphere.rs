use regex::Regex;
use std::sync::LazyLock;

static UNINFORMED: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)N[ÃA]O[ _-]?INFORMAD[OA]|UNINFORMED").ok());

/// True for labels the source uses to mean "no value given". Blank labels count.
pub fn is_uninformed_label(label: &str) -> bool {
    let trimmed = label.trim();
    trimmed.is_empty()
        || UNINFORMED
            .as_ref()
            .is_some_and(|re| re.is_match(trimmed))
}

/// Administrative level of a party unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sphere {
    National,
    State,
    Municipal,
    District,
    Uninformed,
    /// Any label the source uses that is not one of the known levels.
    Other(String),
}

impl Sphere {
    pub fn as_str(&self) -> &str {
        match self {
            Self::National => "NACIONAL",
            Self::State => "ESTADUAL",
            Self::Municipal => "MUNICIPAL",
            Self::District => "DISTRITAL",
            Self::Uninformed => "NÃO INFORMADO",
            Self::Other(label) => label,
        }
    }

    pub fn parse(s: &str) -> Self {
        if is_uninformed_label(s) {
            return Self::Uninformed;
        }
        match s.trim().to_uppercase().as_str() {
            "NACIONAL" | "NATIONAL" => Self::National,
            "ESTADUAL" | "STATE" => Self::State,
            "MUNICIPAL" => Self::Municipal,
            "DISTRITAL" | "DISTRICT" => Self::District,
            _ => Self::Other(s.trim().to_string()),
        }
    }

    pub fn all() -> &'static [Sphere] {
        &[Self::National, Self::State, Self::Municipal, Self::District]
    }

    pub fn is_uninformed(&self) -> bool {
        matches!(self, Self::Uninformed)
    }
}

impl std::fmt::Display for Sphere {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
