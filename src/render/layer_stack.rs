use serde::{Deserialize, Serialize};

/// Role of one composed series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    Base,
    Selected,
    Highlighted,
    /// Caller supplied series, passed through untouched.
    Custom,
}

impl SeriesKind {
    /// Built-in layers in the order they are always emitted.
    pub const BUILT_IN: [SeriesKind; 3] = [Self::Base, Self::Selected, Self::Highlighted];

    #[must_use]
    pub fn from_id(id: &str) -> Self {
        match id {
            "base" => Self::Base,
            "selected" => Self::Selected,
            "highlighted" => Self::Highlighted,
            _ => Self::Custom,
        }
    }

    /// Reserved series id; `None` for custom series.
    #[must_use]
    pub fn reserved_id(self) -> Option<&'static str> {
        match self {
            Self::Base => Some("base"),
            Self::Selected => Some("selected"),
            Self::Highlighted => Some("highlighted"),
            Self::Custom => None,
        }
    }

    /// Renderer z level; selected dots draw above highlighted ones.
    #[must_use]
    pub fn default_z(self) -> i32 {
        match self {
            Self::Base => 2,
            Self::Selected => 4,
            Self::Highlighted => 3,
            Self::Custom => 0,
        }
    }

    #[must_use]
    pub fn is_built_in(self) -> bool {
        self != Self::Custom
    }
}

#[cfg(test)]
mod tests {
    use super::SeriesKind;

    #[test]
    fn built_in_layers_use_canonical_order() {
        let ids: Vec<_> = SeriesKind::BUILT_IN
            .iter()
            .filter_map(|kind| kind.reserved_id())
            .collect();
        assert_eq!(ids, vec!["base", "selected", "highlighted"]);
    }

    #[test]
    fn unknown_ids_are_custom() {
        assert_eq!(SeriesKind::from_id("trend"), SeriesKind::Custom);
        assert_eq!(SeriesKind::from_id("base"), SeriesKind::Base);
        assert!(!SeriesKind::Custom.is_built_in());
    }
}
