//! Paramètres fournis par l'interface: sélection d'unités et filtre SIGEF

use std::collections::BTreeSet;

/// Valeurs sentinelles signifiant "pas de filtre"
const ALL_SENTINELS: [&str; 2] = ["todos", "all"];

/// Ensemble d'identifiants de polygones sélectionnés.
///
/// Une sélection vide équivaut à l'absence de sélection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection(BTreeSet<String>);

impl Selection {
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            ids.into_iter()
                .map(Into::into)
                .map(|id: String| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect(),
        )
    }

    /// Découpe une liste séparée par des virgules ("0,3,12")
    pub fn parse(list: &str) -> Self {
        Self::from_ids(list.split(','))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// `None` si la sélection est absente ou vide
    pub fn active(selection: Option<&Selection>) -> Option<&Selection> {
        selection.filter(|s| !s.is_empty())
    }
}

/// Filtre appliqué à la couche SIGEF
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOption {
    /// Toutes les emprises
    All,
    /// Emprises dont la catégorie (trim, minuscules) est égale à la valeur
    Category(String),
}

impl FilterOption {
    /// Normalise la valeur choisie dans l'interface
    pub fn parse(value: &str) -> Self {
        let normalized = value.trim().to_lowercase();
        if normalized.is_empty() || ALL_SENTINELS.contains(&normalized.as_str()) {
            Self::All
        } else {
            Self::Category(normalized)
        }
    }

    /// Filtre optionnel: absent = toutes les emprises
    pub fn from_option(value: Option<&str>) -> Self {
        value.map(Self::parse).unwrap_or(Self::All)
    }

    /// Teste une catégorie déjà normalisée
    pub fn matches(&self, normalized_category: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Category(expected) => normalized_category == Some(expected.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_parse() {
        let selection = Selection::parse(" 3, 1,,3 ");
        assert_eq!(selection.len(), 2);
        assert!(selection.contains("1"));
        assert!(selection.contains("3"));
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec!["1", "3"]);
    }

    #[test]
    fn test_empty_selection_is_inactive() {
        let empty = Selection::default();
        assert!(Selection::active(Some(&empty)).is_none());
        assert!(Selection::active(None).is_none());

        let some = Selection::from_ids(["0"]);
        assert!(Selection::active(Some(&some)).is_some());
    }

    #[test]
    fn test_filter_sentinel() {
        assert_eq!(FilterOption::parse("Todos"), FilterOption::All);
        assert_eq!(FilterOption::parse(" TODOS "), FilterOption::All);
        assert_eq!(FilterOption::parse("all"), FilterOption::All);
        assert_eq!(FilterOption::from_option(None), FilterOption::All);
    }

    #[test]
    fn test_filter_category() {
        let filter = FilterOption::parse("  Fazenda X ");
        assert_eq!(filter, FilterOption::Category("fazenda x".to_string()));
        assert!(filter.matches(Some("fazenda x")));
        assert!(!filter.matches(Some("fazenda y")));
        assert!(!filter.matches(None));
    }
}
