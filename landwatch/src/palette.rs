//! Palette qualitative et attribution des couleurs par catégorie

/// Palette plotly "Pastel" (qualitative, 11 couleurs)
pub const PASTEL: [&str; 11] = [
    "rgb(102, 197, 204)",
    "rgb(246, 207, 113)",
    "rgb(248, 156, 116)",
    "rgb(220, 176, 242)",
    "rgb(135, 197, 95)",
    "rgb(158, 185, 243)",
    "rgb(254, 136, 177)",
    "rgb(201, 219, 116)",
    "rgb(139, 224, 164)",
    "rgb(180, 151, 231)",
    "rgb(179, 179, 179)",
];

/// Couleur d'une catégorie à la position `index` dans l'ordre d'apparition
pub fn cycled(index: usize) -> &'static str {
    PASTEL[index % PASTEL.len()]
}

/// Association catégorie → couleur, dans l'ordre de première apparition
#[derive(Debug, Clone, Default)]
pub struct CategoryPalette {
    entries: Vec<(String, &'static str)>,
}

impl CategoryPalette {
    /// Construit la palette; les doublons gardent leur première position
    pub fn from_categories<'a>(categories: impl IntoIterator<Item = &'a str>) -> Self {
        let mut entries: Vec<(String, &'static str)> = Vec::new();
        for category in categories {
            if entries.iter().any(|(c, _)| c == category) {
                continue;
            }
            let color = cycled(entries.len());
            entries.push((category.to_string(), color));
        }
        Self { entries }
    }

    pub fn color_of(&self, category: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, color)| *color)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seen_order() {
        let palette = CategoryPalette::from_categories(["Marabá", "Altamira", "Marabá", "Anapu"]);

        assert_eq!(palette.len(), 3);
        assert_eq!(palette.color_of("Marabá"), Some(PASTEL[0]));
        assert_eq!(palette.color_of("Altamira"), Some(PASTEL[1]));
        assert_eq!(palette.color_of("Anapu"), Some(PASTEL[2]));
        assert_eq!(palette.color_of("Belém"), None);
    }

    #[test]
    fn test_palette_cycles() {
        let names: Vec<String> = (0..13).map(|i| format!("m{}", i)).collect();
        let palette = CategoryPalette::from_categories(names.iter().map(String::as_str));

        assert_eq!(palette.color_of("m11"), Some(PASTEL[0]));
        assert_eq!(palette.color_of("m12"), Some(PASTEL[1]));
    }
}
