/// Grocery vocabulary that marks a list as Spanish.
pub const SPANISH_MARKERS: &[&str] = &[
    "leche", "huevos", "pan", "manzanas", "pollo", "arroz", "queso", "yogur", "tomates",
    "cebollas", "patatas", "aceite", "sal", "litros", "docena", "kilo", "gramos", "unidades",
    "paquete",
];

/// More markers than this must appear before a text counts as Spanish.
const SPANISH_THRESHOLD: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Spanish,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
        }
    }
}

/// Keyword heuristic: counts marker words occurring anywhere in the
/// lowercased text (substring match, so "pan" also hits "panadería").
pub fn detect_language(text: &str) -> Language {
    let lowered = text.to_lowercase();
    let hits = SPANISH_MARKERS
        .iter()
        .filter(|word| lowered.contains(*word))
        .count();
    if hits > SPANISH_THRESHOLD {
        Language::Spanish
    } else {
        Language::English
    }
}
