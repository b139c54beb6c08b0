#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Singles,
    Doubles,
    Unknown,
}

impl SectionKind {
    /// Classifies a widget section by its title. "DOUBLES" is tested first,
    /// so a title mentioning both formats counts as doubles.
    pub fn classify(title: &str) -> Self {
        let title = title.to_uppercase();
        if title.contains("DOUBLES") {
            SectionKind::Doubles
        } else if title.contains("SINGLES") {
            SectionKind::Singles
        } else {
            SectionKind::Unknown
        }
    }
}

/// Raw fields read from one rating section. Every field is independently
/// optional; nothing here is parsed or defaulted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSection {
    pub kind: SectionKind,
    pub rating_text: Option<String>,
    pub confidence_text: Option<String>,
    pub updated_date_text: Option<String>,
}

/// Everything pulled from one rendered profile page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileExtraction {
    pub sections: Vec<ExtractedSection>,
    pub updated_date: Option<String>,
}

impl ProfileExtraction {
    /// The section of the given kind. Later sections override earlier ones.
    pub fn section(&self, kind: SectionKind) -> Option<&ExtractedSection> {
        self.sections.iter().rev().find(|section| section.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
