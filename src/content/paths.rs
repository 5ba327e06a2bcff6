use crate::content::Language;

/// The directory layouts a problem's fragment may be published under, in
/// the order they are tried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathVariant {
    Bare,
    Easy,
    Medium,
    Hard,
}

impl PathVariant {
    pub const ALL: [PathVariant; 4] = [
        PathVariant::Bare,
        PathVariant::Easy,
        PathVariant::Medium,
        PathVariant::Hard,
    ];

    fn dir_suffix(self) -> &'static str {
        match self {
            PathVariant::Bare => "",
            PathVariant::Easy => "-(easy)",
            PathVariant::Medium => "-(medium)",
            PathVariant::Hard => "-(hard)",
        }
    }

    pub fn path(self, pattern_id: &str, problem_id: &str, language: Language) -> String {
        format!(
            "content/{pattern_id}/{problem_id}{}/{}.html",
            self.dir_suffix(),
            language.to_key()
        )
    }
}

pub fn candidate_paths(pattern_id: &str, problem_id: &str, language: Language) -> Vec<String> {
    PathVariant::ALL
        .iter()
        .map(|variant| variant.path(pattern_id, problem_id, language))
        .collect()
}
