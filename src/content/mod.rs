//! Problem content: resolving, fetching and rendering HTML fragments.

pub mod fragment;
pub mod highlight;
pub mod loader;
pub mod paths;
pub mod render;

use crate::catalog::Position;

pub use loader::{ContentLoadError, ContentResponse, LoadedContent, load_content, spawn_load};
pub use paths::{PathVariant, candidate_paths};

/// Solution language of a content fragment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    Cpp,
    JavaScript,
}

impl Language {
    /// Order the variants are offered in under each problem.
    pub const SIDEBAR_ORDER: [Language; 2] = [Language::JavaScript, Language::Cpp];

    pub fn to_key(self) -> &'static str {
        match self {
            Language::Cpp => "cpp",
            Language::JavaScript => "javascript",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "cpp" | "c++" => Some(Language::Cpp),
            "javascript" | "js" => Some(Language::JavaScript),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::Cpp => "C++",
            Language::JavaScript => "JavaScript",
        }
    }

    /// File extension syntect knows the language by.
    pub fn syntax_extension(self) -> &'static str {
        match self {
            Language::Cpp => "cpp",
            Language::JavaScript => "js",
        }
    }
}

/// One request to show a problem in a language. `generation` orders
/// requests so that only the newest response is rendered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadRequest {
    pub position: Position,
    pub language: Language,
    pub generation: u64,
}
