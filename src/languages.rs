//! Languages the judge accepts. Ids are the judge's own language identifiers;
//! the table is fixed and only used to offer and check `default_language_id`.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Language {
    pub id: i32,
    pub name: &'static str,
    pub extension: &'static str,
}

pub const PYTHON: i32 = 71;

pub const SUPPORTED_LANGUAGES: [Language; 10] = [
    Language { id: 71, name: "Python (3.8.1)", extension: ".py" },
    Language { id: 54, name: "C++ (GCC 9.2.0)", extension: ".cpp" },
    Language { id: 62, name: "Java (OpenJDK 13.0.1)", extension: ".java" },
    Language { id: 63, name: "JavaScript (Node.js 12.14.0)", extension: ".js" },
    Language { id: 50, name: "C (GCC 9.2.0)", extension: ".c" },
    Language { id: 51, name: "C# (Mono 6.6.0.161)", extension: ".cs" },
    Language { id: 60, name: "Go (1.13.5)", extension: ".go" },
    Language { id: 72, name: "Ruby (2.7.0)", extension: ".rb" },
    Language { id: 73, name: "Rust (1.40.0)", extension: ".rs" },
    Language { id: 78, name: "Kotlin (1.3.70)", extension: ".kt" },
];

pub fn find_language(id: i32) -> Option<&'static Language> {
    SUPPORTED_LANGUAGES.iter().find(|l| l.id == id)
}

pub fn is_supported(id: i32) -> bool {
    find_language(id).is_some()
}
