use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use serde_json::from_str;
use std::{fs, path::Path};

use crate::error::WordListError;

static LANG_DIR: Dir = include_dir!("src/lang");

/// A word and its translation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct WordPair {
    #[serde(alias = "fr")]
    pub source: String,
    #[serde(alias = "en")]
    pub target: String,
}

impl WordPair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Which side of a pair is shown and which side is typed.
#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    #[strum(serialize = "source → target")]
    SourceToTarget,
    #[strum(serialize = "target → source")]
    TargetToSource,
}

impl Direction {
    pub fn toggled(self) -> Self {
        match self {
            Direction::SourceToTarget => Direction::TargetToSource,
            Direction::TargetToSource => Direction::SourceToTarget,
        }
    }

    /// The side shown to the learner.
    pub fn prompt_of(self, pair: &WordPair) -> &str {
        match self {
            Direction::SourceToTarget => &pair.source,
            Direction::TargetToSource => &pair.target,
        }
    }

    /// The side the learner has to type.
    pub fn answer_of(self, pair: &WordPair) -> &str {
        match self {
            Direction::SourceToTarget => &pair.target,
            Direction::TargetToSource => &pair.source,
        }
    }

    /// Key under which mistakes on `pair` are counted: always the untranslated
    /// (shown) side.
    pub fn key_of(self, pair: &WordPair) -> &str {
        self.prompt_of(pair)
    }
}

/// An ordered, immutable list of word pairs.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WordList {
    pub name: String,
    pub pairs: Vec<WordPair>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WordListFile {
    Named(WordList),
    Bare(Vec<WordPair>),
}

impl WordList {
    /// Load one of the lists embedded in the binary, e.g. `french_english`.
    pub fn builtin(name: &str) -> Result<Self, WordListError> {
        let file = LANG_DIR
            .get_file(format!("{name}.json"))
            .ok_or_else(|| WordListError::UnknownList(name.to_string()))?;
        let contents = file
            .contents_utf8()
            .ok_or_else(|| WordListError::UnknownList(name.to_string()))?;
        Self::parse(name, contents)
    }

    /// Load a list from a JSON file holding either `{name, pairs}` or a bare
    /// array of pairs.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, WordListError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let fallback_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "custom".to_string());
        Self::parse(&fallback_name, &contents)
    }

    fn parse(fallback_name: &str, contents: &str) -> Result<Self, WordListError> {
        let list = match from_str::<WordListFile>(contents)? {
            WordListFile::Named(list) => list,
            WordListFile::Bare(pairs) => WordList {
                name: fallback_name.to_string(),
                pairs,
            },
        };
        Ok(list)
    }

    /// Reject a list without any pairs.
    pub fn ensure_not_empty(self) -> Result<Self, WordListError> {
        if self.pairs.is_empty() {
            Err(WordListError::Empty(self.name))
        } else {
            Ok(self)
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_french_english() {
        let list = WordList::builtin("french_english").unwrap();

        assert_eq!(list.name, "french_english");
        assert!(!list.is_empty());
        assert!(list.pairs.contains(&WordPair::new("chat", "cat")));
    }

    #[test]
    fn test_unknown_builtin() {
        let err = WordList::builtin("klingon_english").unwrap_err();
        assert!(matches!(err, WordListError::UnknownList(name) if name == "klingon_english"));
    }

    #[test]
    fn test_ensure_not_empty() {
        let empty = WordList::parse("translations", "[]").unwrap();
        let err = empty.ensure_not_empty().unwrap_err();
        assert!(matches!(err, WordListError::Empty(ref name) if name == "translations"));
        assert_eq!(err.to_string(), "word list translations has no word pairs");

        let list = WordList::parse("pets", r#"[{"source": "chat", "target": "cat"}]"#).unwrap();
        assert_eq!(list.ensure_not_empty().unwrap().len(), 1);
    }

    #[test]
    fn test_legacy_field_names() {
        let json_data = r#"[{ "fr": "chien", "en": "dog" }]"#;
        let list = WordList::parse("legacy", json_data).unwrap();

        assert_eq!(list.name, "legacy");
        assert_eq!(list.pairs, vec![WordPair::new("chien", "dog")]);
    }

    #[test]
    fn test_from_path_bare_array() {
        let mut file = tempfile::Builder::new()
            .prefix("animals")
            .suffix(".json")
            .tempfile()
            .unwrap();
        write!(
            file,
            r#"[{{"source": "chat", "target": "cat"}}, {{"source": "vache", "target": "cow"}}]"#
        )
        .unwrap();

        let list = WordList::from_path(file.path()).unwrap();
        assert!(list.name.starts_with("animals"));
        assert_eq!(list.len(), 2);
        assert_eq!(list.pairs[1].target, "cow");
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = WordList::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, WordListError::Io(_)));
    }

    #[test]
    fn test_direction_sides() {
        let pair = WordPair::new("chat", "cat");

        assert_eq!(Direction::SourceToTarget.prompt_of(&pair), "chat");
        assert_eq!(Direction::SourceToTarget.answer_of(&pair), "cat");
        assert_eq!(Direction::SourceToTarget.key_of(&pair), "chat");

        assert_eq!(Direction::TargetToSource.prompt_of(&pair), "cat");
        assert_eq!(Direction::TargetToSource.answer_of(&pair), "chat");
        assert_eq!(Direction::TargetToSource.key_of(&pair), "cat");
    }

    #[test]
    fn test_direction_toggle() {
        assert_eq!(
            Direction::SourceToTarget.toggled(),
            Direction::TargetToSource
        );
        assert_eq!(
            Direction::SourceToTarget.toggled().toggled(),
            Direction::SourceToTarget
        );
    }
}
