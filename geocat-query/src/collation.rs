// SPDX-License-Identifier: MIT OR Apache-2.0

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Folds text for comparison: canonical decomposition, diacritics removed, lowercased.
///
/// ```
/// assert_eq!(geocat_query::normalize("Příliš žluťoučký Kůň"), "prilis zlutoucky kun");
/// ```
pub fn normalize(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Splits text into normalized, maximal alphanumeric runs.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Multi-level sort key for titles.
///
/// Titles are compared by their base letters first, then by accents and finally by case, so
/// "Ďůlek" sorts between "druhá" and "jedna" instead of after every ASCII title.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct TitleKey {
    base: String,
    accents: String,
    original: String,
}

impl TitleKey {
    pub fn new(title: &str) -> Self {
        Self {
            base: normalize(title),
            accents: title.nfc().flat_map(char::to_lowercase).collect(),
            original: title.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{TitleKey, normalize, tokenize};

    #[test]
    fn strip_diacritics() {
        assert_eq!(normalize("Ďůlek kun Karel"), "dulek kun karel");
        assert_eq!(normalize("jedna dva tři čtyři"), "jedna dva tri ctyri");
        assert_eq!(normalize("Svíčky"), "svicky");
    }

    #[test]
    fn split_into_tokens() {
        assert_eq!(
            tokenize("úpěl ďábelské ódy"),
            vec!["upel", "dabelske", "ody"]
        );
        assert_eq!(
            tokenize("test_select_publications_map1e"),
            vec!["test", "select", "publications", "map1e"]
        );
        assert!(tokenize(" -- ").is_empty());
    }

    #[test]
    fn title_order() {
        let mut titles = vec![
            "Svíčky is the best game",
            "Příliš žluťoučký Kůň úpěl ďábelské ódy",
            "Jednobodová vrstva",
            "jedna dva tři čtyři",
            "Ďůlek kun Karel",
            "druhá mapa JeDnA óda",
        ];
        titles.sort_by_key(|title| TitleKey::new(title));

        assert_eq!(
            titles,
            vec![
                "druhá mapa JeDnA óda",
                "Ďůlek kun Karel",
                "jedna dva tři čtyři",
                "Jednobodová vrstva",
                "Příliš žluťoučký Kůň úpěl ďábelské ódy",
                "Svíčky is the best game",
            ]
        );
    }

    #[test]
    fn accents_and_case_break_ties() {
        assert!(TitleKey::new("cote") < TitleKey::new("côte"));
        assert!(TitleKey::new("Côte") < TitleKey::new("côte"));
        assert!(TitleKey::new("côte") < TitleKey::new("cotf"));
    }
}
