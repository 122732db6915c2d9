//! Spelling helpers: word selection and decoy letters.

use crate::assign::AssignmentEngine;
use crate::error::{Error, Result};

pub const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Shuffle the word list and keep at most `max` non-blank words, uppercased.
pub fn pick_words(engine: &mut AssignmentEngine, words: &[String], max: usize) -> Vec<String> {
    engine
        .shuffled(words)
        .iter()
        .map(|w| w.trim().to_uppercase())
        .filter(|w| !w.is_empty())
        .take(max)
        .collect()
}

/// `count` distinct alphabet letters that do not occur in `word`.
pub fn decoy_letters(engine: &mut AssignmentEngine, word: &str, count: usize) -> Result<Vec<char>> {
    let upper = word.to_uppercase();
    let candidates: Vec<char> = ALPHABET.chars().filter(|c| !upper.contains(*c)).collect();
    if candidates.len() < count {
        return Err(Error::InsufficientPool {
            requested: count,
            available: candidates.len(),
        });
    }
    engine.select_round_items(&candidates, count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoys_are_distinct_and_absent() {
        let mut e = AssignmentEngine::with_seed(17);
        for word in ["JALGRATAS", "RONG", "BUSS", "AUTO", "LENNUK", "LAEV"] {
            let decoys = decoy_letters(&mut e, word, 3).unwrap();
            assert_eq!(decoys.len(), 3);
            for (i, d) in decoys.iter().enumerate() {
                assert!(!word.contains(*d), "{} contains decoy {}", word, d);
                assert!(!decoys[i + 1..].contains(d));
            }
        }
    }

    #[test]
    fn test_decoys_exhausted() {
        let mut e = AssignmentEngine::with_seed(17);
        let word = "ABCDEFGHIJKLMNOPQRSTUVWXY";
        assert_eq!(decoy_letters(&mut e, word, 1).unwrap(), vec!['Z']);
        assert!(matches!(
            decoy_letters(&mut e, word, 2),
            Err(Error::InsufficientPool {
                requested: 2,
                available: 1
            })
        ));
    }

    #[test]
    fn test_pick_words() {
        let mut e = AssignmentEngine::with_seed(2);
        let words: Vec<String> = ["bus", "auto", "laev", "rong", "lennuk"]
            .iter()
            .map(|w| w.to_string())
            .collect();
        let picked = pick_words(&mut e, &words, 4);
        assert_eq!(picked.len(), 4);
        for w in &picked {
            assert!(words.contains(&w.to_lowercase()));
            assert_eq!(w, &w.to_uppercase());
        }

        assert_eq!(pick_words(&mut e, &words[..2], 4).len(), 2);

        let blanks = vec![" ".to_string(), "rong".to_string(), String::new()];
        assert_eq!(pick_words(&mut e, &blanks, 4), vec!["RONG".to_string()]);
    }
}
