// Core phonetic types: pronunciations, stress, and the rhyming part.
//
// A pronunciation is a sequence of ARPAbet phones as written in the CMU
// Pronouncing Dictionary. Vowel phones end in a stress digit (`0`
// unstressed, `1` primary, `2` secondary); consonants carry no digit.
//
// Two words rhyme when they share a rhyming part: the phones from the last
// stressed vowel to the end of the word ("bright" = B R AY1 T and
// "night" = N AY1 T both end in AY1 T).

use std::fmt;

/// Stress level of a vowel phone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stress {
    Unstressed,
    Primary,
    Secondary,
}

impl Stress {
    /// Read the stress digit off a phone. Consonants return `None`.
    pub fn of_phone(phone: &str) -> Option<Stress> {
        match phone.chars().last()? {
            '0' => Some(Stress::Unstressed),
            '1' => Some(Stress::Primary),
            '2' => Some(Stress::Secondary),
            _ => None,
        }
    }

    /// Primary and secondary stress both anchor a rhyme.
    pub fn is_stressed(self) -> bool {
        matches!(self, Stress::Primary | Stress::Secondary)
    }
}

/// One pronunciation of a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pronunciation {
    phones: Vec<String>,
}

impl Pronunciation {
    pub fn new(phones: Vec<String>) -> Self {
        Pronunciation { phones }
    }

    pub fn phones(&self) -> &[String] {
        &self.phones
    }

    /// The phones from the last stressed vowel to the end.
    ///
    /// A pronunciation without any stressed vowel (e.g. "the" = DH AH0)
    /// is its own rhyming part.
    pub fn rhyming_part(&self) -> &[String] {
        let start = self
            .phones
            .iter()
            .rposition(|p| Stress::of_phone(p).is_some_and(Stress::is_stressed))
            .unwrap_or(0);
        &self.phones[start..]
    }

    /// Rhyming part joined with spaces, usable as a map key.
    pub fn rhyme_key(&self) -> String {
        self.rhyming_part().join(" ")
    }
}

impl fmt::Display for Pronunciation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.phones.join(" "))
    }
}

/// A malformed line in a pronouncing dictionary file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based line number.
    pub line: usize,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ParseError {}
