//! Production rules: validation of the raw editor text and the per-letter rule table.
//!
//! Rules are written as `(A,AB+[C]),(B,A-B)`: one clause per letter, the letter on the left of the
//! comma and its replacement body on the right. Separating commas between clauses are optional.

use crate::error::{ValidationError, ValidationErrors};
use std::iter::Peekable;
use std::str::CharIndices;

const ALPHABET_LEN: usize = 26;

/// Returns true for the rewritable letters `A`..=`Z`.
pub fn is_letter(c: char) -> bool {
    c.is_ascii_uppercase()
}

/// Returns true for every symbol a rule body may contain.
pub fn is_body_symbol(c: char) -> bool {
    is_letter(c) || matches!(c, '+' | '-' | '[' | ']')
}

fn is_start_symbol(c: char) -> bool {
    is_body_symbol(c) || c == ','
}

fn slot(letter: char) -> Option<usize> {
    is_letter(letter).then(|| letter as usize - 'A' as usize)
}

/// Checks the starting sequence and the rules text.
///
/// Each check runs independently, so the returned [`ValidationErrors`] holds every problem found:
///
/// 1. the starting sequence only contains symbols (and separator commas);
/// 2. the rules text follows the `(L,body),(L,body)` grammar;
/// 3. every clause has balanced, properly ordered brackets;
/// 4. no letter has more than one rule.
///
/// This is a pure function of its inputs.
pub fn validate(start_sequence: &str, rules_text: &str) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    if let Some((position, found)) = start_sequence
        .chars()
        .enumerate()
        .find(|&(_, c)| !is_start_symbol(c))
    {
        errors.push(ValidationError::InvalidStartSequence { position, found });
    }

    let mut parser = ClauseParser::new(rules_text);
    loop {
        match parser.next_clause() {
            Ok(Some(_)) => {}
            Ok(None) => break,
            Err(e) => {
                errors.push(e);
                break;
            }
        }
    }

    errors.extend(check_brackets(rules_text));
    errors.extend(check_duplicates(rules_text));

    match ValidationErrors::from_vec(errors) {
        Some(errors) => Err(errors),
        None => Ok(()),
    }
}

/// Bracket count and order, per `"),"`-separated clause of the raw text.
fn check_brackets(rules_text: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (clause, text) in rules_text.split("),").enumerate() {
        let open = text.chars().filter(|&c| c == '[').count();
        let close = text.chars().filter(|&c| c == ']').count();
        if open != close {
            errors.push(ValidationError::UnbalancedBrackets {
                clause,
                open,
                close,
            });
            continue;
        }

        let mut depth: isize = 0;
        for c in text.chars() {
            match c {
                '[' => depth += 1,
                ']' => depth -= 1,
                _ => {}
            }
            if depth < 0 {
                errors.push(ValidationError::MisnestedBrackets { clause });
                break;
            }
        }
    }

    errors
}

/// Letters appearing more than once as `(L,` in the raw text.
fn check_duplicates(rules_text: &str) -> Vec<ValidationError> {
    let mut counts = [0usize; ALPHABET_LEN];
    for window in rules_text.as_bytes().windows(3) {
        if window[0] == b'(' && window[1].is_ascii_uppercase() && window[2] == b',' {
            counts[(window[1] - b'A') as usize] += 1;
        }
    }

    counts
        .iter()
        .zip('A'..='Z')
        .filter(|&(&n, _)| n > 1)
        .map(|(_, letter)| ValidationError::DuplicateRule { letter })
        .collect()
}

/// Single-pass recursive-descent reader for the rules grammar.
struct ClauseParser<'a> {
    text: &'a str,
    chars: Peekable<CharIndices<'a>>,
    consumed: usize,
}

impl<'a> ClauseParser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.char_indices().peekable(),
            consumed: 0,
        }
    }

    fn byte_offset(&mut self) -> usize {
        self.chars.peek().map_or(self.text.len(), |&(i, _)| i)
    }

    fn malformed(&self) -> ValidationError {
        ValidationError::MalformedRules {
            position: self.consumed,
        }
    }

    fn bump_if(&mut self, pred: impl Fn(char) -> bool) -> Option<char> {
        let (_, c) = self.chars.next_if(|&(_, c)| pred(c))?;
        self.consumed += 1;
        Some(c)
    }

    fn expect(&mut self, expected: char) -> Result<(), ValidationError> {
        self.bump_if(|c| c == expected)
            .map(|_| ())
            .ok_or_else(|| self.malformed())
    }

    /// Reads the next `(L,body)` clause and its optional trailing comma.
    fn next_clause(&mut self) -> Result<Option<(char, &'a str)>, ValidationError> {
        if self.chars.peek().is_none() {
            return Ok(None);
        }

        self.expect('(')?;
        let letter = self.bump_if(is_letter).ok_or_else(|| self.malformed())?;
        self.expect(',')?;

        let start = self.byte_offset();
        while self.bump_if(is_body_symbol).is_some() {}
        let end = self.byte_offset();

        self.expect(')')?;
        self.bump_if(|c| c == ',');

        Ok(Some((letter, &self.text[start..end])))
    }
}

/// One production body per letter, looked up directly by letter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleTable {
    bodies: [Option<String>; ALPHABET_LEN],
}

impl RuleTable {
    /// Builds the table from the rules text in one structured pass.
    ///
    /// Letters of `start_sequence` that have no rule get an identity rule. Fails on the first
    /// grammar error or duplicated letter; use [`validate`] (or [`RuleTable::parse`]) to collect
    /// every problem instead.
    pub fn build(rules_text: &str, start_sequence: &str) -> Result<Self, ValidationError> {
        let mut table = Self::default();
        let mut parser = ClauseParser::new(rules_text);

        while let Some((letter, body)) = parser.next_clause()? {
            if table.get(letter).is_some() {
                return Err(ValidationError::DuplicateRule { letter });
            }
            table.insert(letter, body.to_string());
        }

        for letter in start_sequence.chars().filter(|&c| is_letter(c)) {
            if table.get(letter).is_none() {
                table.insert(letter, letter.to_string());
            }
        }

        tracing::debug!(rules = table.len(), "built rule table");
        Ok(table)
    }

    /// Validates both inputs, then builds the table.
    pub fn parse(start_sequence: &str, rules_text: &str) -> Result<Self, ValidationErrors> {
        validate(start_sequence, rules_text)?;
        Ok(Self::build(rules_text, start_sequence)?)
    }

    fn insert(&mut self, letter: char, body: String) {
        if let Some(i) = slot(letter) {
            self.bodies[i] = Some(body);
        }
    }

    /// The replacement body for `letter`, if it has one.
    pub fn get(&self, letter: char) -> Option<&str> {
        slot(letter).and_then(|i| self.bodies[i].as_deref())
    }

    /// Number of letters with a rule (explicit or identity).
    pub fn len(&self) -> usize {
        self.bodies.iter().filter(|b| b.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates `(letter, body)` pairs in alphabetical order.
    pub fn iter(&self) -> impl Iterator<Item = (char, &str)> {
        ('A'..='Z')
            .zip(self.bodies.iter())
            .filter_map(|(letter, body)| body.as_deref().map(|b| (letter, b)))
    }
}
