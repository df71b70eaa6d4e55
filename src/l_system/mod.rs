//! Lindenmayer-system grammars for fractal line art: a drawing alphabet, an
//! axiom, per-letter rewrite rules, and a branch angle that may be a fixed
//! number of degrees or a range sampled per turn.
//!
//! Grammars parse from a compact text form. The first non-empty line is the
//! header: the axiom last, the angle second to last, and everything before
//! them the drawing alphabet. Each further line is one `LHS -> RHS` rule.
//!
//! ```text
//! F 60 F++F++F
//! F -> F-F++F-F
//! ```
//!
//! Expansion rewrites every letter in parallel, one pass per order, letters
//! without a rule copying through. Feed the expanded string to
//! [`crate::turtle::TurtleTrait::walk_grammar`] to turn it into lines.

use std::collections::{HashMap, HashSet};

use rand::Rng;

use crate::errors::GrammarError;

/// Turn angle in degrees: fixed, or sampled uniformly from an inclusive
/// range on every turn (the `lo..hi` header form).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BranchAngle {
    Fixed(f64),
    Range(f64, f64),
}

impl BranchAngle {
    /// The angle to turn by right now.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        match self {
            BranchAngle::Fixed(angle) => *angle,
            BranchAngle::Range(lo, hi) => rng.gen_range(*lo..=*hi),
        }
    }
}

#[derive(Clone, Debug)]
pub struct LSystem {
    /// Letters that mean "draw a step forward" when replayed.
    pub alphabet: HashSet<char>,
    pub axiom: String,
    pub rules: HashMap<char, String>,
    pub angle: BranchAngle,
}

impl LSystem {
    /// Parse the text form described in the module docs.
    pub fn parse(text: &str) -> Result<LSystem, GrammarError> {
        let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
        let header = lines.next().ok_or(GrammarError::EmptyGrammar)?;
        let mut tokens: Vec<&str> = header.split_whitespace().collect();
        if tokens.len() < 2 {
            return Err(GrammarError::MalformedHeader(header.to_string()));
        }
        let axiom = tokens.pop().unwrap_or_default().to_string();
        let angle_token = tokens.pop().unwrap_or_default();
        let angle = Self::parse_angle(angle_token)
            .ok_or_else(|| GrammarError::MalformedHeader(header.to_string()))?;
        let alphabet = tokens.iter().flat_map(|token| token.chars()).collect();

        let mut rules = HashMap::new();
        for line in lines {
            let (lhs, rhs) = line
                .split_once(" -> ")
                .ok_or_else(|| GrammarError::MalformedRule(line.to_string()))?;
            let lhs = lhs.trim();
            let mut lhs_chars = lhs.chars();
            match (lhs_chars.next(), lhs_chars.next()) {
                (Some(letter), None) => rules.insert(letter, rhs.trim().to_string()),
                _ => return Err(GrammarError::MalformedRule(line.to_string())),
            };
        }
        Ok(LSystem {
            alphabet,
            axiom,
            rules,
            angle,
        })
    }

    fn parse_angle(token: &str) -> Option<BranchAngle> {
        if let Some((lo, hi)) = token.split_once("..") {
            Some(BranchAngle::Range(lo.parse().ok()?, hi.parse().ok()?))
        } else {
            Some(BranchAngle::Fixed(token.parse().ok()?))
        }
    }

    /// Rewrite the axiom `order` times. Every letter is replaced in the
    /// same pass; letters without a rule survive unchanged. Order zero is
    /// the axiom itself.
    pub fn expand(&self, order: u32) -> String {
        let mut state = self.axiom.clone();
        for _ in 0..order {
            state = state
                .chars()
                .map(|letter| match self.rules.get(&letter) {
                    Some(replacement) => replacement.clone(),
                    None => String::from(letter),
                })
                .collect();
        }
        state
    }
}
