//! Drop-correctness rules.
//!
//! A rule is a pure predicate over `(dropped item, slot)`. The built-in rules are
//! selected once per game through [`MatchRule`]; hosts with their own notion of a
//! match implement [`MatchPolicy`] directly.

use match_drop_types::{Color, Item, Slot, COLOR_EPSILON};
use serde::{Deserialize, Serialize};

/// Absorbs f32 rounding of a channel difference, so a difference of exactly
/// `epsilon` in decimal terms still matches.
const COLOR_MATCH_SLACK: f32 = 1e-6;

/// Decides whether a dropped item satisfies a slot.
pub trait MatchPolicy {
    fn is_match(&self, item: &Item, slot: &Slot) -> bool;
}

/// Built-in match rules.
///
/// # Examples
///
/// ```
/// use match_drop_core::{MatchPolicy, MatchRule};
/// use match_drop_types::{Color, Expectation, Item, Position, Slot};
///
/// let slot = Slot::new(0, Position::ZERO, Expectation::color(Color::RED));
/// let item = Item::new("circle").with_color(Color::rgb(0.995, 0.0, 0.0));
///
/// assert!(MatchRule::color().is_match(&item, &slot));
/// assert!(!MatchRule::Identity.is_match(&item, &slot));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum MatchRule {
    /// Item identity equals the slot's expected identity.
    Identity,
    /// Every RGBA channel within `epsilon` of the slot's expected color.
    Color {
        #[serde(default = "default_epsilon")]
        epsilon: f32,
    },
    /// Type tags equal and colors match within `epsilon`.
    Compound {
        #[serde(default = "default_epsilon")]
        epsilon: f32,
    },
}

fn default_epsilon() -> f32 {
    COLOR_EPSILON
}

impl MatchRule {
    pub fn color() -> Self {
        MatchRule::Color {
            epsilon: COLOR_EPSILON,
        }
    }

    pub fn compound() -> Self {
        MatchRule::Compound {
            epsilon: COLOR_EPSILON,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchRule::Identity => "identity",
            MatchRule::Color { .. } => "color",
            MatchRule::Compound { .. } => "compound",
        }
    }
}

impl MatchPolicy for MatchRule {
    fn is_match(&self, item: &Item, slot: &Slot) -> bool {
        match *self {
            MatchRule::Identity => slot.expected.identity.as_ref() == Some(&item.id),
            MatchRule::Color { epsilon } => color_matches(item, slot, epsilon),
            MatchRule::Compound { epsilon } => {
                item.type_tag == slot.expected.type_tag && color_matches(item, slot, epsilon)
            }
        }
    }
}

/// Channel-wise tolerance check; missing colors count as transparent.
pub fn colors_match(dropped: Color, expected: Color, epsilon: f32) -> bool {
    dropped.approx_eq(&expected, epsilon + COLOR_MATCH_SLACK)
}

fn color_matches(item: &Item, slot: &Slot, epsilon: f32) -> bool {
    colors_match(
        item.color.unwrap_or(Color::CLEAR),
        slot.expected.color.unwrap_or(Color::CLEAR),
        epsilon,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use match_drop_types::{Expectation, Position};

    fn slot(expected: Expectation) -> Slot {
        Slot::new(0, Position::ZERO, expected)
    }

    #[test]
    fn test_identity_match() {
        let s = slot(Expectation::identity("cow"));
        assert!(MatchRule::Identity.is_match(&Item::new("cow"), &s));
        assert!(!MatchRule::Identity.is_match(&Item::new("dog"), &s));
    }

    #[test]
    fn test_identity_without_expectation_never_matches() {
        let s = slot(Expectation::color(Color::RED));
        assert!(!MatchRule::Identity.is_match(&Item::new("cow"), &s));
    }

    #[test]
    fn test_color_match_is_reflexive() {
        for c in match_drop_types::DEFAULT_PALETTE {
            let s = slot(Expectation::color(c));
            assert!(MatchRule::color().is_match(&Item::new("x").with_color(c), &s));
        }
    }

    #[test]
    fn test_color_tolerance_boundary() {
        let s = slot(Expectation::color(Color::rgb(0.5, 0.5, 0.5)));
        let rule = MatchRule::color();

        let at_eps = Item::new("x").with_color(Color::rgb(0.51, 0.5, 0.5));
        assert!(rule.is_match(&at_eps, &s));

        let past_eps = Item::new("x").with_color(Color::rgb(0.5, 0.5, 0.489));
        assert!(!rule.is_match(&past_eps, &s));

        let alpha_off = Item::new("x").with_color(Color::rgba(0.5, 0.5, 0.5, 0.989));
        assert!(!rule.is_match(&alpha_off, &s));
    }

    #[test]
    fn test_missing_colors_fall_back_to_clear() {
        let s = slot(Expectation::default());
        assert!(MatchRule::color().is_match(&Item::new("x"), &s));
        assert!(!MatchRule::color().is_match(&Item::new("x").with_color(Color::RED), &s));
    }

    #[test]
    fn test_compound_needs_type_and_color() {
        let expected = Expectation {
            identity: None,
            color: Some(Color::BLUE),
            type_tag: Some("circle".to_string()),
        };
        let s = slot(expected);
        let rule = MatchRule::compound();

        let right = Item::new("a").with_type("circle").with_color(Color::BLUE);
        let wrong_type = Item::new("b").with_type("square").with_color(Color::BLUE);
        let wrong_color = Item::new("c").with_type("circle").with_color(Color::RED);

        assert!(rule.is_match(&right, &s));
        assert!(!rule.is_match(&wrong_type, &s));
        assert!(!rule.is_match(&wrong_color, &s));
    }

    #[test]
    fn test_rule_serde() {
        let rule: MatchRule = serde_json::from_str(r#"{"rule":"compound"}"#).unwrap();
        assert_eq!(rule, MatchRule::compound());

        let rule: MatchRule = serde_json::from_str(r#"{"rule":"color","epsilon":0.05}"#).unwrap();
        assert_eq!(rule, MatchRule::Color { epsilon: 0.05 });
    }
}
