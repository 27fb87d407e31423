//! Character formats and composable formatters
//!
//! A `CharFormat` is a sparse set of text attributes: every field is
//! optional and `None` means "leave whatever is underneath". A `Formatter`
//! wraps one and composes with `|`; the right-hand side wins on any field
//! both sides set.

use eframe::egui::Color32;
use std::ops::BitOr;

// ─────────────────────────────────────────────────────────────────────────────
// Attributes
// ─────────────────────────────────────────────────────────────────────────────

/// Font weight of a highlighted range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weight {
    Normal,
    Bold,
    /// Heavier than bold, used for Textile headings
    Black,
}

/// Underline style of a highlighted range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Underline {
    None,
    Single,
    /// Wavy misspelling marker
    SpellCheck,
}

/// Sparse character format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CharFormat {
    pub foreground: Option<Color32>,
    pub weight: Option<Weight>,
    pub italic: Option<bool>,
    pub underline: Option<Underline>,
    pub underline_color: Option<Color32>,
}

impl CharFormat {
    /// True when no attribute is set.
    #[allow(dead_code)]
    pub fn is_neutral(&self) -> bool {
        *self == CharFormat::default()
    }

    /// Overlay `other` on top of `self`: fields set in `other` replace ours.
    pub fn merge(&mut self, other: &CharFormat) {
        if other.foreground.is_some() {
            self.foreground = other.foreground;
        }
        if other.weight.is_some() {
            self.weight = other.weight;
        }
        if other.italic.is_some() {
            self.italic = other.italic;
        }
        if other.underline.is_some() {
            self.underline = other.underline;
        }
        if other.underline_color.is_some() {
            self.underline_color = other.underline_color;
        }
    }

    #[allow(dead_code)]
    pub fn is_bold(&self) -> bool {
        matches!(self.weight, Some(Weight::Bold) | Some(Weight::Black))
    }

    pub fn is_italic(&self) -> bool {
        self.italic == Some(true)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Formatter
// ─────────────────────────────────────────────────────────────────────────────

/// A composable formatting directive.
///
/// `(a | b) | c == a | (b | c)`, and on fields only one side sets the
/// operands commute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Formatter(CharFormat);

impl Formatter {
    /// Apply this formatter's fields to `target`.
    pub fn format(&self, target: &mut CharFormat) {
        target.merge(&self.0);
    }

    /// The format this formatter produces on a blank range.
    pub fn char_format(&self) -> CharFormat {
        self.0
    }

    pub const fn weight(weight: Weight) -> Self {
        Formatter(CharFormat {
            foreground: None,
            weight: Some(weight),
            italic: None,
            underline: None,
            underline_color: None,
        })
    }

    pub const fn underline(style: Underline, color: Option<Color32>) -> Self {
        Formatter(CharFormat {
            foreground: None,
            weight: None,
            italic: None,
            underline: Some(style),
            underline_color: color,
        })
    }
}

impl BitOr for Formatter {
    type Output = Formatter;

    fn bitor(self, rhs: Formatter) -> Formatter {
        let mut combined = self.0;
        combined.merge(&rhs.0);
        Formatter(combined)
    }
}

impl BitOr<Weight> for Formatter {
    type Output = Formatter;

    fn bitor(self, rhs: Weight) -> Formatter {
        self | Formatter::weight(rhs)
    }
}

/// No formatting at all.
pub const NF: Formatter = Formatter(CharFormat {
    foreground: None,
    weight: None,
    italic: None,
    underline: None,
    underline_color: None,
});

pub const ITAL: Formatter = Formatter(CharFormat {
    foreground: None,
    weight: None,
    italic: Some(true),
    underline: None,
    underline_color: None,
});

pub const UNDL: Formatter = Formatter::underline(Underline::Single, None);

/// Foreground color.
pub fn fg(color: Color32) -> Formatter {
    Formatter(CharFormat {
        foreground: Some(color),
        ..CharFormat::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nf_is_neutral() {
        assert!(NF.char_format().is_neutral());
        assert!(!ITAL.char_format().is_neutral());
    }

    #[test]
    fn test_composition_applies_both_effects() {
        let f = ITAL | Weight::Bold;
        let fmt = f.char_format();
        assert!(fmt.is_italic());
        assert!(fmt.is_bold());
        assert_eq!(fmt.foreground, None);
    }

    #[test]
    fn test_composition_last_write_wins() {
        let red = fg(Color32::RED);
        let blue = fg(Color32::BLUE);
        assert_eq!((red | blue).char_format().foreground, Some(Color32::BLUE));
        assert_eq!((blue | red).char_format().foreground, Some(Color32::RED));
    }

    #[test]
    fn test_composition_order_independent_on_disjoint_fields() {
        let a = fg(Color32::GREEN);
        let b = ITAL | UNDL;
        assert_eq!(a | b, b | a);
    }

    #[test]
    fn test_composition_associative() {
        let a = fg(Color32::RED);
        let b = Formatter::weight(Weight::Black);
        let c = fg(Color32::BLUE) | ITAL;
        assert_eq!((a | b) | c, a | (b | c));
    }

    #[test]
    fn test_format_merges_into_existing() {
        let mut existing = Formatter::underline(Underline::SpellCheck, Some(Color32::RED)).char_format();
        (NF | Weight::Bold).format(&mut existing);
        assert!(existing.is_bold());
        assert_eq!(existing.underline, Some(Underline::SpellCheck));
    }
}
