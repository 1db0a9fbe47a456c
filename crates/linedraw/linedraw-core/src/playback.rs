//! Playback grammar: `"2 alternate-reverse both"` style descriptors.
//!
//! Tokens are whitespace separated and order-insensitive. Unknown tokens are
//! ignored so that newer fill-mode-like flags pass through untouched.

use serde::{Deserialize, Serialize};

use crate::error::LineDrawError;

/// Additional cycles after the first playthrough.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Repeat {
    /// `Times(0)` is a single playthrough.
    Times(u32),
    Infinite,
}

impl Repeat {
    /// True if cycle index `cycle` (0-based) is still part of the run.
    #[inline]
    pub fn covers(&self, cycle: u64) -> bool {
        match self {
            Self::Times(n) => cycle <= u64::from(*n),
            Self::Infinite => true,
        }
    }

    /// Total playthroughs, `None` when unbounded.
    pub fn total_cycles(&self) -> Option<u64> {
        match self {
            Self::Times(n) => Some(u64::from(*n) + 1),
            Self::Infinite => None,
        }
    }
}

impl Default for Repeat {
    fn default() -> Self {
        Self::Times(0)
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    Normal,
    Reverse,
    Alternate,
    AlternateReverse,
}

impl Direction {
    fn from_token(tok: &str) -> Option<Self> {
        match tok {
            "normal" => Some(Self::Normal),
            "reverse" => Some(Self::Reverse),
            "alternate" => Some(Self::Alternate),
            "alternate-reverse" => Some(Self::AlternateReverse),
            _ => None,
        }
    }

    pub fn css_name(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Reverse => "reverse",
            Self::Alternate => "alternate",
            Self::AlternateReverse => "alternate-reverse",
        }
    }
}

const FILL_TOKENS: [&str; 4] = ["none", "forwards", "backwards", "both"];

/// Resolved playback directives.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSpec {
    pub repeat: Repeat,
    pub direction: Direction,
    /// Passed through to the declarative backend as-is.
    pub fill_mode: String,
    /// Swap from/to for every cycle (`reverse` without yoyo).
    pub reversed: bool,
    /// Flip draw direction on every repeat (`alternate-reverse` + `both`).
    pub yoyo: bool,
    /// Tokens the parser does not interpret, in descriptor order. The
    /// declarative backend appends them to the shorthand unchanged.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<String>,
}

impl Default for PlaybackSpec {
    fn default() -> Self {
        Self {
            repeat: Repeat::default(),
            direction: Direction::default(),
            fill_mode: "forwards".to_string(),
            reversed: false,
            yoyo: false,
            extra: Vec::new(),
        }
    }
}

impl PlaybackSpec {
    /// Parse a playback descriptor.
    ///
    /// Only a descriptor carrying more than one iteration-count token is
    /// rejected; everything else resolves to a `PlaybackSpec`.
    pub fn parse(descriptor: &str) -> Result<Self, LineDrawError> {
        let mut spec = PlaybackSpec::default();
        let mut count_token: Option<&str> = None;
        let mut has_reverse = false;
        let mut has_alt_reverse = false;
        let mut has_both = false;

        for tok in descriptor.split_whitespace() {
            let repeat = if tok == "infinite" {
                Some(Repeat::Infinite)
            } else {
                tok.parse::<u32>()
                    .ok()
                    .map(|n| Repeat::Times(n.saturating_sub(1)))
            };
            if let Some(repeat) = repeat {
                if let Some(prev) = count_token {
                    return Err(LineDrawError::InvalidPlayback {
                        descriptor: descriptor.to_string(),
                        reason: format!("conflicting iteration counts '{prev}' and '{tok}'"),
                    });
                }
                count_token = Some(tok);
                spec.repeat = repeat;
                continue;
            }
            if let Some(direction) = Direction::from_token(tok) {
                has_reverse |= direction == Direction::Reverse;
                has_alt_reverse |= direction == Direction::AlternateReverse;
                spec.direction = direction;
                continue;
            }
            if FILL_TOKENS.contains(&tok) {
                has_both |= tok == "both";
                spec.fill_mode = tok.to_string();
                continue;
            }
            spec.extra.push(tok.to_string());
        }

        spec.yoyo = has_alt_reverse && has_both;
        spec.reversed = has_reverse && !spec.yoyo;
        Ok(spec)
    }

    /// Endpoints for cycle `cycle` given the forward pair `(from, to)`.
    ///
    /// Cycle 0 of a yoyo run always draws forward.
    #[inline]
    pub fn endpoints_for_cycle(&self, cycle: u64, from: f64, to: f64) -> (f64, f64) {
        if self.yoyo && cycle % 2 == 1 {
            (to, from)
        } else {
            (from, to)
        }
    }

    /// `{count} {direction} {fill} {extra..}` for a CSS animation shorthand.
    ///
    /// A yoyo run is written as `alternate` so that cycle 0 draws forward,
    /// the same as [`endpoints_for_cycle`](Self::endpoints_for_cycle) on the
    /// frame loop. The keyframes already run from the undrawn offset to the
    /// drawn one; `alternate-reverse` would start the first cycle un-drawing.
    pub fn css_shorthand(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(3 + self.extra.len());
        match self.repeat {
            Repeat::Times(0) => {}
            Repeat::Times(n) => parts.push((u64::from(n) + 1).to_string()),
            Repeat::Infinite => parts.push("infinite".to_string()),
        }
        if self.yoyo {
            parts.push(Direction::Alternate.css_name().to_string());
        } else if self.direction != Direction::Normal {
            parts.push(self.direction.css_name().to_string());
        }
        parts.push(self.fill_mode.clone());
        parts.extend(self.extra.iter().cloned());
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_single_forward_playthrough() {
        let spec = PlaybackSpec::parse("").unwrap();
        assert_eq!(spec, PlaybackSpec::default());
        assert_eq!(spec.repeat, Repeat::Times(0));
        assert_eq!(spec.fill_mode, "forwards");
        assert_eq!(spec.css_shorthand(), "forwards");
    }

    #[test]
    fn zero_count_is_one_playthrough() {
        assert_eq!(PlaybackSpec::parse("0").unwrap().repeat, Repeat::Times(0));
        assert_eq!(PlaybackSpec::parse("1").unwrap().repeat, Repeat::Times(0));
        assert_eq!(PlaybackSpec::parse("3").unwrap().repeat, Repeat::Times(2));
    }

    #[test]
    fn alternate_reverse_with_both_enables_yoyo() {
        let spec = PlaybackSpec::parse("both 2 alternate-reverse").unwrap();
        assert_eq!(spec.repeat, Repeat::Times(1));
        assert!(spec.yoyo);
        assert!(!spec.reversed);
        assert_eq!(spec.endpoints_for_cycle(0, 10.0, 0.0), (10.0, 0.0));
        assert_eq!(spec.endpoints_for_cycle(1, 10.0, 0.0), (0.0, 10.0));
        assert_eq!(spec.css_shorthand(), "2 alternate both");
    }

    #[test]
    fn alternate_reverse_without_both_does_not_oscillate() {
        let spec = PlaybackSpec::parse("alternate-reverse forwards").unwrap();
        assert!(!spec.yoyo);
        assert!(!spec.reversed);
    }

    #[test]
    fn yoyo_overrides_plain_reverse() {
        let spec = PlaybackSpec::parse("reverse alternate-reverse both").unwrap();
        assert!(spec.yoyo);
        assert!(!spec.reversed);

        let spec = PlaybackSpec::parse("reverse").unwrap();
        assert!(spec.reversed);
        assert_eq!(spec.endpoints_for_cycle(1, 10.0, 0.0), (10.0, 0.0));
    }

    #[test]
    fn unknown_tokens_pass_through_to_css() {
        let spec = PlaybackSpec::parse("infinite paused running -2 1.5").unwrap();
        assert_eq!(spec.repeat, Repeat::Infinite);
        assert_eq!(spec.direction, Direction::Normal);
        assert_eq!(spec.extra, vec!["paused", "running", "-2", "1.5"]);
        assert_eq!(spec.css_shorthand(), "infinite forwards paused running -2 1.5");
    }

    #[test]
    fn alternate_reverse_without_yoyo_is_kept_in_css() {
        let spec = PlaybackSpec::parse("3 alternate-reverse forwards").unwrap();
        assert_eq!(spec.css_shorthand(), "3 alternate-reverse forwards");
    }

    #[test]
    fn conflicting_counts_are_rejected() {
        assert!(matches!(
            PlaybackSpec::parse("2 infinite"),
            Err(LineDrawError::InvalidPlayback { .. })
        ));
    }

    #[test]
    fn repeat_coverage() {
        assert!(Repeat::Times(1).covers(1));
        assert!(!Repeat::Times(1).covers(2));
        assert!(Repeat::Infinite.covers(1_000));
        assert_eq!(Repeat::Times(1).total_cycles(), Some(2));
    }
}
