//! Declarative timeline builder (CSS backend).
//!
//! Turns a [`Schedule`] into keyframe sequences plus one style rule per shape,
//! all scoped under the run's class key. The host injects the rendered text
//! and the browser runs the animation.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::ids::ClassKey;
use crate::playback::PlaybackSpec;
use crate::timing::{Schedule, ShapeTiming};

/// Opacity used for "hidden but still laid out".
pub const FADE_START_OPACITY: f64 = 0.01;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyframeState {
    pub dash_offset: f64,
    pub opacity: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyframeSequence {
    pub name: String,
    /// 0%: hidden.
    pub start: KeyframeState,
    /// 100%: fully drawn.
    pub end: KeyframeState,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleRule {
    pub selector: String,
    pub declarations: Vec<(String, String)>,
}

impl StyleRule {
    pub fn declaration(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineDescription {
    pub class_key: ClassKey,
    pub keyframes: Vec<KeyframeSequence>,
    pub rules: Vec<StyleRule>,
}

impl TimelineDescription {
    /// Short-circuit for the `hide` trigger: the whole subject goes transparent.
    pub fn hidden(class_key: ClassKey) -> Self {
        let rule = StyleRule {
            selector: format!(".{class_key}"),
            declarations: vec![("opacity".into(), "0".into())],
        };
        Self {
            class_key,
            keyframes: Vec::new(),
            rules: vec![rule],
        }
    }

    /// Build per-shape keyframes and rules for `schedule`.
    pub fn build(
        class_key: ClassKey,
        schedule: &Schedule,
        easing: Easing,
        playback: &PlaybackSpec,
        fade: bool,
    ) -> Self {
        let shorthand = playback.css_shorthand();
        let mut keyframes = Vec::with_capacity(schedule.len());
        let mut rules = Vec::with_capacity(schedule.len());
        for timing in &schedule.shapes {
            let (seq, rule) = shape_timeline(&class_key, timing, easing, &shorthand, fade);
            keyframes.push(seq);
            rules.push(rule);
        }
        Self {
            class_key,
            keyframes,
            rules,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.keyframes.is_empty()
            && self.rules.len() == 1
            && self.rules[0].selector == format!(".{}", self.class_key)
    }

    /// Render as style sheet text.
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        for kf in &self.keyframes {
            let _ = writeln!(css, "@keyframes {} {{", kf.name);
            let _ = writeln!(css, "  0% {{ {} }}", keyframe_body(&kf.start));
            let _ = writeln!(css, "  100% {{ {} }}", keyframe_body(&kf.end));
            css.push_str("}\n");
        }
        for rule in &self.rules {
            let _ = writeln!(css, "{} {{", rule.selector);
            for (prop, value) in &rule.declarations {
                let _ = writeln!(css, "  {prop}: {value};");
            }
            css.push_str("}\n");
        }
        css
    }
}

fn keyframe_body(state: &KeyframeState) -> String {
    format!(
        "stroke-dashoffset: {}px; opacity: {};",
        state.dash_offset, state.opacity
    )
}

fn shape_timeline(
    class_key: &ClassKey,
    timing: &ShapeTiming,
    easing: Easing,
    shorthand: &str,
    fade: bool,
) -> (KeyframeSequence, StyleRule) {
    let nth = timing.index + 1;
    let name = format!("{class_key}-{nth}");
    // Skipped and empty shapes stay at offset 0 so they never flicker.
    let length = if timing.is_static() { 0.0 } else { timing.length };

    let seq = KeyframeSequence {
        name: name.clone(),
        start: KeyframeState {
            dash_offset: length,
            opacity: if fade { FADE_START_OPACITY } else { 1.0 },
        },
        end: KeyframeState {
            dash_offset: 0.0,
            opacity: 1.0,
        },
    };

    let animation = format!(
        "{name} {}s {} {shorthand}",
        seconds(timing.draw_duration),
        easing.css_name()
    );
    let delay = format!("{}s", seconds(timing.visible_delay()));
    let rule = StyleRule {
        selector: format!(".{class_key} path:nth-of-type({nth})"),
        declarations: vec![
            ("opacity".into(), FADE_START_OPACITY.to_string()),
            ("stroke-dasharray".into(), format!("{length}px")),
            ("stroke-dashoffset".into(), format!("{length}px")),
            ("-webkit-animation".into(), animation.clone()),
            ("animation".into(), animation),
            ("-webkit-animation-delay".into(), delay.clone()),
            ("animation-delay".into(), delay),
        ],
    };
    (seq, rule)
}

/// Milliseconds to seconds, truncated to whole milliseconds.
fn seconds(ms: f64) -> f64 {
    if !ms.is_finite() || ms <= 0.0 {
        return 0.0;
    }
    ms.trunc() / 1000.0
}
