//! Options recognized by the engine and their validated form.

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::LineDrawError;
use crate::playback::PlaybackSpec;
use crate::trigger::TriggerValue;

/// User-facing options. Every field is optional in serialized form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineDrawOptions {
    /// Class applied to the wrapper; also the prefix of generated class keys.
    pub class_name: String,
    pub animate: TriggerValue,
    /// Total animation duration in milliseconds.
    pub duration: f64,
    /// Delay between shape start times, as a percentage (0-100).
    pub stagger: f64,
    pub timing: String,
    pub playback: String,
    pub fade: bool,
    /// Force the frame-loop backend even if the host can run CSS animations.
    pub js_only: bool,
}

impl Default for LineDrawOptions {
    fn default() -> Self {
        Self {
            class_name: "linedraw".to_string(),
            animate: TriggerValue::default(),
            duration: 1000.0,
            stagger: 0.0,
            timing: "ease".to_string(),
            playback: "forwards".to_string(),
            fade: false,
            js_only: false,
        }
    }
}

impl LineDrawOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(s: &str) -> Result<Self, LineDrawError> {
        Ok(serde_json::from_str(s)?)
    }

    #[inline]
    pub fn with_animate(mut self, animate: impl Into<TriggerValue>) -> Self {
        self.animate = animate.into();
        self
    }

    #[inline]
    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration = duration_ms;
        self
    }

    #[inline]
    pub fn with_stagger(mut self, stagger_pct: f64) -> Self {
        self.stagger = stagger_pct;
        self
    }

    #[inline]
    pub fn with_timing(mut self, timing: impl Into<String>) -> Self {
        self.timing = timing.into();
        self
    }

    #[inline]
    pub fn with_playback(mut self, playback: impl Into<String>) -> Self {
        self.playback = playback.into();
        self
    }

    #[inline]
    pub fn with_fade(mut self) -> Self {
        self.fade = true;
        self
    }

    #[inline]
    pub fn with_js_only(mut self) -> Self {
        self.js_only = true;
        self
    }

    #[inline]
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }
}

/// What the host can do natively.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct HostCapabilities {
    pub css_animations: bool,
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self {
            css_animations: true,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Backend {
    Declarative,
    FrameLoop,
}

/// Validated, resolved options. Built once at setup; configuration errors
/// surface here and never later.
#[derive(Clone, Debug, PartialEq)]
pub struct Setup {
    pub class_name: String,
    pub duration: f64,
    pub stagger: f64,
    pub easing: Easing,
    pub playback: PlaybackSpec,
    pub fade: bool,
    pub js_only: bool,
}

impl Setup {
    pub fn from_options(opts: &LineDrawOptions) -> Result<Self, LineDrawError> {
        if opts.class_name.is_empty() || opts.class_name.chars().any(char::is_whitespace) {
            return Err(LineDrawError::invalid_option(
                "className",
                "must be a single non-empty class token",
            ));
        }
        if !opts.duration.is_finite() || opts.duration <= 0.0 {
            return Err(LineDrawError::invalid_option(
                "duration",
                format!("must be a positive number of milliseconds, got {}", opts.duration),
            ));
        }
        if !opts.stagger.is_finite() {
            return Err(LineDrawError::invalid_option("stagger", "must be finite"));
        }
        Ok(Self {
            class_name: opts.class_name.clone(),
            duration: opts.duration,
            stagger: opts.stagger.clamp(0.0, 100.0),
            easing: opts.timing.parse()?,
            playback: PlaybackSpec::parse(&opts.playback)?,
            fade: opts.fade,
            js_only: opts.js_only,
        })
    }

    pub fn backend(&self, host: HostCapabilities) -> Backend {
        if self.js_only || !host.css_animations {
            Backend::FrameLoop
        } else {
            Backend::Declarative
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::Repeat;

    #[test]
    fn defaults_match_documented_values() {
        let opts = LineDrawOptions::from_json("{}").unwrap();
        assert_eq!(opts, LineDrawOptions::default());
        let setup = Setup::from_options(&opts).unwrap();
        assert_eq!(setup.duration, 1000.0);
        assert_eq!(setup.stagger, 0.0);
        assert_eq!(setup.easing, Easing::Ease);
        assert_eq!(setup.playback, PlaybackSpec::default());
        assert_eq!(setup.backend(HostCapabilities::default()), Backend::Declarative);
    }

    #[test]
    fn camel_case_fields_parse() {
        let opts = LineDrawOptions::from_json(
            r#"{"animate": 200, "stagger": 40, "timing": "linear", "playback": "3 reverse", "jsOnly": true, "className": "sig"}"#,
        )
        .unwrap();
        assert_eq!(opts.animate, TriggerValue::Number(200.0));
        let setup = Setup::from_options(&opts).unwrap();
        assert_eq!(setup.playback.repeat, Repeat::Times(2));
        assert!(setup.playback.reversed);
        assert_eq!(setup.backend(HostCapabilities::default()), Backend::FrameLoop);
    }

    #[test]
    fn unknown_easing_fails_fast() {
        let opts = LineDrawOptions::new().with_timing("wobble");
        assert!(matches!(
            Setup::from_options(&opts),
            Err(LineDrawError::UnknownEasing { .. })
        ));
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        for opts in [
            LineDrawOptions::new().with_duration(0.0),
            LineDrawOptions::new().with_duration(f64::INFINITY),
            LineDrawOptions::new().with_stagger(f64::NAN),
            LineDrawOptions::new().with_class_name("two words"),
        ] {
            assert!(matches!(
                Setup::from_options(&opts),
                Err(LineDrawError::InvalidOption { .. })
            ));
        }
    }

    #[test]
    fn hosts_without_css_use_the_frame_loop() {
        let setup = Setup::from_options(&LineDrawOptions::new().with_stagger(150.0)).unwrap();
        assert_eq!(setup.stagger, 100.0);
        assert_eq!(
            setup.backend(HostCapabilities {
                css_animations: false
            }),
            Backend::FrameLoop
        );
    }
}
