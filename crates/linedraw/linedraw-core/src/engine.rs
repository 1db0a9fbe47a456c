//! Per-subject engine wiring trigger decisions to one of the two backends.
//!
//! Methods:
//! - new, animate (trigger decision + run start), on_frame (frame-loop step),
//!   update_options, observables/outputs accessors

use log::debug;

use crate::config::{Backend, HostCapabilities, LineDrawOptions, Setup};
use crate::driver::{FrameScheduler, OffsetMap, TweenDriver, TweenParams};
use crate::error::LineDrawError;
use crate::ids::{ClassKey, RunIdentity};
use crate::measure::{measure, RenderTarget};
use crate::outputs::{DrawEvent, Observables, Outputs};
use crate::timeline::TimelineDescription;
use crate::timing::{plan, Schedule};
use crate::trigger::{Decision, Trigger, TriggerController, TriggerValue};

/// Line drawing engine for one animated subject.
pub struct LineDrawer<T: RenderTarget, F: FrameScheduler> {
    setup: Setup,
    host: HostCapabilities,
    target: T,
    scheduler: F,
    controller: TriggerController,
    driver: TweenDriver<T::Shape>,
    class_key: ClassKey,
    schedule: Option<Schedule>,
    timeline: Option<TimelineDescription>,
    observables: Observables,
    outputs: Outputs,
}

impl<T, F> LineDrawer<T, F>
where
    T: RenderTarget,
    F: FrameScheduler,
{
    /// Validate `options` and build an idle engine. Configuration errors are
    /// reported here, before any frame runs.
    pub fn new(
        options: &LineDrawOptions,
        host: HostCapabilities,
        target: T,
        scheduler: F,
    ) -> Result<Self, LineDrawError> {
        let setup = Setup::from_options(options)?;
        let observables = Observables {
            class_identifier: setup.class_name.clone(),
            ..Observables::default()
        };
        Ok(Self {
            setup,
            host,
            target,
            scheduler,
            controller: TriggerController::new(),
            driver: TweenDriver::new(),
            class_key: ClassKey::default(),
            schedule: None,
            timeline: None,
            observables,
            outputs: Outputs::default(),
        })
    }

    /// Replace the options. Takes effect with the next started run.
    pub fn update_options(&mut self, options: &LineDrawOptions) -> Result<(), LineDrawError> {
        self.setup = Setup::from_options(options)?;
        Ok(())
    }

    pub fn backend(&self) -> Backend {
        self.setup.backend(self.host)
    }

    /// Handle one animate request (typically once per host re-render).
    pub fn animate(&mut self, value: &TriggerValue) -> Decision {
        self.outputs.clear();
        let in_flight = match self.backend() {
            Backend::FrameLoop => self.driver.is_running(),
            Backend::Declarative => self.timeline.is_some(),
        };
        let previous = self.controller.active().cloned();
        let decision = self.controller.decide(value, in_flight);
        match &decision {
            Decision::Start(trigger) => {
                if in_flight {
                    if let Some(prev) = previous {
                        self.report_preempted(prev, trigger);
                    }
                }
                self.start_run(trigger);
            }
            Decision::Continue => self.sync_progress(),
            Decision::Idle => {
                if self.controller.active().is_none() {
                    self.go_static();
                }
            }
        }
        decision
    }

    /// Frame opportunity from the host. Returns `true` while a run is active.
    pub fn on_frame(&mut self) -> bool {
        self.outputs.clear();
        let running = self
            .driver
            .on_frame(&mut self.target, &mut self.scheduler, &mut self.outputs);
        self.sync_progress();
        running
    }

    fn report_preempted(&mut self, previous: RunIdentity, trigger: &Trigger) {
        let Some(next) = trigger.identity().cloned() else {
            return;
        };
        let err = LineDrawError::RunPreempted {
            previous: previous.to_string(),
            next: next.to_string(),
        };
        debug!("{err}");
        self.outputs
            .push_event(DrawEvent::RunPreempted { previous, next });
    }

    fn start_run(&mut self, trigger: &Trigger) {
        let Some(identity) = trigger.identity().cloned() else {
            return;
        };
        self.class_key = ClassKey::mint(&self.setup.class_name);
        self.observables = Observables {
            class_identifier: format!("{} {}", self.setup.class_name, self.class_key),
            ..Observables::default()
        };

        if trigger.is_hide() {
            self.driver.stop(&mut self.target, &mut self.scheduler);
            let timeline = TimelineDescription::hidden(self.class_key.clone());
            self.observables.style_text = timeline.to_css();
            self.timeline = Some(timeline);
            self.schedule = None;
            self.outputs.push_event(DrawEvent::RunStarted {
                identity,
                class_key: self.class_key.clone(),
                shape_count: 0,
            });
            return;
        }

        let (shapes, data) = measure(&self.target);
        let schedule = plan(
            &data,
            self.setup.duration,
            self.setup.stagger,
            &self.setup.playback,
            trigger.start_delay_ms(),
        );
        self.outputs.push_event(DrawEvent::RunStarted {
            identity: identity.clone(),
            class_key: self.class_key.clone(),
            shape_count: schedule.len(),
        });

        match self.backend() {
            Backend::Declarative => {
                let timeline = TimelineDescription::build(
                    self.class_key.clone(),
                    &schedule,
                    self.setup.easing,
                    &self.setup.playback,
                    self.setup.fade,
                );
                self.observables.style_text = timeline.to_css();
                self.timeline = Some(timeline);
            }
            Backend::FrameLoop => {
                self.timeline = None;
                let params = TweenParams {
                    easing: self.setup.easing,
                    playback: self.setup.playback.clone(),
                    fade: self.setup.fade,
                };
                self.driver.start(
                    identity,
                    shapes,
                    schedule.clone(),
                    params,
                    &mut self.target,
                    &mut self.scheduler,
                );
            }
        }
        self.schedule = Some(schedule);
    }

    fn go_static(&mut self) {
        if self.driver.is_running() || self.timeline.is_some() {
            debug!("animate cleared; rendering static");
        }
        self.driver.stop(&mut self.target, &mut self.scheduler);
        self.timeline = None;
        self.schedule = None;
        self.class_key = ClassKey::default();
        self.observables = Observables {
            class_identifier: self.setup.class_name.clone(),
            ..Observables::default()
        };
    }

    fn sync_progress(&mut self) {
        if self.backend() == Backend::FrameLoop {
            let state = self.driver.state();
            self.observables.elapsed_ms = state.elapsed_ms;
            self.observables.progress_pct = state.progress_pct;
        }
    }

    pub fn observables(&self) -> &Observables {
        &self.observables
    }

    /// Events produced by the most recent `animate` or `on_frame` call.
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    pub fn is_running(&self) -> bool {
        self.driver.is_running()
    }

    pub fn class_key(&self) -> &ClassKey {
        &self.class_key
    }

    /// Schedule of the current run, immutable for its lifetime.
    pub fn schedule(&self) -> Option<&Schedule> {
        self.schedule.as_ref()
    }

    pub fn timeline(&self) -> Option<&TimelineDescription> {
        self.timeline.as_ref()
    }

    pub fn offsets(&self) -> Option<&OffsetMap> {
        self.driver.offsets()
    }

    pub fn setup(&self) -> &Setup {
        &self.setup
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }
}
