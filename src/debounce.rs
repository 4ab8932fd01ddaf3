/// Debounce state machine, independent of any timer implementation.
///
/// The caller feeds in the current time and owns the actual timer: `call`
/// says whether to run the task now and whether a timer must be armed,
/// `wake` is invoked when that timer fires. At most one timer is armed at
/// any moment; a call inside the quiet window only pushes the deadline out,
/// and the armed timer re-arms itself for the remainder when it wakes early.

use std::mem;

/// What the caller must do after `Debounce::call`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub invoke_now: bool,
    pub arm_in_ms: Option<u32>,
}

/// Outcome of a timer wake-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// The window was extended; arm the timer again for this many ms
    Wait(u32),
    /// Window closed with a trailing call owed
    Fire,
    /// Window closed with nothing owed
    Idle,
}

#[derive(Debug, Clone)]
pub struct Debounce {
    quiet_ms: u32,
    leading: bool,
    deadline: Option<f64>,
    trailing_owed: bool,
    timer_armed: bool,
}

impl Debounce {
    pub fn new(quiet_ms: u32, leading: bool) -> Debounce {
        Debounce {
            quiet_ms,
            leading,
            deadline: None,
            trailing_owed: false,
            timer_armed: false,
        }
    }

    /// Fires once, `quiet_ms` after the last call of a burst
    pub fn trailing(quiet_ms: u32) -> Debounce {
        Debounce::new(quiet_ms, false)
    }

    /// Fires on the first call of a burst, then once more after the burst
    /// if further calls arrived inside the window
    pub fn leading(quiet_ms: u32) -> Debounce {
        Debounce::new(quiet_ms, true)
    }

    pub fn is_idle(&self) -> bool {
        self.deadline.is_none()
    }

    pub fn call(&mut self, now: f64) -> Decision {
        let was_idle = self.is_idle();
        self.deadline = Some(now + f64::from(self.quiet_ms));

        let invoke_now = was_idle && self.leading;
        if !invoke_now {
            self.trailing_owed = true;
        }

        let arm_in_ms = if self.timer_armed {
            None
        } else {
            self.timer_armed = true;
            Some(self.quiet_ms)
        };

        Decision {
            invoke_now,
            arm_in_ms,
        }
    }

    pub fn wake(&mut self, now: f64) -> Wake {
        match self.deadline {
            Some(deadline) if now < deadline => Wake::Wait((deadline - now).ceil() as u32),
            _ => {
                self.deadline = None;
                self.timer_armed = false;
                if mem::take(&mut self.trailing_owed) {
                    Wake::Fire
                } else {
                    Wake::Idle
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drives a debouncer against a simulated clock and counts invocations
    struct Sim {
        debounce: Debounce,
        timer_at: Option<f64>,
        fired_at: Vec<f64>,
    }

    impl Sim {
        fn new(debounce: Debounce) -> Sim {
            Sim {
                debounce,
                timer_at: None,
                fired_at: Vec::new(),
            }
        }

        /// Run timers due by `at`, then call at `at`
        fn call_at(&mut self, at: f64) {
            self.advance_to(at);
            let decision = self.debounce.call(at);
            if decision.invoke_now {
                self.fired_at.push(at);
            }
            if let Some(ms) = decision.arm_in_ms {
                assert!(self.timer_at.is_none(), "second timer armed");
                self.timer_at = Some(at + f64::from(ms));
            }
        }

        fn advance_to(&mut self, until: f64) {
            while let Some(at) = self.timer_at.filter(|at| *at <= until) {
                self.timer_at = None;
                match self.debounce.wake(at) {
                    Wake::Wait(ms) => self.timer_at = Some(at + f64::from(ms)),
                    Wake::Fire => self.fired_at.push(at),
                    Wake::Idle => {}
                }
            }
        }
    }

    #[test]
    fn test_trailing_burst_fires_once() {
        let mut sim = Sim::new(Debounce::trailing(250));
        for t in [0.0, 50.0, 100.0, 150.0, 200.0] {
            sim.call_at(t);
        }
        sim.advance_to(10_000.0);

        assert_eq!(sim.fired_at, vec![450.0]);
        assert!(sim.debounce.is_idle());
    }

    #[test]
    fn test_trailing_single_call() {
        let mut sim = Sim::new(Debounce::trailing(250));
        sim.call_at(0.0);
        sim.advance_to(249.0);
        assert!(sim.fired_at.is_empty());

        sim.advance_to(250.0);
        assert_eq!(sim.fired_at, vec![250.0]);
    }

    #[test]
    fn test_trailing_separate_bursts() {
        let mut sim = Sim::new(Debounce::trailing(250));
        sim.call_at(0.0);
        sim.call_at(1000.0);
        sim.advance_to(10_000.0);

        assert_eq!(sim.fired_at, vec![250.0, 1250.0]);
    }

    #[test]
    fn test_leading_single_call_fires_immediately_only() {
        let mut sim = Sim::new(Debounce::leading(1000));
        sim.call_at(0.0);
        sim.advance_to(10_000.0);

        assert_eq!(sim.fired_at, vec![0.0]);
    }

    #[test]
    fn test_leading_burst_fires_first_and_once_after() {
        let mut sim = Sim::new(Debounce::leading(1000));
        for t in [0.0, 100.0, 300.0, 900.0] {
            sim.call_at(t);
        }
        sim.advance_to(10_000.0);

        assert_eq!(sim.fired_at, vec![0.0, 1900.0]);
    }

    #[test]
    fn test_leading_again_after_window_closes() {
        let mut sim = Sim::new(Debounce::leading(1000));
        sim.call_at(0.0);
        sim.call_at(5000.0);
        sim.advance_to(10_000.0);

        assert_eq!(sim.fired_at, vec![0.0, 5000.0]);
    }

    #[test]
    fn test_early_wake_rearms_for_remainder() {
        let mut debounce = Debounce::trailing(250);
        debounce.call(0.0);
        debounce.call(100.0);

        assert_eq!(debounce.wake(250.0), Wake::Wait(100));
        assert_eq!(debounce.wake(350.0), Wake::Fire);
        assert_eq!(debounce.wake(400.0), Wake::Idle);
    }
}
