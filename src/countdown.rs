use tracing::debug;

use crate::config::CountdownConfig;
use crate::services::TimerHandle;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CountdownState {
    Counting { remaining: i64 },
    Revealed,
}

/// What a tick asks the view to do.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickEffect {
    Show(i64),
    ShowAndReveal(i64),
    Idle,
}

impl CountdownState {
    pub fn start(config: CountdownConfig) -> Self {
        CountdownState::Counting {
            remaining: config.duration_secs,
        }
    }

    /// One second elapses: the current value is displayed, then decremented;
    /// dropping below zero reveals in the same tick.
    pub fn tick(self) -> (Self, TickEffect) {
        match self {
            CountdownState::Counting { remaining } => {
                match remaining.checked_sub(1).filter(|next| *next >= 0) {
                    Some(next) => (CountdownState::Counting { remaining: next }, TickEffect::Show(remaining)),
                    None => (CountdownState::Revealed, TickEffect::ShowAndReveal(remaining)),
                }
            }
            CountdownState::Revealed => (CountdownState::Revealed, TickEffect::Idle),
        }
    }

    pub fn is_revealed(self) -> bool {
        self == CountdownState::Revealed
    }
}

pub struct CountdownController<T: TimerHandle> {
    state: CountdownState,
    timer: Option<T>,
}

impl<T: TimerHandle> CountdownController<T> {
    pub fn new(config: CountdownConfig) -> Self {
        Self {
            state: CountdownState::start(config),
            timer: None,
        }
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn has_timer(&self) -> bool {
        self.timer.is_some()
    }

    pub fn attach_timer(&mut self, timer: T) {
        if self.state.is_revealed() {
            timer.cancel();
            return;
        }
        if let Some(previous) = self.timer.replace(timer) {
            previous.cancel();
        }
    }

    pub fn tick(&mut self) -> TickEffect {
        let (next, effect) = self.state.tick();
        self.state = next;
        if let TickEffect::ShowAndReveal(_) = effect {
            debug!("countdown finished, revealing link");
            self.teardown();
        }
        effect
    }

    /// Cancels the timer; safe to call more than once.
    pub fn teardown(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

impl<T: TimerHandle> Drop for CountdownController<T> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct FakeTimer {
        cancels: Rc<Cell<usize>>,
    }

    impl TimerHandle for FakeTimer {
        fn cancel(self) {
            self.cancels.set(self.cancels.get() + 1);
        }
    }

    fn controller(duration_secs: i64) -> (CountdownController<FakeTimer>, FakeTimer) {
        let timer = FakeTimer::default();
        let mut controller = CountdownController::new(CountdownConfig { duration_secs });
        controller.attach_timer(timer.clone());
        (controller, timer)
    }

    #[test]
    fn three_second_countdown_shows_three_to_zero() {
        let (mut controller, timer) = controller(3);
        let effects: Vec<TickEffect> = (0..4).map(|_| controller.tick()).collect();
        assert_eq!(
            effects,
            vec![
                TickEffect::Show(3),
                TickEffect::Show(2),
                TickEffect::Show(1),
                TickEffect::ShowAndReveal(0),
            ]
        );
        assert!(controller.state().is_revealed());
        assert!(!controller.has_timer());
        assert_eq!(timer.cancels.get(), 1);
    }

    #[test]
    fn ticks_after_reveal_change_nothing() {
        let (mut controller, timer) = controller(0);
        assert_eq!(controller.tick(), TickEffect::ShowAndReveal(0));
        assert_eq!(controller.tick(), TickEffect::Idle);
        assert_eq!(controller.tick(), TickEffect::Idle);
        assert_eq!(controller.state(), CountdownState::Revealed);
        assert_eq!(timer.cancels.get(), 1);
    }

    #[test]
    fn remaining_decreases_monotonically() {
        let mut state = CountdownState::start(CountdownConfig { duration_secs: 2 });
        let mut seen = Vec::new();
        while let CountdownState::Counting { remaining } = state {
            seen.push(remaining);
            state = state.tick().0;
        }
        assert_eq!(seen, vec![2, 1, 0]);
    }

    #[test]
    fn minimum_duration_reveals_without_overflow() {
        let (mut controller, timer) = controller(i64::MIN);
        assert_eq!(controller.tick(), TickEffect::ShowAndReveal(i64::MIN));
        assert!(controller.state().is_revealed());
        assert_eq!(timer.cancels.get(), 1);
    }

    #[test]
    fn teardown_cancels_once() {
        let (mut controller, timer) = controller(10);
        controller.tick();
        controller.teardown();
        controller.teardown();
        drop(controller);
        assert_eq!(timer.cancels.get(), 1);
    }

    #[test]
    fn replacing_a_timer_cancels_the_old_one() {
        let (mut controller, first) = controller(5);
        let second = FakeTimer::default();
        controller.attach_timer(second.clone());
        assert_eq!(first.cancels.get(), 1);
        drop(controller);
        assert_eq!(second.cancels.get(), 1);
    }
}
