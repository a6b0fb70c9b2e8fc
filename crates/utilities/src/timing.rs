use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use std::time::Instant;

use log::info;
use log::warn;

/// Collects the durations of named phases of a tool, such as parsing the
/// description and running the rewrite loop.
#[derive(Default)]
pub struct Timing {
    results: Rc<RefCell<Vec<(String, Duration)>>>,
}

/// Measures the time between its creation and the call to [`Timer::finish`].
/// A timer that is dropped without being finished is not registered.
pub struct Timer {
    name: String,
    start: Instant,
    results: Rc<RefCell<Vec<(String, Duration)>>>,
    registered: bool,
}

impl Timing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new timer with the given name.
    pub fn start(&mut self, name: &str) -> Timer {
        Timer {
            name: name.to_string(),
            start: Instant::now(),
            results: self.results.clone(),
            registered: false,
        }
    }

    /// Runs `f` under a timer with the given name. The timer is finished
    /// before the result is returned, also when `f` returns an error.
    pub fn measure<T>(&mut self, name: &str, f: impl FnOnce() -> T) -> T {
        let mut timer = self.start(name);
        let result = f();
        timer.finish();
        result
    }

    /// Returns the finished timers in the order they were finished.
    pub fn results(&self) -> Vec<(String, Duration)> {
        self.results.borrow().clone()
    }

    /// Prints all the finished timers to stderr.
    pub fn print(&self) {
        for (name, time) in self.results.borrow().iter() {
            eprintln!("Time {name}: {:.3}s", time.as_secs_f64());
        }
    }
}

impl Timer {
    /// Stops the timer and registers the elapsed time.
    pub fn finish(&mut self) {
        let time = self.start.elapsed();
        info!("Time {}: {:.3}s", self.name, time.as_secs_f64());

        self.results.borrow_mut().push((self.name.clone(), time));
        self.registered = true
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if !self.registered {
            warn!("Timer {} was dropped before 'finish()'", self.name);
        }
    }
}
