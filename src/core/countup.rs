use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior, interval};

/// A count-up animation: interpolate linearly from `start` to `end` over
/// `duration` of real elapsed time.
#[derive(Debug, Clone, Copy)]
pub struct CountUpSpec {
    pub start: f64,
    pub end: f64,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Animating,
    Completed,
}

/// The animation state machine. Driven by sampling with the wall-clock
/// time elapsed since the animation began, so progress depends on real
/// time rather than on how many frames have fired. Completed is terminal:
/// further samples keep returning `end` exactly.
#[derive(Debug)]
pub struct CountUp {
    spec: CountUpSpec,
    phase: Phase,
}

impl CountUp {
    pub fn new(spec: CountUpSpec) -> Self {
        Self {
            spec,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub fn sample(&mut self, elapsed: Duration) -> f64 {
        if self.phase == Phase::Completed {
            return self.spec.end;
        }

        // A zero-duration animation completes on its first sample.
        let progress = if self.spec.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / self.spec.duration.as_secs_f64()).min(1.0)
        };

        if progress >= 1.0 {
            self.phase = Phase::Completed;
            self.spec.end
        } else {
            self.phase = Phase::Animating;
            self.spec.start + progress * (self.spec.end - self.spec.start)
        }
    }
}

/// Fixed-decimal rendering with optional thousands separator, prefix and
/// suffix. The separator groups only the integer digits; the sign and the
/// fractional part are left untouched.
#[derive(Debug, Clone, Default)]
pub struct NumberFormat {
    pub decimals: usize,
    pub prefix: String,
    pub suffix: String,
    pub separator: Option<char>,
}

pub fn format_number(value: f64, format: &NumberFormat) -> String {
    let fixed = format!("{value:.prec$}", prec = format.decimals);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let grouped = match format.separator {
        Some(sep) => group_thousands(int_part, sep),
        None => int_part.to_string(),
    };

    let mut out = String::with_capacity(
        format.prefix.len() + grouped.len() + fixed.len() + format.suffix.len(),
    );
    out.push_str(&format.prefix);
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out.push_str(&format.suffix);
    out
}

fn group_thousands(int_part: &str, sep: char) -> String {
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(sep);
        }
        grouped.push(c);
    }
    format!("{sign}{grouped}")
}

/// Owns a running count-up animation. Dropping the handle aborts the
/// driving task, so no frame callback can fire against a consumer that
/// has been torn down.
#[derive(Debug)]
pub struct CountUpHandle {
    task: Option<tokio::task::JoinHandle<()>>,
}

impl CountUpHandle {
    /// Waits for the animation to reach its end value.
    pub async fn finished(mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    pub fn cancel(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for CountUpHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Drives a [`CountUp`] once per frame tick, invoking `on_frame` with the
/// current value. The tick only schedules the wake-ups; progress is always
/// computed from the wall clock, so a stalled or slow frame rate does not
/// stretch the animation. The task exits after delivering the final value,
/// so `on_frame` is never called again once the end is reached.
pub fn spawn_count_up<F>(spec: CountUpSpec, frame: Duration, mut on_frame: F) -> CountUpHandle
where
    F: FnMut(f64) + Send + 'static,
{
    let task = tokio::spawn(async move {
        let started = Instant::now();
        let mut animation = CountUp::new(spec);
        let mut ticker = interval(frame);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let value = animation.sample(started.elapsed());
            on_frame(value);
            if animation.is_finished() {
                break;
            }
        }
    });

    CountUpHandle { task: Some(task) }
}
