use crate::config::CounterConfig;

/// Animated count from zero to a target, one step per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CountUp {
    current: f64,
    target: f64,
    increment: f64,
    done: bool,
}

impl CountUp {
    pub fn new(config: CounterConfig) -> Self {
        let frames = f64::from(config.duration_ms) / f64::from(config.frame_ms.max(1));
        let target = config.target as f64;
        Self {
            current: 0.0,
            target,
            increment: if frames > 0.0 { target / frames } else { target },
            done: false,
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Advances one frame and returns the text to display.
    pub fn step(&mut self) -> String {
        if !self.done {
            self.current += self.increment;
            if self.current >= self.target {
                self.current = self.target;
                self.done = true;
            }
        }
        format_grouped(self.current.floor() as i64)
    }
}

/// Integer with `,` thousands separators.
pub fn format_grouped(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Inverse of [`format_grouped`]: digits with separators removed, parsed as
/// a leading integer.
pub fn parse_grouped(text: &str) -> Option<i64> {
    let cleaned: String = text.chars().filter(|ch| *ch != ',').collect();
    crate::services::leading_integer(&cleaned)
}
