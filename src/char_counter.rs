use crate::config::CharCounterConfig;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CounterStyle {
    Normal,
    Warning,
}

impl CounterStyle {
    pub fn class_name(self) -> &'static str {
        match self {
            CounterStyle::Normal => "text-muted",
            CounterStyle::Warning => "text-danger",
        }
    }

    pub fn other(self) -> Self {
        match self {
            CounterStyle::Normal => CounterStyle::Warning,
            CounterStyle::Warning => CounterStyle::Normal,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CounterView {
    pub text: String,
    pub style: CounterStyle,
}

/// Length is counted in UTF-16 code units, the unit `maxlength` uses.
pub fn counter_view(value: &str, config: &CharCounterConfig) -> CounterView {
    let length = value.encode_utf16().count();
    let threshold = config.max_length as f64 * config.warning_ratio;
    let style = if length as f64 > threshold {
        CounterStyle::Warning
    } else {
        CounterStyle::Normal
    };
    CounterView {
        text: format!("{length}/{}", config.max_length),
        style,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max_length: usize) -> CharCounterConfig {
        CharCounterConfig {
            max_length,
            warning_ratio: 0.9,
        }
    }

    #[test]
    fn warns_above_ninety_percent() {
        let view = counter_view("0123456789", &config(10));
        assert_eq!(view.text, "10/10");
        assert_eq!(view.style, CounterStyle::Warning);

        let view = counter_view("012345678", &config(10));
        assert_eq!(view.text, "9/10");
        assert_eq!(view.style, CounterStyle::Normal);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let view = counter_view("héllo", &config(160));
        assert_eq!(view.text, "5/160");
        assert_eq!(view.style.class_name(), "text-muted");
    }

    #[test]
    fn astral_characters_count_twice() {
        let view = counter_view("😀😀😀😀😀", &config(10));
        assert_eq!(view.text, "10/10");
        assert_eq!(view.style, CounterStyle::Warning);
    }

    #[test]
    fn empty_textarea_starts_at_zero() {
        assert_eq!(counter_view("", &config(300)).text, "0/300");
    }
}
