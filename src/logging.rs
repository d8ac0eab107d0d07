use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Returns `false` when one was already set.
pub fn init_tracing(default_filter: &str) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);

    #[cfg(target_arch = "wasm32")]
    let result = builder
        .with_writer(console::ConsoleMakeWriter)
        .with_ansi(false)
        .without_time()
        .try_init();

    #[cfg(not(target_arch = "wasm32"))]
    let result = builder.with_writer(std::io::stderr).try_init();

    result.is_ok()
}

#[cfg(target_arch = "wasm32")]
mod console {
    use std::io;
    use tracing::{Level, Metadata};
    use tracing_subscriber::fmt::MakeWriter;
    use wasm_bindgen::JsValue;

    /// Routes each formatted event to the matching `console` method.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct ConsoleMakeWriter;

    pub struct ConsoleLine {
        level: Level,
        buffer: Vec<u8>,
    }

    impl io::Write for ConsoleLine {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Drop for ConsoleLine {
        fn drop(&mut self) {
            let text = String::from_utf8_lossy(&self.buffer);
            let text = text.trim_end();
            if text.is_empty() {
                return;
            }
            let value = JsValue::from_str(text);
            if self.level == Level::ERROR {
                web_sys::console::error_1(&value);
            } else if self.level == Level::WARN {
                web_sys::console::warn_1(&value);
            } else if self.level == Level::INFO {
                web_sys::console::info_1(&value);
            } else {
                web_sys::console::debug_1(&value);
            }
        }
    }

    impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
        type Writer = ConsoleLine;

        fn make_writer(&'a self) -> Self::Writer {
            ConsoleLine {
                level: Level::INFO,
                buffer: Vec::new(),
            }
        }

        fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
            ConsoleLine {
                level: *meta.level(),
                buffer: Vec::new(),
            }
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn second_init_reports_existing_subscriber() {
        init_tracing("debug");
        assert!(!init_tracing("debug"));
    }
}
