use motionrun_core::LoggingConfig;
use tracing_subscriber::{EnvFilter, fmt};

pub fn init_logging(config: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    #[cfg(target_arch = "wasm32")]
    {
        // No stdout or wall clock in the browser; route lines through miniquad's console logger.
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(MiniquadWriter::default)
            .with_ansi(false)
            .without_time()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        if config.json {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .json()
                .finish();
            tracing::subscriber::set_global_default(subscriber).ok();
        } else {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .with_target(true)
                .with_line_number(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber).ok();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[derive(Default)]
struct MiniquadWriter {
    buffer: Vec<u8>,
}

#[cfg(target_arch = "wasm32")]
impl std::io::Write for MiniquadWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for MiniquadWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buffer);
        let line = line.trim_end();
        if !line.is_empty() {
            macroquad::miniquad::info!("{}", line);
        }
    }
}
