use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Handle;
use crate::config::General;
use crate::errors::GfsRainInitError;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l:<5} {t} - {m}{n}";

/// Sets up the global logger given the general configuration.
///
/// Logging goes to stderr when so configured and to a log file if a path is given. The
/// report itself is printed to stdout, so console logging stays out of its way.
///
/// # Arguments
///
/// * 'general' - general configuration holding log path, level and console flag
pub fn setup_logger(general: &General) -> Result<Handle, GfsRainInitError> {
    let config = logger_config(general)?;

    Ok(log4rs::init_config(config)?)
}

/// Builds the log4rs configuration
///
/// # Arguments
///
/// * 'general' - general configuration holding log path, level and console flag
fn logger_config(general: &General) -> Result<Config, GfsRainInitError> {
    let mut builder = Config::builder();
    let mut root = Root::builder();

    if general.log_to_console {
        let console = ConsoleAppender::builder()
            .target(Target::Stderr)
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build();
        builder = builder.appender(Appender::builder().build("console", Box::new(console)));
        root = root.appender("console");
    }

    if let Some(path) = &general.log_path {
        let file = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build(path)?;
        builder = builder.appender(Appender::builder().build("file", Box::new(file)));
        root = root.appender("file");
    }

    // Nothing to append to means nothing to log
    let level = if general.log_to_console || general.log_path.is_some() {
        general.log_level
    } else {
        LevelFilter::Off
    };

    Ok(builder.build(root.build(level))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_only_config() {
        let general = General { log_path: None, log_level: LevelFilter::Debug, log_to_console: true };
        let config = logger_config(&general).unwrap();
        assert_eq!(config.appenders().len(), 1);
        assert_eq!(config.root().level(), LevelFilter::Debug);
    }

    #[test]
    fn test_file_and_console_config() {
        let path = std::env::temp_dir().join("gfsrain_logging_test.log");
        let general = General {
            log_path: Some(path.to_string_lossy().to_string()),
            log_level: LevelFilter::Warn,
            log_to_console: true,
        };
        let config = logger_config(&general).unwrap();
        assert_eq!(config.appenders().len(), 2);
        assert_eq!(config.root().appenders(), &["console".to_string(), "file".to_string()]);
    }

    #[test]
    fn test_no_appender_turns_logging_off() {
        let general = General { log_path: None, log_level: LevelFilter::Info, log_to_console: false };
        let config = logger_config(&general).unwrap();
        assert_eq!(config.root().level(), LevelFilter::Off);
    }
}
