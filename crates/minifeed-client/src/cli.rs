use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use dotenv::dotenv;
use env_logger::TimestampPrecision;
use minifeed_client::config::{ClientConfig, DEFAULT_API_URL};
use minifeed_core::prepare::{DEFAULT_MAX_WIDTH, DEFAULT_QUALITY};

#[derive(Debug, Clone, Parser)]
#[command(name = "minifeed", version, about = "Post photos to Mini Feed")]
pub struct Config {
    /// Backend base URL
    #[arg(long, env = "MINIFEED_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
    /// Where the login session is kept
    #[arg(long, env = "MINIFEED_SESSION", default_value = "./minifeed-session.json")]
    session: PathBuf,
    /// Request timeout in seconds [default: none]
    #[arg(long)]
    timeout: Option<u64>,
    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create an account
    Register {
        #[arg(short, long)]
        mobile: String,
        #[arg(short, long)]
        name: String,
    },
    /// Log in with a one-time password
    Login {
        #[arg(short, long)]
        mobile: String,
        #[arg(short, long)]
        otp: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged in user
    Whoami,
    /// List your posts
    Feed {
        /// Everyone's posts instead of your own
        #[arg(long)]
        all: bool,
    },
    /// Publish a photo with a description
    Post {
        #[arg(short, long)]
        description: String,
        #[arg(short, long)]
        image: PathBuf,
    },
    /// Compress an image locally and report the result
    Compress {
        path: PathBuf,
        #[arg(long, default_value_t = DEFAULT_MAX_WIDTH)]
        max_width: u32,
        /// Quality factor in (0, 1]
        #[arg(long, default_value_t = DEFAULT_QUALITY)]
        quality: f32,
        /// Write the JPEG here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Config {
    /// Parse arguments (after loading `.env`) and install the logger.
    pub fn parse() -> Self {
        dotenv().ok();
        let config = <Self as Parser>::parse();

        let quiet = config
            .verbose
            .log_level()
            .map_or(true, |level| level <= log::Level::Info);
        let _ = env_logger::Builder::new()
            .format_timestamp(if quiet {
                None
            } else {
                Some(TimestampPrecision::Millis)
            })
            .format_target(!quiet)
            .filter_level(config.verbose.log_level_filter())
            .try_init();

        config
    }

    pub fn client(&self) -> ClientConfig {
        let config = ClientConfig::new(self.api_url.as_str());
        match self.timeout {
            Some(seconds) => config.with_timeout(Duration::from_secs(seconds)),
            None => config,
        }
    }

    pub fn session(&self) -> &PathBuf {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["minifeed", "whoami"]).unwrap();
        assert!(matches!(config.command, Command::Whoami));
        assert_eq!(config.client().timeout, None);
    }

    #[test]
    fn test_post_arguments() {
        let config = Config::try_parse_from([
            "minifeed",
            "--api-url",
            "http://localhost:3000/",
            "--timeout",
            "30",
            "post",
            "-d",
            "sunset",
            "-i",
            "beach.jpg",
        ])
        .unwrap();

        let client = config.client();
        assert_eq!(client.base_url, "http://localhost:3000");
        assert_eq!(client.timeout, Some(Duration::from_secs(30)));
        match config.command {
            Command::Post { description, image } => {
                assert_eq!(description, "sunset");
                assert_eq!(image, PathBuf::from("beach.jpg"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_compress_defaults() {
        let config = Config::try_parse_from(["minifeed", "compress", "photo.png"]).unwrap();
        match config.command {
            Command::Compress {
                max_width,
                quality,
                output,
                ..
            } => {
                assert_eq!(max_width, 1200);
                assert_eq!(quality, 0.8);
                assert_eq!(output, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_compress_options() {
        let config = Config::try_parse_from([
            "minifeed",
            "compress",
            "photo.png",
            "--quality",
            "0.5",
            "--max-width",
            "640",
            "-o",
            "small.jpg",
        ])
        .unwrap();
        match config.command {
            Command::Compress {
                path,
                max_width,
                quality,
                output,
            } => {
                assert_eq!(path, PathBuf::from("photo.png"));
                assert_eq!(max_width, 640);
                assert_eq!(quality, 0.5);
                assert_eq!(output, Some(PathBuf::from("small.jpg")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_quiet_flag_stays_global() {
        let config = Config::try_parse_from(["minifeed", "compress", "photo.png", "-q"]).unwrap();
        assert!(matches!(config.command, Command::Compress { .. }));
        assert!(config.verbose.log_level() < Some(log::Level::Info));
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }
}
