use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use otpd_common::paths;
use otpd_crypto::totp::DEFAULT_SKEW_STEPS;
use otpd_seed::SeedConfig;

/// Default HTTP API port.
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Largest skew tolerance accepted on the command line.
const MAX_SKEW_STEPS: i64 = 10;

#[derive(Parser, Debug)]
#[command(name = "otpd", version, about = "TOTP codes from an RSA-encrypted seed")]
pub struct Cli {
    /// HTTP API port
    #[arg(long, env = "OTPD_PORT", default_value_t = DEFAULT_HTTP_PORT)]
    pub port: u16,

    /// Address to bind the HTTP API to
    #[arg(long, env = "OTPD_BIND", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Directory holding seed.txt (default: /data if present, else ./data_test)
    #[arg(long, env = "OTPD_DATA_DIR", value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// PEM private key used to decrypt seeds
    #[arg(
        long,
        env = "OTPD_PRIVATE_KEY",
        value_name = "PATH",
        default_value = paths::DEFAULT_PRIVATE_KEY,
        global = true
    )]
    pub private_key: PathBuf,

    /// Time steps accepted on each side of the current one when verifying
    #[arg(
        long,
        env = "OTPD_TOTP_SKEW",
        default_value_t = DEFAULT_SKEW_STEPS,
        value_parser = clap::value_parser!(u8).range(0..=MAX_SKEW_STEPS),
        global = true
    )]
    pub skew: u8,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "OTPD_LOG", default_value = "info", global = true)]
    pub log_level: String,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs to file (in addition to stderr)
    #[arg(long, env = "OTPD_LOG_FILE", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Output JSON instead of human-readable text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP daemon (default)
    Serve,
    /// Print the current code for the stored seed
    Code,
    /// Check a code against the stored seed (exit status 1 when invalid)
    Verify {
        /// Candidate code
        code: String,
    },
    /// Decrypt an encrypted seed and store it
    Decrypt {
        /// File holding the base64 ciphertext, or "-" for stdin
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

impl Cli {
    /// Log filter directive after applying `-v` flags.
    pub fn log_directive(&self) -> &str {
        match self.verbose {
            0 => self.log_level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Resolved configuration used at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub listen: SocketAddr,
    pub data_dir: PathBuf,
    pub private_key: PathBuf,
    pub skew: u8,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        let data_dir = cli.data_dir.clone().unwrap_or_else(paths::detect_data_dir);
        Self {
            listen: SocketAddr::new(cli.bind, cli.port),
            data_dir,
            private_key: cli.private_key.clone(),
            skew: cli.skew,
        }
    }

    pub fn seed_config(&self) -> SeedConfig {
        SeedConfig {
            data_dir: self.data_dir.clone(),
            private_key: self.private_key.clone(),
            skew: self.skew,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("otpd").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_resolve_to_serve_on_8080() {
        let cli = parse(&["--data-dir", "/tmp/otpd"]);
        assert_eq!(cli.command, None);
        let config = Config::from_cli(&cli);
        assert_eq!(config.listen, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.data_dir, PathBuf::from("/tmp/otpd"));
        assert_eq!(config.private_key, PathBuf::from("student_private.pem"));
        assert_eq!(config.skew, 1);
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = parse(&["verify", "123456", "--skew", "0", "--json"]);
        assert_eq!(
            cli.command,
            Some(Command::Verify {
                code: "123456".to_string()
            })
        );
        assert_eq!(cli.skew, 0);
        assert!(cli.json);
    }

    #[test]
    fn skew_out_of_range_is_rejected() {
        let result = Cli::try_parse_from(["otpd", "--skew", "11"]);
        assert!(result.is_err());
    }

    #[test]
    fn verbosity_overrides_log_level() {
        assert_eq!(parse(&["--log-level", "warn"]).log_directive(), "warn");
        assert_eq!(parse(&["-v"]).log_directive(), "debug");
        assert_eq!(parse(&["-vv"]).log_directive(), "trace");
    }

    #[test]
    fn seed_config_carries_paths_and_skew() {
        let cli = parse(&[
            "--data-dir",
            "/srv/otp",
            "--private-key",
            "/keys/k.pem",
            "--skew",
            "2",
        ]);
        let seed = Config::from_cli(&cli).seed_config();
        assert_eq!(seed.data_dir, PathBuf::from("/srv/otp"));
        assert_eq!(seed.private_key, PathBuf::from("/keys/k.pem"));
        assert_eq!(seed.skew, 2);
    }
}
