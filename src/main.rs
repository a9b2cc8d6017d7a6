use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::anyhow;
use clap::{Args as ClapArgs, Parser, Subcommand};
use env_logger::Env;
use log::info;

use reality_link::crypto::XrayDeriver;
use reality_link::generator::qr::{self, TerminalStyle};
use reality_link::parser::{load_document, parse_document};
use reality_link::relay::{relay_artifacts, ConfigFetcher, ScpFetcher, TelegramNotifier};
use reality_link::{generate_share, Settings, ShareArtifacts, ShareRequest};

/// Generate VLESS Reality share links and QR codes from an Xray server config
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a settings TOML file
    #[arg(long, value_name = "FILE", global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(ClapArgs, Debug)]
struct LinkArgs {
    /// Public server host/IP used in the share link
    #[arg(long)]
    server: String,

    /// Link name used in the URL fragment (#NAME) [default: reality-443]
    #[arg(long)]
    name: Option<String>,

    /// Fingerprint (fp=) [default: chrome]
    #[arg(long)]
    fp: Option<String>,

    /// Use this inbound instead of the first matching one
    #[arg(long, value_name = "N")]
    inbound_index: Option<usize>,

    /// Print the generated vless:// link to stdout
    #[arg(long)]
    print_link: bool,
}

impl LinkArgs {
    fn request(&self, settings: &Settings) -> ShareRequest {
        ShareRequest {
            server: self.server.clone(),
            name: self.name.clone().unwrap_or_else(|| settings.name.clone()),
            fingerprint: self.fp.clone().unwrap_or_else(|| settings.fingerprint.clone()),
            inbound_index: self.inbound_index,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the link and QR code from a local server config JSON
    Qr {
        /// Path to the Xray server config.json
        #[arg(value_name = "CONFIG")]
        server_config: PathBuf,

        #[command(flatten)]
        link: LinkArgs,

        /// Output PNG filename [default: vless.png]
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Print the QR code to the terminal
        #[arg(long)]
        print_qr: bool,

        /// Only print the link, do not write the PNG
        #[arg(long)]
        dry_run: bool,
    },

    /// Download the server config over SSH, generate the link and QR code,
    /// and optionally send both to Telegram
    Generate {
        #[command(flatten)]
        link: LinkArgs,

        /// SSH private key content (OpenSSH format)
        #[arg(long, value_name = "KEY")]
        ssh_private_key: String,

        /// Remote path to the Xray config.json [default: /etc/xray/config.json]
        #[arg(long, value_name = "PATH")]
        remote_config_path: Option<String>,

        /// Output directory [default: generated]
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// QR PNG filename inside the output directory [default: vless.png]
        #[arg(long, value_name = "FILE")]
        out_png: Option<String>,

        /// Telegram bot token
        #[arg(long, value_name = "TOKEN")]
        telegram_bot_token: Option<String>,

        /// Telegram chat id or @channel
        #[arg(long, value_name = "CHAT")]
        telegram_chat_id: Option<String>,
    },
}

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", diagnostic(&e));
            ExitCode::from(2)
        }
    }
}

/// Every error message already carries its cause, so only the top level is
/// printed.
fn diagnostic(err: &anyhow::Error) -> String {
    format!("ERROR: {}", err)
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut settings = Settings::load(args.settings.as_deref())?;

    match args.command {
        Command::Qr {
            server_config,
            link,
            out,
            print_qr,
            dry_run,
        } => {
            let document = load_document(&server_config)?;
            let artifacts = share(&document, &link, &settings)?;

            if dry_run {
                println!("{}", artifacts.link);
                return Ok(());
            }

            let out = out.unwrap_or_else(|| PathBuf::from(&settings.out));
            qr::write_png(&artifacts.link, &out)?;
            if link.print_link {
                println!("{}", artifacts.link);
            }
            if print_qr {
                print_terminal_qr(&artifacts.link)?;
            }
            Ok(())
        }
        Command::Generate {
            link,
            ssh_private_key,
            remote_config_path,
            out_dir,
            out_png,
            telegram_bot_token,
            telegram_chat_id,
        } => {
            if let Some(token) = telegram_bot_token {
                settings.telegram_bot_token = token;
            }
            if let Some(chat_id) = telegram_chat_id {
                settings.telegram_chat_id = chat_id;
            }

            let out_dir = out_dir.unwrap_or_else(|| PathBuf::from(&settings.out_dir));
            std::fs::create_dir_all(&out_dir)
                .map_err(|e| anyhow!("Failed to create {}: {}", out_dir.display(), e))?;
            let qr_path = out_dir.join(out_png.as_deref().unwrap_or(&settings.out_png));
            let local_config = out_dir.join("server-config.json");

            let fetcher = ScpFetcher::new(ssh_private_key)
                .remote_path(remote_config_path.unwrap_or_else(|| settings.remote_config_path.clone()))
                .user(settings.ssh_user.clone());
            let content = fetcher.fetch(&link.server, &local_config)?;
            let document = parse_document(&content, &local_config.display().to_string())?;
            let artifacts = share(&document, &link, &settings)?;

            qr::write_png(&artifacts.link, &qr_path)?;
            if link.print_link {
                println!("{}", artifacts.link);
            }

            if settings.telegram_enabled() {
                let notifier = TelegramNotifier::new(
                    settings.telegram_bot_token.clone(),
                    settings.telegram_chat_id.clone(),
                )?
                .with_api_base(settings.telegram_api_base.clone());
                relay_artifacts(&notifier, &artifacts.link, &qr_path)?;
            } else {
                info!("Telegram token or chat id not set, skipping delivery");
            }
            Ok(())
        }
    }
}

fn share(
    document: &serde_json::Value,
    link: &LinkArgs,
    settings: &Settings,
) -> reality_link::Result<ShareArtifacts> {
    let deriver = XrayDeriver::new(settings.xray_bin.clone());
    generate_share(document, &link.request(settings), &deriver)
}

fn print_terminal_qr(link: &str) -> anyhow::Result<()> {
    let style = TerminalStyle::detect();
    if style == TerminalStyle::Ascii {
        info!("Colour output unavailable, printing ASCII QR code");
    }
    for line in qr::to_terminal(link, style)? {
        println!("{}", line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reality_link::crypto::{parse_public_key, DerivationError};
    use reality_link::Error;

    #[test]
    fn test_diagnostic_prints_each_cause_once() {
        let err = load_document(std::path::Path::new("/nonexistent/reality-link/cfg.json"))
            .unwrap_err();
        let msg = diagnostic(&anyhow::Error::from(Error::from(err)));
        assert!(msg.starts_with("ERROR: Failed to read config /nonexistent/reality-link/cfg.json: "));
        assert_eq!(msg.matches("os error 2").count(), 1, "{}", msg);
        assert_eq!(msg.lines().count(), 1);
    }

    #[test]
    fn test_diagnostic_for_malformed_public_key() {
        let err = parse_public_key("Password: short").unwrap_err();
        assert!(matches!(err, DerivationError::Malformed(_)));
        let msg = diagnostic(&anyhow::Error::from(Error::from(err)));
        assert_eq!(msg.matches("Invalid publicKey").count(), 1, "{}", msg);
    }

    #[test]
    fn test_cli_parses_qr_subcommand() {
        let args = Args::try_parse_from([
            "reality-link",
            "qr",
            "config.json",
            "--server",
            "1.2.3.4",
            "--inbound-index",
            "1",
        ])
        .unwrap();
        match args.command {
            Command::Qr { link, .. } => {
                assert_eq!(link.server, "1.2.3.4");
                assert_eq!(link.inbound_index, Some(1));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_negative_index() {
        assert!(Args::try_parse_from([
            "reality-link",
            "qr",
            "config.json",
            "--server",
            "1.2.3.4",
            "--inbound-index",
            "-1",
        ])
        .is_err());
    }
}
