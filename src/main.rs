use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use vkAlbum2disk::backup::{BackupRequest, run_backup};
use vkAlbum2disk::config::Config;
use vkAlbum2disk::disk::DiskClient;
use vkAlbum2disk::vk::VkClient;

/// Environment variable consulted for the Yandex Disk token
const DISK_TOKEN_ENV: &str = "DISK_TOKEN";

#[derive(Parser)]
#[command(author, version, about = "Back up a VK photo album to Yandex Disk")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize with a default settings file
    Init {
        /// Force overwrite existing settings
        #[arg(short, long)]
        force: bool,

        /// Path to settings file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Copy an album's photos into a Yandex Disk folder
    Backup {
        /// Path to settings file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// VK id of the album owner
        #[arg(short, long)]
        user_id: Option<String>,

        /// Album id ('profile' for profile photos)
        #[arg(short, long)]
        album: Option<String>,

        /// Yandex Disk OAuth token (falls back to $DISK_TOKEN)
        #[arg(short = 't', long)]
        disk_token: Option<String>,

        /// Destination folder on Yandex Disk
        #[arg(short, long)]
        folder: Option<String>,

        /// Where to write the JSON manifest
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Progress lines go to stdout; stderr carries only the final error
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .target(env_logger::Target::Stdout)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { force, config } => init_config(&config, force),
        Commands::Backup {
            config,
            user_id,
            album,
            disk_token,
            folder,
            output,
        } => {
            let config_data = load_config(&config)?;

            let user_id = match user_id {
                Some(id) => id,
                None => prompt_required("Enter vk user id: ")?,
            };
            let album_id = match album {
                Some(album) => album,
                None => prompt_or_default(
                    &format!(
                        "Enter album id ('{}' by default): ",
                        config_data.output.default_album
                    ),
                    &config_data.output.default_album,
                )?,
            };

            let source = VkClient::new(config_data.vk.access_token.clone(), user_id)
                .with_base_url(config_data.vk.base_url.clone())
                .with_api_version(config_data.vk.api_version.clone())
                .with_photo_count(config_data.vk.photo_count);

            let disk_token = match disk_token.or_else(|| std::env::var(DISK_TOKEN_ENV).ok()) {
                Some(token) => token,
                None => prompt_required("Enter disk access token: ")?,
            };
            let folder_name = match folder {
                Some(folder) => folder,
                None => prompt_or_default(
                    &format!(
                        "Enter directory name (default: {}): ",
                        config_data.output.default_folder
                    ),
                    &config_data.output.default_folder,
                )?,
            };
            let manifest_path =
                output.unwrap_or_else(|| PathBuf::from(&config_data.output.manifest_path));

            let sink = DiskClient::with_auth_scheme(&disk_token, &config_data.disk.auth_scheme)
                .with_base_url(config_data.disk.base_url.clone());

            let request = BackupRequest {
                album_id: &album_id,
                folder_name: &folder_name,
                manifest_path: &manifest_path,
            };
            let manifest = run_backup(&source, &sink, &request).await?;

            println!(
                "Done! {} photos saved to {}, manifest written to {}",
                manifest.count,
                manifest.folder_name,
                manifest_path.display()
            );
            Ok(())
        }
    }
}

fn init_config(config_path_opt: &Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = Config::get_config_path(config_path_opt);

    if config_path.exists() && !force {
        println!("Config file already exists at {}", config_path.display());
        println!("Use --force to overwrite");
        return Ok(());
    }

    let config = Config::default();
    config
        .save_to_file(&config_path)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!("Created config file at {}", config_path.display());
    Ok(())
}

fn load_config(config_path_opt: &Option<PathBuf>) -> Result<Config> {
    let config_path = Config::get_config_path(config_path_opt);

    if !config_path.exists() {
        anyhow::bail!(
            "Config file not found at {}. Run 'vkAlbum2disk init' to create one.",
            config_path.display()
        );
    }

    Config::load_from_file(&config_path)
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim().to_string())
}

fn prompt_required(message: &str) -> Result<String> {
    let answer = prompt(message)?;
    if answer.is_empty() {
        anyhow::bail!("No value entered for '{}'", message.trim_end_matches([':', ' ']));
    }
    Ok(answer)
}

fn prompt_or_default(message: &str, default: &str) -> Result<String> {
    let answer = prompt(message)?;
    if answer.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(answer)
    }
}
