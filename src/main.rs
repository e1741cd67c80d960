use anyhow::{Context, Result};
use std::path::PathBuf;

use shoebox::browse;
use shoebox::catalog::CatalogService;
use shoebox::config::Config;
use shoebox::logging;

struct CliArgs {
    config_path: Option<PathBuf>,
    directory: Option<PathBuf>,
    check_only: bool,
    limit: Option<i64>,
    offset: i64,
    json: bool,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        config_path: None,
        directory: None,
        check_only: false,
        limit: None,
        offset: 0,
        json: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("shoebox {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--check" => {
                cli.check_only = true;
            }
            "--json" => {
                cli.json = true;
            }
            "--dir" | "-d" => {
                if i + 1 < args.len() {
                    cli.directory = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    eprintln!("Error: --dir requires a path argument");
                    std::process::exit(1);
                }
            }
            "--limit" | "-n" => {
                if i + 1 < args.len() {
                    match args[i + 1].parse() {
                        Ok(n) => cli.limit = Some(n),
                        Err(_) => {
                            eprintln!("Error: --limit requires an integer argument");
                            std::process::exit(1);
                        }
                    }
                    i += 1;
                } else {
                    eprintln!("Error: --limit requires an integer argument");
                    std::process::exit(1);
                }
            }
            "--offset" | "-o" => {
                if i + 1 < args.len() {
                    match args[i + 1].parse() {
                        Ok(n) => cli.offset = n,
                        Err(_) => {
                            eprintln!("Error: --offset requires an integer argument");
                            std::process::exit(1);
                        }
                    }
                    i += 1;
                } else {
                    eprintln!("Error: --offset requires an integer argument");
                    std::process::exit(1);
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    cli.config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn print_help() {
    println!(
        r#"shoebox - read-only Apple Photos library and folder photo browser

USAGE:
    shoebox [OPTIONS]

OPTIONS:
    --check             Report whether a Photos library is present and exit
    --dir, -d PATH      List image files in a folder instead of the catalog
    --limit, -n N       Photos per catalog page (default: config page_size)
    --offset, -o N      Starting row in the catalog (default: 0)
    --json              Print results as JSON
    --config, -c PATH   Path to config file
    --version, -V       Show version
    --help, -h          Show this help message

ENVIRONMENT:
    SHOEBOX_CONFIG      Path to config file (overrides default location)
    SHOEBOX_LOG         Log level (trace, debug, info, warn, error)

Config file location: $XDG_CONFIG_HOME/shoebox/config.toml"#
    );
}

fn load_config(cli: &CliArgs) -> Result<Config> {
    if let Some(path) = &cli.config_path {
        return Config::load_from(path).context("Failed to load config");
    }
    if let Ok(path) = std::env::var("SHOEBOX_CONFIG") {
        return Config::load_from(&PathBuf::from(path)).context("Failed to load config");
    }
    Config::load()
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

fn list_folder(directory: &PathBuf, json: bool) -> Result<()> {
    let photos = browse::list_directory_photos(directory)
        .with_context(|| format!("Failed to list photos in {}", directory.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&photos)?);
        return Ok(());
    }

    if photos.is_empty() {
        println!("No photos found in {}", directory.display());
        return Ok(());
    }

    for photo in &photos {
        let modified = photo
            .modified
            .map(|m| m.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>10}  {}  {}",
            format_size(photo.size),
            modified,
            photo.name
        );
    }
    println!("{} photos", photos.len());
    Ok(())
}

fn list_catalog(mut service: CatalogService, config: &Config, cli: &CliArgs) -> Result<()> {
    let limit = cli.limit.unwrap_or(config.page_size);
    let page = match service.list_photos(limit, cli.offset) {
        Ok(page) => page,
        Err(e) => {
            tracing::error!("Catalog listing failed: {}", e);
            anyhow::bail!("{}", e.user_message());
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        for photo in &page.photos {
            let created = photo
                .photo
                .date_created
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());
            let dimensions = match (photo.photo.width, photo.photo.height) {
                (Some(w), Some(h)) => format!("{}x{}", w, h),
                _ => "-".to_string(),
            };
            println!(
                "{:>8}  {}  {:>11}  {}",
                photo.photo.id, created, dimensions, photo.photo.name
            );
        }
        println!(
            "{} of {} photos (offset {})",
            page.photos.len(),
            page.total,
            page.offset
        );
    }

    service.shutdown();
    Ok(())
}

fn main() -> Result<()> {
    let cli = parse_args();

    let _ = logging::init(Some(Config::config_dir().join("logs")));

    let config = load_config(&cli)?;

    if let Some(directory) = &cli.directory {
        return list_folder(directory, cli.json);
    }

    let service = CatalogService::new(config.library_path.clone());
    if cli.check_only {
        if service.is_available() {
            println!("Photos library found");
        } else {
            println!("No Photos library found");
        }
        return Ok(());
    }

    if !service.is_available() {
        anyhow::bail!("No Photos library found on this machine (see --dir for plain folders)");
    }

    list_catalog(service, &config, &cli)
}
