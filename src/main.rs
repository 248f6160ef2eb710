use anyhow::Result;
use api_sign::diff::DiffConfig;
use api_sign::spec::{ApiSpec, Compatibility};
use api_sign::{loader, summary};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "api-sign")]
#[command(about = "Check API description compatibility and generate semantic fingerprints")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
enum Commands {
    #[command(about = "Compare two API description files for compatibility")]
    Compare {
        #[arg(help = "Path to the old specification file")]
        old_file: PathBuf,
        #[arg(help = "Path to the new specification file")]
        new_file: PathBuf,
        #[arg(long, help = "Show the full classified change list")]
        detailed: bool,
    },
    #[command(about = "Generate a semantic fingerprint for an API description file")]
    Fingerprint {
        #[arg(help = "Path to the specification file")]
        file: PathBuf,
    },
    #[command(about = "List classified changes between two API description files")]
    Diff {
        #[arg(help = "Path to the old specification file")]
        old_file: PathBuf,
        #[arg(help = "Path to the new specification file")]
        new_file: PathBuf,
        #[arg(long, help = "Output format", value_enum, default_value = "text")]
        format: OutputFormat,
        #[arg(long, help = "Change categories to suppress (comma-separated)")]
        except_categories: Option<String>,
        #[arg(long, help = "Path to a YAML configuration file")]
        config: Option<PathBuf>,
    },
    #[command(about = "Summarize one API description file")]
    Summary {
        #[arg(help = "Path to the specification file")]
        file: PathBuf,
        #[arg(long, help = "Output format", value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum OutputFormat {
    Text,
    Json,
}

fn read_spec(path: &PathBuf) -> Result<ApiSpec> {
    let content = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file '{}': {}", path.display(), e))?;
    ApiSpec::try_from(&content)
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Commands::Compare {
            old_file,
            new_file,
            detailed,
        } => {
            let old_spec = read_spec(&old_file)?;
            let new_spec = read_spec(&new_file)?;

            let compatibility = old_spec.compare_with(&new_spec);

            match compatibility {
                Compatibility::Green => {
                    println!("Green: Specifications are semantically identical");
                    std::process::exit(0);
                }
                Compatibility::Yellow => {
                    println!("Yellow: New specification is backward-compatible with old one");
                    if detailed {
                        let result = old_spec.diff(&new_spec);
                        println!(
                            "Detailed analysis: {} changes found, {} non-breaking",
                            result.changes.len(),
                            result.non_breaking_count
                        );
                        for change in &result.changes {
                            println!("  - [{}] {}", change.category, change.message);
                        }
                    }
                    std::process::exit(0);
                }
                Compatibility::Red => {
                    println!("Red: Breaking change detected");
                    if detailed {
                        let result = old_spec.diff(&new_spec);
                        println!(
                            "Detailed analysis: {} changes found, {} breaking",
                            result.changes.len(),
                            result.breaking_count
                        );
                        for change in &result.changes {
                            println!("  - [{}] {}", change.category, change.message);
                        }
                    }
                    std::process::exit(1);
                }
            }
        }
        Commands::Fingerprint { file } => {
            let content = fs::read_to_string(&file)
                .map_err(|e| anyhow::anyhow!("Failed to read file '{}': {}", file.display(), e))?;

            let fingerprint = api_sign::generate_fingerprint(&content)?;
            println!("{}", fingerprint);
        }
        Commands::Diff {
            old_file,
            new_file,
            format,
            except_categories,
            config,
        } => {
            let old_spec = read_spec(&old_file)?;
            let new_spec = read_spec(&new_file)?;

            // Build configuration: file first, flags override.
            let mut diff_config = match config {
                Some(path) => DiffConfig::from_yaml_file(path)?,
                None => DiffConfig::default(),
            };
            if let Some(except) = except_categories {
                diff_config.except_categories =
                    except.split(',').map(|s| s.trim().to_string()).collect();
            }

            let result = old_spec.diff_with_config(&new_spec, &diff_config);

            match format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&result)?;
                    println!("{}", json);
                }
                OutputFormat::Text => {
                    if result.changes.is_empty() {
                        println!("No changes detected.");
                    } else {
                        println!("Changes detected:");
                        for change in &result.changes {
                            println!("  [{}] {}", change.category, change.message);
                        }
                        println!();
                        println!("Summary:");
                        println!("  Breaking changes: {}", result.breaking_count);
                        println!("  Non-breaking changes: {}", result.non_breaking_count);
                    }
                }
            }

            if result.has_breaking_changes() {
                std::process::exit(1);
            }
        }
        Commands::Summary { file, format } => {
            let document = loader::load_document(&file)?;
            let model = api_sign::normalize::normalize(&document)?;
            let api_summary = summary::build_summary(&model);

            match format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&api_summary)?;
                    println!("{}", json);
                }
                OutputFormat::Text => {
                    println!("{} ({})", api_summary.title, api_summary.version);
                    println!("  Base URL: {}", api_summary.base_url);
                    println!("  Auth: {}", api_summary.auth_type);
                    println!("  Endpoints: {}", api_summary.endpoint_count);
                    for (method, count) in &api_summary.endpoints_by_method {
                        println!("    {}: {}", method, count);
                    }
                    if !api_summary.tags.is_empty() {
                        println!("  Tags: {}", api_summary.tags.join(", "));
                    }
                    if api_summary.deprecated > 0 {
                        println!("  Deprecated endpoints: {}", api_summary.deprecated);
                    }
                    for warning in &api_summary.warnings {
                        println!("  Warning: {}", warning);
                    }
                }
            }
        }
    }

    Ok(())
}
