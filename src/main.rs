use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use research_import::{load_research_file, sync, ResearchBundle, Settings};

#[derive(Parser)]
#[command(name = "research_import", about = "Extract guest profiles and episodes from research markdown")]
struct Cli {
    /// Settings file (TOML, JSON or YAML); RESEARCH_* env vars override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one document and print guests + episodes as JSON
    Parse {
        path: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
    /// Guest profiles table
    Guests {
        path: PathBuf,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Print one guest profile as JSON
    Guest {
        path: PathBuf,
        name: String,
    },
    /// Episode definitions table
    Episodes {
        path: PathBuf,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Parse many documents in parallel, one JSON file each
    Export {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Output directory
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Resolve episode guests against a JSON map of name -> remote id
    Plan {
        path: PathBuf,
        #[arg(long)]
        ids: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("loading settings")?;

    let result = match cli.command {
        Commands::Parse { path, pretty } => {
            let bundle = load(&path, &settings)?;
            let json = if pretty {
                serde_json::to_string_pretty(&bundle)?
            } else {
                serde_json::to_string(&bundle)?
            };
            println!("{}", json);
            Ok(())
        }
        Commands::Guests { path, limit } => {
            let bundle = load(&path, &settings)?;
            println!(
                "{:>3} | {:<24} | {:<20} | {:<16} | {:<30}",
                "#", "Guest", "Expertise", "Tone", "Background"
            );
            println!("{}", "-".repeat(105));
            for (i, g) in bundle.guests.iter().take(limit).enumerate() {
                println!(
                    "{:>3} | {:<24} | {:<20} | {:<16} | {:<30}",
                    i + 1,
                    truncate(&g.name, 24),
                    truncate(g.expertise.as_deref().unwrap_or("-"), 20),
                    truncate(g.tone.as_deref().unwrap_or("-"), 16),
                    truncate(g.background.as_deref().unwrap_or("-"), 30),
                );
            }
            println!("\n{} guests", bundle.guests.len());
            Ok(())
        }
        Commands::Guest { path, name } => {
            let bundle = load(&path, &settings)?;
            let Some(profile) = bundle.guest(&name, settings.name_matching) else {
                bail!("no guest named {:?} in {}", name, path.display());
            };
            println!("{}", serde_json::to_string_pretty(profile)?);
            Ok(())
        }
        Commands::Episodes { path, limit } => {
            let bundle = load(&path, &settings)?;
            println!("{:>3} | {:<20} | {:<48} | {:<30}", "#", "Theme", "Title", "Guests");
            println!("{}", "-".repeat(110));
            for (i, e) in bundle.episodes.iter().take(limit).enumerate() {
                println!(
                    "{:>3} | {:<20} | {:<48} | {:<30}",
                    i + 1,
                    truncate(&e.theme, 20),
                    truncate(&e.title, 48),
                    truncate(&e.guest_names.join(", "), 30),
                );
            }
            println!("\n{} episodes", bundle.episodes.len());
            Ok(())
        }
        Commands::Export { paths, out } => {
            std::fs::create_dir_all(&out)
                .with_context(|| format!("creating {}", out.display()))?;
            let counts = export_documents(&paths, &out, &settings);
            println!(
                "Exported {} documents ({} guests, {} episodes), {} failed.",
                counts.ok, counts.guests, counts.episodes, counts.failed
            );
            if counts.ok == 0 {
                bail!("no documents exported");
            }
            Ok(())
        }
        Commands::Plan { path, ids } => {
            let bundle = load(&path, &settings)?;
            let raw = std::fs::read_to_string(&ids)
                .with_context(|| format!("reading {}", ids.display()))?;
            let guest_ids: HashMap<String, String> = serde_json::from_str(&raw)
                .with_context(|| format!("parsing {}", ids.display()))?;
            let plan = sync::plan_links(&bundle.episodes, &guest_ids, settings.name_matching);
            for links in &plan.episodes {
                println!("  - {} -> {}", links.title, links.guest_ids.join(", "));
            }
            if !plan.unresolved.is_empty() {
                println!("\n--- Unresolved ---");
                for u in &plan.unresolved {
                    println!("  {}: {}", truncate(&u.episode_title, 40), u.guest_name);
                }
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    result
}

/// Parse a document and fail if it defines no episodes.
fn load(path: &Path, settings: &Settings) -> anyhow::Result<ResearchBundle> {
    let bundle = load_research_file(path, settings)
        .with_context(|| format!("parsing {}", path.display()))?;
    if bundle.episodes.is_empty() {
        bail!(
            "no episode definitions could be parsed from {}",
            path.display()
        );
    }
    Ok(bundle)
}

#[derive(Default)]
struct ExportCounts {
    ok: usize,
    failed: usize,
    guests: usize,
    episodes: usize,
}

fn export_documents(paths: &[PathBuf], out: &Path, settings: &Settings) -> ExportCounts {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(paths.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
    {
        pb.set_style(style.progress_chars("#>-"));
    }

    let results: Vec<_> = paths
        .par_iter()
        .map(|path| {
            let res = export_one(path, out, settings);
            pb.inc(1);
            (path, res)
        })
        .collect();
    pb.finish_and_clear();

    let mut counts = ExportCounts::default();
    for (path, res) in results {
        match res {
            Ok(bundle) => {
                counts.ok += 1;
                counts.guests += bundle.guests.len();
                counts.episodes += bundle.episodes.len();
            }
            Err(e) => {
                counts.failed += 1;
                tracing::error!(path = %path.display(), error = ?e, "export failed");
            }
        }
    }
    counts
}

fn export_one(path: &Path, out: &Path, settings: &Settings) -> anyhow::Result<ResearchBundle> {
    let bundle = load(path, settings)?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "research".into());
    let target = out.join(format!("{}.json", stem));
    let json = serde_json::to_string_pretty(&bundle)?;
    std::fs::write(&target, json).with_context(|| format!("writing {}", target.display()))?;
    Ok(bundle)
}

/// At most `max` chars of `s`, with "..." appended when anything was cut.
fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &s[..cut]),
        None => s.to_string(),
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    let (h, m, s) = (secs / 3600, secs % 3600 / 60, secs % 60);
    match (h, m) {
        (0, 0) => format!("{:.1}s", d.as_secs_f64()),
        (0, _) => format!("{m}m {s}s"),
        _ => format!("{h}h {m}m {s}s"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use research_import::NameMatching;

    #[test]
    fn truncate_long_names() {
        assert_eq!(truncate("Jane Doe", 24), "Jane Doe");
        assert_eq!(truncate("Jane Doe", 4), "Jane...");
        assert_eq!(truncate("Zoë Ürban", 3), "Zoë...");
        assert_eq!(truncate("Jane", 4), "Jane");
    }

    #[test]
    fn duration_formats() {
        assert_eq!(format_duration(std::time::Duration::from_secs(75)), "1m 15s");
        assert_eq!(format_duration(std::time::Duration::from_secs(3725)), "1h 2m 5s");
        assert_eq!(format_duration(std::time::Duration::from_millis(2500)), "2.5s");
        assert_eq!(format_duration(std::time::Duration::from_secs(3600)), "1h 0m 0s");
    }

    #[test]
    fn load_rejects_documents_without_episodes() {
        let err = load(Path::new("tests/fixtures/no_episodes.md"), &Settings::default()).unwrap_err();
        assert!(err.to_string().contains("no episode definitions"));
    }

    #[test]
    fn guest_lookup_follows_matching_policy() {
        let bundle = load(Path::new("tests/fixtures/research.md"), &Settings::default()).unwrap();
        assert!(bundle.guest("Theo Park", NameMatching::Exact).is_some());
        assert!(bundle.guest("theo park", NameMatching::Exact).is_none());
        assert!(bundle.guest("theo park", NameMatching::Normalized).is_some());
    }

    #[test]
    fn load_fixture() {
        let bundle = load(Path::new("tests/fixtures/research.md"), &Settings::default()).unwrap();
        assert_eq!(bundle.guests.len(), 4);
    }
}
