// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use std::env;

use photo_diary::{available_dates, build_feed, telemetry, AppConfig, Feed, PostStore, SelectionState};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let config = AppConfig::from_env();

    match args.first().map(String::as_str) {
        None | Some("ui") => run_ui_mode(&config),
        Some("print") => {
            telemetry::init_tracing("warn,photo_diary=info");
            let store = config.load_store()?;
            let selection = parse_selection(&store, &args[1..])?;
            print_feed(&build_feed(&store, &selection));
            Ok(())
        }
        Some("json") => {
            telemetry::init_tracing("warn,photo_diary=info");
            let store = config.load_store()?;
            let selection = parse_selection(&store, &args[1..])?;
            let json = serde_json::to_string_pretty(&build_feed(&store, &selection))
                .context("Failed to serialize feed")?;
            println!("{}", json);
            Ok(())
        }
        Some("dates") => {
            telemetry::init_tracing("warn,photo_diary=info");
            let store = config.load_store()?;
            for date in available_dates(&store) {
                println!("{}", date);
            }
            Ok(())
        }
        Some(other) => {
            print_usage();
            bail!("unknown command: {}", other)
        }
    }
}

fn print_usage() {
    eprintln!("Usage: photo-diary [ui]");
    eprintln!("       photo-diary print [--category ID | --date DATE]");
    eprintln!("       photo-diary json  [--category ID | --date DATE]");
    eprintln!("       photo-diary dates");
}

/// Turn `--category ID` / `--date DATE` flags into selection transitions.
/// Flags apply left to right, so the last one wins.
fn parse_selection(store: &PostStore, args: &[String]) -> Result<SelectionState> {
    let mut selection = SelectionState::new();
    let mut iter = args.iter();

    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--category" | "-c" => {
                let id = iter.next().context("--category needs an id")?;
                // Unknown ids are still a valid selection; they just match nothing
                let label = store
                    .category(id)
                    .map(|c| c.label.clone())
                    .unwrap_or_else(|| id.clone());
                selection.select_category(id.as_str(), label);
            }
            "--date" | "-d" => {
                let date = iter.next().context("--date needs a date")?;
                selection.select_date(Some(date.as_str()));
            }
            "--all" => selection.reset(),
            other => bail!("unknown flag: {}", other),
        }
    }

    Ok(selection)
}

fn print_feed(feed: &Feed) {
    println!("📷 {}", feed.header_label);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if feed.is_empty() {
        println!("\n(no posts)");
        return;
    }

    for group in &feed.groups {
        println!("\n📅 {}", group.date);
        for post in &group.posts {
            println!("   #{} [{}] {}", post.id, post.category, post.caption);
            println!("      {} image(s): {}", post.images.len(), post.images.join(", "));
        }
    }

    println!("\n✓ {} posts in {} day(s)", feed.post_count(), feed.groups.len());
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &AppConfig) -> Result<()> {
    let store = config.load_store()?;

    println!("📷 Loaded {} posts across {} timeline entries", store.posts().len(), store.categories().len());
    println!("Starting UI... (Press 'q' to quit)\n");

    let mut app = ui::App::new(store);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &AppConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use: photo-diary print");
    std::process::exit(1);
}
