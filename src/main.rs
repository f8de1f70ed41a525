use clap::{crate_version, App, AppSettings, Arg, ArgMatches, SubCommand};
use daybook::build::build_site;
use daybook::clean::clean_entries;
use daybook::config::Config;
use daybook::entry::load_entries;
use daybook::logging::init_tracing;
use daybook::stats::Stats;
use daybook::trend::hottest_words;
use std::error::Error;
use std::path::Path;

fn main() {
    let project_arg = Arg::with_name("project")
        .short("p")
        .long("project")
        .takes_value(true)
        .default_value(".")
        .help("The project directory, or any directory beneath it");

    let matches = App::new("daybook")
        .version(crate_version!())
        .about("Builds a static site from dated journal entries")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .global(true)
                .help("Logs each page as it is written"),
        )
        .subcommand(
            SubCommand::with_name("build")
                .about("Builds the site")
                .arg(project_arg.clone())
                .arg(
                    Arg::with_name("output")
                        .short("o")
                        .long("output")
                        .takes_value(true)
                        .default_value("_site")
                        .help("The directory to write the site into"),
                ),
        )
        .subcommand(
            SubCommand::with_name("clean")
                .about("Strips boilerplate sections from entry files")
                .arg(project_arg.clone())
                .arg(
                    Arg::with_name("dry-run")
                        .long("dry-run")
                        .help("Lists the files that would change without writing them"),
                ),
        )
        .subcommand(
            SubCommand::with_name("stats")
                .about("Prints word statistics")
                .arg(project_arg)
                .arg(
                    Arg::with_name("top")
                        .short("n")
                        .long("top")
                        .takes_value(true)
                        .default_value("10")
                        .help("How many words to list"),
                ),
        )
        .get_matches();

    init_tracing(matches.is_present("verbose"));

    let result = match matches.subcommand() {
        ("build", Some(m)) => build(m),
        ("clean", Some(m)) => clean(m),
        ("stats", Some(m)) => stats(m),
        _ => unreachable!("a subcommand is required"),
    };

    if let Err(e) = result {
        eprintln!("ERROR {}", e);
        std::process::exit(1);
    }
}

type Result<T> = std::result::Result<T, Box<dyn Error>>;

fn load_config(matches: &ArgMatches, output: &str) -> Result<Config> {
    // `project` has a default value
    let project = matches.value_of("project").unwrap_or(".");
    Ok(Config::from_directory(Path::new(project), Path::new(output))?)
}

fn build(matches: &ArgMatches) -> Result<()> {
    let output = matches.value_of("output").unwrap_or("_site");
    build_site(&load_config(matches, output)?)?;
    Ok(())
}

fn clean(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches, "_site")?;
    let dry_run = matches.is_present("dry-run");
    let report = clean_entries(&config.entries_directory, dry_run)?;
    for path in &report.changed {
        println!("{}", path.display());
    }
    println!(
        "{} of {} entries {}",
        report.changed.len(),
        report.examined,
        if dry_run { "would change" } else { "cleaned" }
    );
    Ok(())
}

fn stats(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches, "_site")?;
    let top: usize = matches.value_of("top").unwrap_or("10").parse()?;
    let entries = load_entries(&config.entries_directory)?;
    let stats = Stats::aggregate(&entries);

    println!(
        "{} entries, {} words, {} distinct",
        stats.entries, stats.total_words, stats.unique_words
    );
    for (year, words) in &stats.years {
        println!("  {}  {:>8}", year, words);
    }

    println!("\nMost used:");
    for (word, count) in stats.top_words(top) {
        println!("  {:<20} {:>6}", word, count);
    }

    println!("\nHottest:");
    for riser in hottest_words(&stats.matrix).iter().take(top) {
        println!(
            "  {:<20} {:>6} -> {:<6} (+{})",
            riser.word, riser.prev_sum, riser.recent_sum, riser.delta
        );
    }
    Ok(())
}
