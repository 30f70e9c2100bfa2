//! enrollsim: headless runner for the student population simulator.
//!
//! Usage:
//!   enrollsim --seed 12345 --terms 8 --db ipeds_data.db
//!   enrollsim --config sim.json --term-pattern fall-spring --validate

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use enrollsim_core::{
    calendar::TermPattern,
    config::SimConfig,
    engine::SimEngine,
    records::SimOutput,
    store::{SimStore, WriteReport},
    validate::validate_output,
};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PatternArg {
    FallOnly,
    FallSpring,
}

impl From<PatternArg> for TermPattern {
    fn from(arg: PatternArg) -> Self {
        match arg {
            PatternArg::FallOnly => TermPattern::FallOnly,
            PatternArg::FallSpring => TermPattern::FallSpring,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "enrollsim")]
#[command(version)]
#[command(about = "Synthetic IPEDS-style student population simulator", long_about = None)]
struct Cli {
    /// JSON configuration file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of terms to simulate
    #[arg(short, long)]
    terms: Option<usize>,

    /// Calendar year of the first fall term
    #[arg(long)]
    start_year: Option<i32>,

    /// Base number of first-time freshmen admitted each fall
    #[arg(long)]
    freshmen: Option<u32>,

    /// Base number of transfer entrants admitted each fall
    #[arg(long)]
    transfers: Option<u32>,

    #[arg(short, long)]
    seed: Option<u64>,

    /// SQLite file to write (":memory:" for a dry run)
    #[arg(long)]
    db: Option<String>,

    #[arg(long, value_enum)]
    term_pattern: Option<PatternArg>,

    /// Also write the per-term summaries as JSON to this path
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// Check lifecycle invariants before writing; fail on any violation
    #[arg(long)]
    validate: bool,
}

impl Cli {
    fn resolve_config(&self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load(&path.to_string_lossy())?,
            None => SimConfig::default(),
        };
        if let Some(terms) = self.terms {
            config.total_terms = terms;
        }
        if let Some(year) = self.start_year {
            config.start_year = year;
        }
        if let Some(n) = self.freshmen {
            config.new_freshmen_each_fall = n;
        }
        if let Some(n) = self.transfers {
            config.new_transfers_each_fall = n;
        }
        if let Some(seed) = self.seed {
            config.random_seed = seed;
        }
        if let Some(db) = &self.db {
            config.db_path = db.clone();
        }
        if let Some(pattern) = self.term_pattern {
            config.term_pattern = pattern.into();
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    println!("enrollsim: student population simulator");
    println!("  seed:        {}", config.random_seed);
    println!("  terms:       {} ({:?})", config.total_terms, config.term_pattern);
    println!("  start year:  {}", config.start_year);
    println!("  db:          {}", config.db_path);
    println!();

    let engine = SimEngine::new(config.clone())?;
    let catalog = engine.catalog().clone();
    let output = engine.run()?;

    if cli.validate {
        let violations = validate_output(&output, &catalog, config.total_terms);
        if !violations.is_empty() {
            for v in violations.iter().take(20) {
                eprintln!("  {v}");
            }
            bail!("{} lifecycle violations; nothing written", violations.len());
        }
        log::info!("validation passed");
    }

    let mut store = SimStore::open(&config.db_path)?;
    store.migrate()?;
    store.seed_course_catalog(&catalog)?;
    let run_id = format!("run-{}-{}", config.random_seed, unix_seconds());
    // Run record, rows and integrity check commit together or not at all.
    let version = env!("CARGO_PKG_VERSION");
    let written = store.bulk_write_run(&run_id, &config, version, &output)?;

    if let Some(path) = &cli.summary_json {
        std::fs::write(path, serde_json::to_string_pretty(&output.term_summaries)?)?;
    }

    print_summary(&store, &run_id, &config, &output, &written)?;
    Ok(())
}

fn print_summary(
    store: &SimStore,
    run_id: &str,
    config: &SimConfig,
    output: &SimOutput,
    written: &WriteReport,
) -> Result<()> {
    println!("=== RUN SUMMARY ===");
    println!("  run_id:             {run_id}");
    println!("  students:           {}", written.students);
    println!("  enrollments:        {}", written.enrollments);
    println!("  course enrollments: {}", written.course_enrollments);
    println!("  completions:        {}", written.completions);
    println!("  cohort rows:        {}", written.cohorts);

    println!();
    println!("=== TERMS ===");
    for t in &output.term_summaries {
        println!(
            "  {:<12} | new {:>4} | enrolled {:>5} | grad {:>4} | withdrew {:>4} | GPA {:.2}",
            t.term, t.entrants, t.enrolled, t.graduated, t.withdrawn, t.mean_gpa
        );
    }

    println!();
    println!("=== COHORT RETENTION (fall to fall) ===");
    let last_cohort_year = config.start_year + (config.total_terms as i32 - 1);
    let mut any = false;
    for year in config.start_year..=last_cohort_year {
        let r = store.cohort_retention(year)?;
        for (attendance, counts) in [("FT", r.full_time), ("PT", r.part_time)] {
            if counts.cohort == 0 {
                continue;
            }
            any = true;
            match counts.rate() {
                Some(rate) => println!(
                    "  Fall {year} {attendance} | cohort {:>4} | excluded {:>3} | \
                     retained {:>4} | {rate:.1}%",
                    counts.cohort, counts.exclusions, counts.retained_or_completed
                ),
                None => println!(
                    "  Fall {year} {attendance} | cohort {:>4} | all excluded",
                    counts.cohort
                ),
            }
        }
    }
    if !any {
        println!("  (No first-time cohorts)");
    }

    let awards = store.completions_by_award()?;
    if !awards.is_empty() {
        println!();
        println!("=== COMPLETIONS BY AWARD ===");
        for (award, n) in awards {
            println!("  {award:<24} {n}");
        }
    }
    Ok(())
}

fn unix_seconds() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
