mod harness;
mod scenarios;

use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, ensure};
use chrono::Utc;
use clap::Parser;
use colored::Colorize;

use scenarios::{SCENARIOS, ScenarioResult, run_batch};

#[derive(Debug, Parser)]
#[command(name = "vagabond-tester", version)]
#[command(about = "Automated QA for the Vagabond trip planner - engine scenarios and ledger checks")]
struct Args {
    /// Scenarios to run (comma-separated, or "all")
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json", "markdown"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.list_scenarios {
        write_scenario_list(&args)?;
        return Ok(());
    }

    announce_banner();

    let start = Instant::now();
    let scenario_names = expand_scenarios(&args.scenarios);
    let seeds = parse_seeds(&args.seeds)?;

    let mut results = Vec::new();
    for name in &scenario_names {
        for &seed in &seeds {
            let result = run_batch(name, seed, args.iterations, args.verbose).await;
            let status = if result.passed {
                "✅ PASS".green()
            } else {
                "❌ FAIL".red()
            };
            println!(
                "{status} {} (seed {seed}): {}/{} iterations",
                name.bold(),
                result.successful_iterations,
                result.iterations_run
            );
            results.push(result);
        }
    }

    write_report(&args, &results, start.elapsed())?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }
    Ok(())
}

fn announce_banner() {
    println!("{}", "🧳 Vagabond Automated Tester".bright_cyan().bold());
    println!("{}", "============================".cyan());
}

fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn expand_scenarios(arg: &str) -> Vec<String> {
    let names = split_csv(arg);
    if names.iter().any(|n| n == "all") {
        SCENARIOS.iter().map(|(name, _)| (*name).to_string()).collect()
    } else {
        names
    }
}

fn parse_seeds(input: &str) -> Result<Vec<u64>> {
    let tokens = split_csv(input);
    ensure!(!tokens.is_empty(), "at least one seed is required");
    tokens
        .iter()
        .map(|t| {
            t.parse::<u64>()
                .with_context(|| format!("invalid seed '{t}'"))
        })
        .collect()
}

fn report_writer(args: &Args) -> Result<Box<dyn Write>> {
    Ok(match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path).with_context(
            || format!("creating report file {}", path.display()),
        )?)),
        None => Box::new(stdout()),
    })
}

fn write_scenario_list(args: &Args) -> Result<()> {
    let mut writer = report_writer(args)?;
    writeln!(writer, "Available scenarios:")?;
    for (name, description) in SCENARIOS {
        writeln!(writer, "  {name:18} - {description}")?;
    }
    writer.flush()?;
    Ok(())
}

fn write_report(args: &Args, results: &[ScenarioResult], total: Duration) -> Result<()> {
    match args.report.as_str() {
        "json" => {
            let mut writer = report_writer(args)?;
            write_json(writer.as_mut(), results)?;
            writer.flush()?;
        }
        "markdown" => {
            let mut writer = report_writer(args)?;
            write_markdown(writer.as_mut(), results, total)?;
            writer.flush()?;
        }
        _ => write_console(results, total),
    }
    Ok(())
}

#[derive(serde::Serialize)]
struct Report<'a> {
    generated_at: String,
    total_scenarios: usize,
    passed: usize,
    failed: usize,
    results: &'a [ScenarioResult],
}

fn write_json(writer: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    let passed = results.iter().filter(|r| r.passed).count();
    let report = Report {
        generated_at: Utc::now().to_rfc3339(),
        total_scenarios: results.len(),
        passed,
        failed: results.len() - passed,
        results,
    };
    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)?;
    Ok(())
}

fn write_markdown(
    writer: &mut dyn Write,
    results: &[ScenarioResult],
    total: Duration,
) -> Result<()> {
    writeln!(writer, "# Vagabond Logic Test Results")?;
    writeln!(writer)?;
    writeln!(writer, "Generated: {}", Utc::now().to_rfc3339())?;
    writeln!(writer, "Total time: {total:?}")?;
    writeln!(writer)?;
    if results.is_empty() {
        writeln!(writer, "No scenarios executed.")?;
        return Ok(());
    }
    writeln!(writer, "| Scenario | Seed | Iterations | Result |")?;
    writeln!(writer, "|----------|------|------------|--------|")?;
    for result in results {
        writeln!(
            writer,
            "| {} | {} | {}/{} | {} |",
            result.scenario_name,
            result.seed,
            result.successful_iterations,
            result.iterations_run,
            if result.passed { "pass" } else { "fail" }
        )?;
    }
    for result in results {
        if result.failures.is_empty() {
            continue;
        }
        writeln!(writer)?;
        writeln!(writer, "## Failures: {}", result.scenario_name)?;
        for failure in &result.failures {
            writeln!(writer, "- {failure}")?;
        }
    }
    Ok(())
}

fn write_console(results: &[ScenarioResult], total: Duration) {
    println!();
    println!("{}", "📊 Test Results Summary".bright_cyan().bold());
    println!("{}", "======================".cyan());

    let total_scenarios = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = total_scenarios - passed;

    println!("Total scenario runs: {total_scenarios}");
    println!("Passed: {}", passed.to_string().green());
    println!("Failed: {}", failed.to_string().red());
    println!("Total time: {total:?}");
    println!();

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        println!("{status} {}", result.scenario_name.bold());
        println!(
            "   Iterations: {}/{} successful in {}ms",
            result.successful_iterations, result.iterations_run, result.duration_ms
        );
        if !result.failures.is_empty() {
            println!("   Failures:");
            for failure in &result.failures {
                println!("     • {}", failure.red());
            }
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result(passed: bool) -> ScenarioResult {
        ScenarioResult {
            scenario_name: "smoke".to_string(),
            seed: 1337,
            iterations_run: 3,
            successful_iterations: if passed { 3 } else { 1 },
            passed,
            duration_ms: 12,
            failures: if passed {
                Vec::new()
            } else {
                vec!["seed 1338: boom".to_string()]
            },
        }
    }

    #[test]
    fn split_csv_trims_and_drops_empties() {
        assert_eq!(split_csv(" a, b ,,c"), vec!["a", "b", "c"]);
        assert!(split_csv(" , ").is_empty());
    }

    #[test]
    fn parse_seeds_accepts_decimal_and_rejects_junk() {
        assert_eq!(parse_seeds("1337, 42").unwrap(), vec![1337, 42]);
        assert!(parse_seeds("owl").is_err());
        assert!(parse_seeds("").is_err());
    }

    #[test]
    fn expand_scenarios_all_covers_the_registry() {
        let expanded = expand_scenarios("all");
        assert_eq!(expanded.len(), SCENARIOS.len());
        for (name, _) in SCENARIOS {
            assert!(expanded.iter().any(|n| n == name), "missing {name}");
        }
        assert_eq!(expand_scenarios("smoke,edit-storm").len(), 2);
    }

    #[test]
    fn json_report_includes_every_result() {
        let mut buffer = Vec::new();
        write_json(&mut buffer, &[sample_result(true), sample_result(false)]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("\"total_scenarios\": 2"));
        assert!(text.contains("scenario_name"));
        assert!(text.contains("seed 1338: boom"));
    }

    #[test]
    fn markdown_report_handles_empty_and_failures() {
        let mut buffer = Vec::new();
        write_markdown(&mut buffer, &[], Duration::from_millis(5)).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("No scenarios executed."));

        let mut buffer = Vec::new();
        write_markdown(&mut buffer, &[sample_result(false)], Duration::from_millis(5)).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("# Vagabond Logic Test Results"));
        assert!(text.contains("## Failures: smoke"));
    }

    #[tokio::test]
    async fn unknown_scenarios_fail_their_batch() {
        let result = run_batch("definitely-not-a-scenario", 1, 2, false).await;
        assert!(!result.passed);
        assert_eq!(result.successful_iterations, 0);
        assert_eq!(result.failures.len(), 2);
    }

    #[tokio::test]
    async fn every_registered_scenario_passes_once() {
        for (name, _) in SCENARIOS {
            let result = run_batch(name, 7, 1, false).await;
            assert!(result.passed, "{name} failed: {:?}", result.failures);
        }
    }
}
