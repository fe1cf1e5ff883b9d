mod logic;
mod util;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use nibble_game::{ProgressionConfig, ProgressionEngine};
use std::fs::{self, File};
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use logic::{
    LogicTester, ScenarioResult, Simulator, get_scenario, list_scenarios, resolve_seed_inputs,
    scenario_keys,
};
use util::split_csv;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "nibble-tester", version)]
#[command(about = "Seeded scenario runner and invariant checker for the Nibble progression engine")]
struct Args {
    /// Scenarios to run (comma-separated, or `all`)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated; accepts hex and `a..b` ranges)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Progression config JSON to test instead of the bundled rules
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let engine = load_engine(args.config.as_deref())?;
    let scenarios = expand_scenarios(&args.scenarios);
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;

    let results = run_logic_scenarios(&args, &scenarios, &seeds, engine);
    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:20} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🍳 Nibble Progression Tester".bright_cyan().bold());
    println!("{}", "============================".cyan());
}

fn load_engine(config_path: Option<&Path>) -> Result<ProgressionEngine> {
    let Some(path) = config_path else {
        return Ok(ProgressionEngine::standard());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config = ProgressionConfig::from_json(&raw)
        .with_context(|| format!("invalid progression config {}", path.display()))?;
    log::info!(
        "loaded progression config from {} (daily limit {}, utc offset {}m)",
        path.display(),
        config.daily_limit,
        config.utc_offset_minutes
    );
    ProgressionEngine::new(config).context("progression config rejected")
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s.eq_ignore_ascii_case("all")) {
        scenarios.retain(|s| !s.eq_ignore_ascii_case("all"));
        for key in scenario_keys() {
            if !scenarios.iter().any(|s| s == key) {
                scenarios.push(key.to_string());
            }
        }
    }
    scenarios
}

fn run_logic_scenarios(
    args: &Args,
    scenarios: &[String],
    seeds: &[u64],
    engine: ProgressionEngine,
) -> Vec<ScenarioResult> {
    println!("{}", "🧠 Running Logic Tests".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let logic_tester = LogicTester::new(Simulator::new(engine, args.verbose), args.verbose);
    let mut results = Vec::new();

    for scenario_name in scenarios {
        if let Some(scenario) = get_scenario(scenario_name) {
            results.extend(logic_tester.run_scenario(&scenario, seeds, args.iterations));
        } else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
        }
    }

    results
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report {
        ReportFormat::Json => {
            logic::reports::generate_json_report(&mut output_target, results)?;
        }
        ReportFormat::Markdown => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Nibble Logic Test Results\n\n_No scenarios executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        ReportFormat::Console => {
            if results.is_empty() {
                writeln!(&mut output_target, "No logic scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
            let duration = start_time.elapsed();
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn base_args() -> Args {
        Args {
            scenarios: "smoke".to_string(),
            list_scenarios: false,
            seeds: "1337".to_string(),
            iterations: 1,
            report: ReportFormat::Json,
            verbose: false,
            output: None,
            config: None,
        }
    }

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("nibble-tester-{}-{name}", std::process::id()))
    }

    fn sample_result(passed: bool) -> ScenarioResult {
        ScenarioResult {
            scenario_name: "Smoke".to_string(),
            seed: 1337,
            passed,
            iterations_run: 3,
            successful_iterations: if passed { 3 } else { 2 },
            failures: if passed {
                Vec::new()
            } else {
                vec!["failure".to_string()]
            },
            average_duration: Duration::from_millis(10),
            performance_data: vec![Duration::from_millis(10)],
        }
    }

    #[test]
    fn expands_all_scenarios_keyword() {
        let expanded = expand_scenarios("smoke,all");
        assert_eq!(expanded[0], "smoke");
        assert_eq!(expanded.len(), scenario_keys().len());
        assert!(expanded.contains(&"shield-saver".to_string()));
    }

    #[test]
    fn expand_scenarios_without_all_preserves_order() {
        let expanded = expand_scenarios("sick-pet,smoke");
        assert_eq!(expanded, vec!["sick-pet".to_string(), "smoke".to_string()]);
    }

    #[test]
    fn unknown_scenarios_are_skipped() {
        let results = run_logic_scenarios(
            &base_args(),
            &["does-not-exist".to_string()],
            &[1],
            ProgressionEngine::standard(),
        );
        assert!(results.is_empty());
    }

    #[test]
    fn runs_named_scenarios_per_seed() {
        let results = run_logic_scenarios(
            &base_args(),
            &["smoke".to_string(), "binge-cook".to_string()],
            &[1, 2],
            ProgressionEngine::standard(),
        );
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.passed));
    }

    #[test]
    fn load_engine_defaults_to_bundled_rules() {
        let engine = load_engine(None).unwrap();
        assert_eq!(engine.config(), &ProgressionConfig::load_from_static());
    }

    #[test]
    fn load_engine_reads_custom_config() {
        let path = temp_file("config.json");
        std::fs::write(&path, r#"{"daily_limit": 2, "utc_offset_minutes": 60}"#).unwrap();
        let engine = load_engine(Some(&path)).unwrap();
        assert_eq!(engine.config().daily_limit, 2);
        assert_eq!(engine.config().utc_offset_minutes, 60);
    }

    #[test]
    fn load_engine_rejects_bad_config() {
        let path = temp_file("bad-config.json");
        std::fs::write(&path, r#"{"daily_limit": 0}"#).unwrap();
        let err = load_engine(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("daily limit must be at least 1"));

        let missing = temp_file("missing-config.json");
        let err = load_engine(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn maybe_list_scenarios_writes_output() {
        let temp = temp_file("scenarios.txt");
        let args = Args {
            list_scenarios: true,
            output: Some(temp.clone()),
            ..base_args()
        };
        assert!(maybe_list_scenarios(&args).unwrap());
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Available scenarios"));
        assert!(content.contains("faint-recovery"));
    }

    #[test]
    fn maybe_list_scenarios_returns_false_when_disabled() {
        assert!(!maybe_list_scenarios(&base_args()).unwrap());
    }

    #[test]
    fn write_reports_emits_json_for_empty_results() {
        let temp = temp_file("empty.json");
        let args = Args {
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert_eq!(content.trim(), "[]");
    }

    #[test]
    fn write_reports_emits_json_for_results() {
        let temp = temp_file("full.json");
        let args = Args {
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[sample_result(true)], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("scenario_name"));
    }

    #[test]
    fn write_reports_markdown_empty_results() {
        let temp = temp_file("empty.md");
        let args = Args {
            report: ReportFormat::Markdown,
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("No scenarios executed"));
    }

    #[test]
    fn write_reports_console_includes_failures() {
        let temp = temp_file("console.txt");
        let args = Args {
            report: ReportFormat::Console,
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[sample_result(false)], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Logic Test Results Summary"));
        assert!(content.contains("Total time"));
    }

    #[test]
    fn output_target_stdout_writes() {
        let mut target = OutputTarget::new(None).unwrap();
        target.write_all(b"ok").unwrap();
        target.flush().unwrap();
    }
}
