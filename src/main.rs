//! sat-moea CLI
//!
//! Runs the bi-objective evolutionary search on a DIMACS CNF file and
//! writes a generation log, the overall best Pareto front, and optionally
//! every run's best front and a per-generation diversity trace.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use tracing::{info, Level};

use sat_moea::moea::{
    MoeaConfig, MoeaResult, MoeaRunner, ParentSelection, SurvivalSelection, SurvivalStrategy,
    Termination,
};
use sat_moea::sat::{read_dimacs, read_seed_genomes, write_front, write_solution, Genome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ParentChoice {
    /// Fitness proportional selection
    #[value(alias = "FPS")]
    Fps,
    /// k-tournament selection with replacement
    #[value(alias = "kTourn")]
    KTourn,
    /// Uniform random
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SurvivalChoice {
    #[value(alias = "Truncation")]
    Truncation,
    /// k-tournament selection without replacement
    #[value(alias = "kTourn")]
    KTourn,
    /// Uniform random
    Random,
    /// Fitness proportional selection
    #[value(alias = "FPS")]
    Fps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyChoice {
    Plus,
    Comma,
}

#[derive(Parser, Debug)]
#[command(name = "sat-moea")]
#[command(about = "Runs a (mu+lambda) EA to find MAXSAT solutions with many don't-care variables")]
#[command(version)]
struct Cli {
    /// Path to an existing CNF equation file
    #[arg(short = 'c', long = "cnf")]
    cnf: PathBuf,

    /// Seeds the random number generator; `time` uses the current time
    #[arg(short, long, default_value = "time")]
    seed: String,

    /// Number of runs of the algorithm
    #[arg(short, long, default_value_t = 30)]
    runs: usize,

    /// Number of organisms kept between generations
    #[arg(short, long, default_value_t = 100)]
    population_size: usize,

    /// Number of children produced each generation
    #[arg(short = 'i', long, default_value_t = 10)]
    children: usize,

    /// Parent selection model
    #[arg(short = 'o', long, value_enum, default_value = "fps")]
    parent_selection: ParentChoice,

    /// Tournament size for k-tournament parent selection
    #[arg(long = "parent-tournament-size", default_value_t = 20)]
    parent_k: usize,

    /// Survival selection model
    #[arg(short = 'v', long, value_enum, default_value = "truncation")]
    survival_selection: SurvivalChoice,

    /// Tournament size for k-tournament survival selection
    #[arg(long = "survival-tournament-size", default_value_t = 20)]
    survival_k: usize,

    /// Terminate a run after N fitness evaluations; -1 disables
    #[arg(short, long, default_value_t = 10_000, allow_negative_numbers = true)]
    evals: i64,

    /// Terminate a run when the best front is unchanged for N generations; -1 disables
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    terminate_pareto: i64,

    /// Seed the population with solutions from a file
    #[arg(long)]
    seed_file: Option<PathBuf>,

    /// Survival strategy, (mu + lambda) or (mu, lambda)
    #[arg(long, value_enum, default_value = "plus")]
    survival_strategy: StrategyChoice,

    /// Path to the generation log
    #[arg(short, long, default_value = "log.txt")]
    log: PathBuf,

    /// Path to the solution file
    #[arg(short = 'u', long, default_value = "solution.txt")]
    solution: PathBuf,

    /// Path to a file receiving every run's best front
    #[arg(long)]
    pareto: Option<PathBuf>,

    /// Path to a file receiving the diversity measure of every generation
    #[arg(long)]
    diversity: Option<PathBuf>,

    /// Execute runs in parallel (requires the `parallel` feature)
    #[arg(long)]
    parallel: bool,

    /// Emit per-generation debug events
    #[arg(long)]
    verbose: bool,
}

impl Cli {
    fn resolve_seed(&self) -> anyhow::Result<u64> {
        if self.seed == "time" {
            let millis = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .context("system clock before UNIX epoch")?
                .as_millis();
            Ok((millis % 4_294_967_295) as u64)
        } else {
            self.seed
                .parse()
                .with_context(|| format!("invalid seed `{}`", self.seed))
        }
    }

    fn to_config(&self, seed: u64) -> anyhow::Result<MoeaConfig> {
        let parent = match self.parent_selection {
            ParentChoice::Fps => ParentSelection::FitnessProportional,
            ParentChoice::KTourn => ParentSelection::Tournament(self.parent_k),
            ParentChoice::Random => ParentSelection::Uniform,
        };
        let survival = match self.survival_selection {
            SurvivalChoice::Truncation => SurvivalSelection::Truncation,
            SurvivalChoice::KTourn => SurvivalSelection::Tournament(self.survival_k),
            SurvivalChoice::Random => SurvivalSelection::Uniform,
            SurvivalChoice::Fps => SurvivalSelection::FitnessProportional,
        };
        let strategy = match self.survival_strategy {
            StrategyChoice::Plus => SurvivalStrategy::Plus,
            StrategyChoice::Comma => SurvivalStrategy::Comma,
        };

        let mut config = MoeaConfig::default()
            .with_population_size(self.population_size)
            .with_offspring_count(self.children)
            .with_runs(self.runs)
            .with_parent_selection(parent)
            .with_survival_selection(survival)
            .with_survival_strategy(strategy)
            .with_diversity(self.diversity.is_some())
            .with_parallel(self.parallel)
            .with_seed(seed);

        config = match self.evals {
            -1 => config.without_evaluation_limit(),
            n if n > 0 => config.with_max_evaluations(n as usize),
            n => bail!("--evals must be positive or -1, got {n}"),
        };
        config = match self.terminate_pareto {
            -1 => config,
            n if n > 0 => config.with_termination(Termination::StablePareto(n as usize)),
            n => bail!("--terminate-pareto must be positive or -1, got {n}"),
        };

        config.validate()?;
        Ok(config)
    }
}

fn create(path: &Path) -> anyhow::Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn display_optional(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "None".to_string())
}

fn write_log_header<W: Write>(out: &mut W, cli: &Cli, seed: u64) -> std::io::Result<()> {
    writeln!(out, "CNF file: {}", cli.cnf.display())?;
    writeln!(out, "Random number seed: {seed}")?;
    writeln!(out, "Number of runs: {}", cli.runs)?;
    writeln!(out, "Maximum number of fitness evaluations per run: {}", cli.evals)?;
    writeln!(out, "log file: {}", cli.log.display())?;
    writeln!(out, "solution file: {}", cli.solution.display())?;
    writeln!(out, "pareto front file: {}", display_optional(&cli.pareto))?;
    writeln!(out, "diversity front file: {}", display_optional(&cli.diversity))?;
    writeln!(out, "population size: {}", cli.population_size)?;
    writeln!(out, "offspring size: {}", cli.children)?;
    writeln!(out, "Terminate after static pareto front: {}", cli.terminate_pareto)?;
    writeln!(out, "Parent selection: {:?}", cli.parent_selection)?;
    writeln!(out, "Survival Selection: {:?}", cli.survival_selection)?;
    writeln!(out, "Parent tournament size: {}", cli.parent_k)?;
    writeln!(out, "Survival tournament size: {}", cli.survival_k)?;
    writeln!(out, "Seed File: {}", display_optional(&cli.seed_file))?;
    writeln!(out, "Evolution strategy: {:?}", cli.survival_strategy)?;
    writeln!(out)?;
    writeln!(out, "Result Log")
}

fn write_outputs(cli: &Cli, seed: u64, result: &MoeaResult) -> anyhow::Result<()> {
    let mut log = create(&cli.log)?;
    write_log_header(&mut log, cli, seed)?;
    for (index, run) in result.runs.iter().enumerate() {
        writeln!(log, "\nRun {}", index + 1)?;
        for stats in &run.history {
            writeln!(log, "{stats}")?;
        }
    }
    log.flush()?;

    if let Some(path) = &cli.pareto {
        let mut out = create(path)?;
        for (index, run) in result.runs.iter().enumerate() {
            writeln!(out, "c Run {index}")?;
            write_front(&mut out, &run.best_front)?;
        }
        out.flush()?;
    }

    if let Some(path) = &cli.diversity {
        let mut out = create(path)?;
        for (index, run) in result.runs.iter().enumerate() {
            writeln!(out, "\nRun {}", index + 1)?;
            for value in &run.diversity {
                writeln!(out, "{value}")?;
            }
        }
        out.flush()?;
    }

    let mut out = create(&cli.solution)?;
    write_solution(
        &mut out,
        &cli.cnf.display().to_string(),
        &result.overall_best_front,
    )?;
    out.flush()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    let started = Instant::now();

    let text = std::fs::read_to_string(&cli.cnf)
        .with_context(|| format!("cannot read {}", cli.cnf.display()))?;
    let equation = match read_dimacs(&text) {
        Ok(equation) => equation,
        Err(e) => {
            println!("{e}");
            std::process::exit(1);
        }
    };

    let seeds: Vec<Genome> = match &cli.seed_file {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
            read_seed_genomes(BufReader::new(file), equation.number_of_variables())?
        }
        None => Vec::new(),
    };

    let seed = cli.resolve_seed()?;
    let config = cli.to_config(seed)?;
    info!(
        cnf = %cli.cnf.display(),
        variables = equation.number_of_variables(),
        clauses = equation.number_of_clauses(),
        seed,
        runs = config.runs,
        "starting search"
    );

    let result = MoeaRunner::run(&equation, &config, &seeds)?;
    write_outputs(&cli, seed, &result)?;

    println!("Done in {:.3} seconds.", started.elapsed().as_secs_f64());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut full = vec!["sat-moea"];
        full.extend_from_slice(args);
        Cli::parse_from(full)
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["-c", "x.cnf"]);
        let config = cli.to_config(1).unwrap();
        assert_eq!(config.population_size, 100);
        assert_eq!(config.offspring_count, 10);
        assert_eq!(config.runs, 30);
        assert_eq!(config.max_evaluations, Some(10_000));
        assert!(config.termination.is_empty());
        assert_eq!(config.parent_selection, ParentSelection::FitnessProportional);
        assert_eq!(config.survival_selection, SurvivalSelection::Truncation);
        assert_eq!(config.seed, Some(1));
    }

    #[test]
    fn test_selection_choices() {
        let cli = parse(&[
            "-c",
            "x.cnf",
            "-o",
            "k-tourn",
            "--parent-tournament-size",
            "5",
            "-v",
            "fps",
            "--survival-strategy",
            "comma",
            "-p",
            "10",
            "-i",
            "20",
        ]);
        let config = cli.to_config(1).unwrap();
        assert_eq!(config.parent_selection, ParentSelection::Tournament(5));
        assert_eq!(config.survival_selection, SurvivalSelection::FitnessProportional);
        assert_eq!(config.survival_strategy, SurvivalStrategy::Comma);
    }

    #[test]
    fn test_disabled_evals_with_pareto_window() {
        let cli = parse(&["-c", "x.cnf", "-e", "-1", "--terminate-pareto", "15"]);
        let config = cli.to_config(1).unwrap();
        assert_eq!(config.max_evaluations, None);
        assert_eq!(config.termination, vec![Termination::StablePareto(15)]);
    }

    #[test]
    fn test_no_stopping_rule_rejected() {
        let cli = parse(&["-c", "x.cnf", "-e", "-1"]);
        assert!(cli.to_config(1).is_err());
    }

    #[test]
    fn test_numeric_seed() {
        let cli = parse(&["-c", "x.cnf", "-s", "1234"]);
        assert_eq!(cli.resolve_seed().unwrap(), 1234);
        let cli = parse(&["-c", "x.cnf", "-s", "soon"]);
        assert!(cli.resolve_seed().is_err());
    }
}
