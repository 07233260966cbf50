mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use maizeops::config::{Config, StrategyKind};
use maizeops::logic::{calculations, CycleFitness, DomainScan, FuzzyEngine, Optimizer};
use maizeops::models::{Assessment, SowingRecommendation};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Optimize {
        strategy: None,
        seed: None,
        cycle_length: None,
        validate: false,
    });

    if let Commands::Init = command {
        Config::setup_interactive()?;
        return Ok(());
    }

    let config = match Config::load(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            eprintln!("Run `maizeops init` or copy config/config.yaml.example to config/config.yaml");
            std::process::exit(1);
        }
    };

    match command {
        Commands::Optimize {
            strategy,
            seed,
            cycle_length,
            validate,
        } => run_optimize(config, strategy, seed, cycle_length, validate, cli.json),
        Commands::Evaluate {
            temperature,
            rainfall,
            strict,
            trace,
        } => run_evaluate(temperature, rainfall, strict, trace, cli.json),
        Commands::Scan { cycle_length, top } => run_scan(config, cycle_length, top, cli.json),
        Commands::Check => run_check(&config, cli.config.as_ref()),
        Commands::Init => Ok(()),
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Logs go to stderr so --json output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_optimize(
    mut config: Config,
    strategy: Option<String>,
    seed: Option<u64>,
    cycle_length: Option<usize>,
    validate: bool,
    json: bool,
) -> Result<()> {
    if let Some(seed) = seed {
        config.optimizer.seed = seed;
    }
    if let Some(length) = cycle_length {
        config.cycle.cycle_length = length;
    }
    config.validate()?;

    let kind = match strategy {
        Some(name) => name.parse::<StrategyKind>()?,
        None => config.optimizer.strategy,
    };

    let engine = FuzzyEngine::maize_sowing()?;
    let forecaster = config.forecast.build().context("Failed to set up forecast")?;
    let fitness = CycleFitness::new(&engine, forecaster.as_ref(), config.domain()?);
    let cycle_length = config.cycle.cycle_length;

    let optimizer = Optimizer::new(config.optimizer_settings()?)?;
    let mut search = config.optimizer.build_strategy(kind)?;
    let result = optimizer.optimize(search.as_mut(), |day| {
        Ok(fitness.cycle_fitness(day, cycle_length))
    });

    if result.is_degenerate() {
        bail!(
            "No feasible sowing day: the {} forecast ({} days) cannot cover a {}-day cycle from any day in {}",
            forecaster.name(),
            forecaster.horizon(),
            cycle_length,
            fitness.domain()
        );
    }

    let mut recommendation = SowingRecommendation::new(
        result.best_day,
        result.best_fitness,
        cycle_length,
        config.cycle.base_year,
        result.strategy.clone(),
    )?
    .with_history(result.history.clone());

    if let Ok(window) = fitness.window(result.best_day, cycle_length) {
        recommendation = recommendation.with_window(calculations::summarize_window(&window));
    }

    if validate {
        let scan = fitness.scan_domain(cycle_length, config.optimizer.parallel);
        recommendation = recommendation.with_validation(scan.best.day, scan.best.fitness);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendation)?);
    } else {
        print_recommendation(&recommendation, result.evaluations);
    }
    Ok(())
}

fn print_recommendation(rec: &SowingRecommendation, evaluations: usize) {
    println!();
    println!("Sowing recommendation ({})", rec.strategy);
    println!("  Best start day   : {}", rec.best_day);
    println!("  Sowing date      : {}", rec.sowing_label());
    println!("  Harvest estimate : {} ({} days)", rec.harvest_label(), rec.cycle_length);
    println!("  Cycle fitness    : {:.2}", rec.best_fitness);
    println!(
        "  Mean suitability : {:.1} {} {}",
        rec.mean_daily_score,
        rec.category.symbol(),
        rec.category
    );
    println!("  Advice           : {}", rec.category.advice());

    if let Some(window) = &rec.window {
        println!();
        println!("Season window");
        if let (Some(mean), Some(min), Some(max)) = (
            window.mean_temperature,
            window.min_temperature,
            window.max_temperature,
        ) {
            println!("  Temperature      : {:.1} °C (min {:.1}, max {:.1})", mean, min, max);
        }
        println!(
            "  Rainfall         : {:.1} mm over {} rainy days",
            window.total_rainfall, window.rainy_days
        );
        println!("  Longest dry run  : {} days", window.longest_dry_spell);
        if window.valid_days < window.days {
            println!(
                "  Skipped days     : {} malformed records",
                window.days - window.valid_days
            );
        }
    }

    if let Some(validation) = &rec.validation {
        println!();
        println!("Exhaustive scan");
        println!(
            "  True optimum     : day {} ({:.2})",
            validation.scanned_best_day, validation.scanned_best_fitness
        );
        println!("  Gap              : {:.2}", validation.gap);
    }

    if let (Some(first), Some(last)) = (rec.history.first(), rec.history.last()) {
        println!();
        println!(
            "Convergence: {:.2} -> {:.2} over {} generations, {} evaluations",
            first,
            last,
            rec.history.len(),
            evaluations
        );
    }
    println!();
}

fn run_evaluate(
    temperature: f64,
    rainfall: f64,
    strict: bool,
    trace: bool,
    json: bool,
) -> Result<()> {
    let engine = FuzzyEngine::maize_sowing()?;

    let score = if strict {
        engine.evaluate_strict(temperature, rainfall)?
    } else {
        engine.evaluate(temperature, rainfall)?
    };
    let assessment = Assessment::new(temperature, rainfall, score);

    if trace {
        let session = engine.infer(temperature, rainfall)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&session)?);
            return Ok(());
        }

        println!();
        println!("Temperature {:.1} °C", temperature);
        for (term, degree) in engine
            .temperature()
            .term_names()
            .iter()
            .zip(&session.temperature_degrees)
        {
            println!("  {:<10} {:.3}", term, degree);
        }
        println!("Rainfall {:.1} mm", rainfall);
        for (term, degree) in engine
            .rainfall()
            .term_names()
            .iter()
            .zip(&session.rainfall_degrees)
        {
            println!("  {:<10} {:.3}", term, degree);
        }
        println!("Rules fired: {}", session.fired_rules());
        for (rule, strength) in engine
            .rule_base()
            .rules()
            .iter()
            .zip(&session.firing_strengths)
            .filter(|(_, s)| **s > 0.0)
        {
            println!("  {:.3}  {}", strength, rule.label());
        }
        if session.is_degenerate() {
            println!("  (no rule fired, score falls back to 0)");
        }
    } else if json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
        return Ok(());
    }

    println!();
    println!(
        "Suitability {:.2} {} {}: {}",
        assessment.score,
        assessment.category.symbol(),
        assessment.category,
        assessment.advice
    );
    println!();
    Ok(())
}

fn run_scan(mut config: Config, cycle_length: Option<usize>, top: usize, json: bool) -> Result<()> {
    if let Some(length) = cycle_length {
        config.cycle.cycle_length = length;
    }
    config.validate()?;

    let engine = FuzzyEngine::maize_sowing()?;
    let forecaster = config.forecast.build().context("Failed to set up forecast")?;
    let fitness = CycleFitness::new(&engine, forecaster.as_ref(), config.domain()?);
    let scan = fitness.scan_domain(config.cycle.cycle_length, config.optimizer.parallel);

    if json {
        println!("{}", serde_json::to_string_pretty(&scan)?);
    } else {
        print_scan(&scan, top);
    }
    Ok(())
}

fn print_scan(scan: &DomainScan, top: usize) {
    let mut ranked = scan.points.clone();
    ranked.sort_by(|a, b| b.fitness.total_cmp(&a.fitness).then(a.day.cmp(&b.day)));

    println!();
    println!(
        "Scanned {} start days for a {}-day cycle",
        scan.points.len(),
        scan.cycle_length
    );
    println!("  Best day         : {} ({:.2})", scan.best.day, scan.best.fitness);
    if scan.penalized_days() > 0 {
        println!("  Infeasible days  : {}", scan.penalized_days());
    }
    println!();
    println!("Top {} days", top.min(ranked.len()));
    for point in ranked.iter().take(top) {
        println!(
            "  day {:>3}  {:>10.2}  (mean {:.1})",
            point.day,
            point.fitness,
            point.fitness / scan.cycle_length as f64
        );
    }
    println!();
}

fn run_check(config: &Config, config_override: Option<&std::path::PathBuf>) -> Result<()> {
    println!();
    match Config::resolved_path(config_override) {
        Some(path) => println!("Config: {}", path.display()),
        None => println!("Config: built-in defaults"),
    }
    println!("  Domain           : {}", config.domain()?);
    println!("  Cycle length     : {} days", config.cycle.cycle_length);
    println!(
        "  Optimizer        : {} (population {}, {} generations, seed {})",
        config.optimizer.strategy.as_str(),
        config.optimizer.population_size,
        config.optimizer.generations,
        config.optimizer.seed
    );

    let engine = FuzzyEngine::maize_sowing()?;
    println!("  Rule base        : {} rules", engine.rule_base().len());

    let forecaster = config.forecast.build().context("Failed to set up forecast")?;
    println!(
        "  Forecast         : {} ({} days)",
        forecaster.name(),
        forecaster.horizon()
    );

    // Last start day whose full cycle the forecast still covers
    let last_covered = forecaster.horizon() as i64 - config.cycle.cycle_length as i64 + 1;
    let domain = config.domain()?;
    if last_covered < domain.start() {
        println!("  Coverage         : NONE, every start day will be penalized");
    } else if last_covered < domain.end() {
        println!(
            "  Coverage         : days {}-{} only, later start days will be penalized",
            domain.start(),
            last_covered
        );
    } else {
        println!("  Coverage         : OK");
    }
    println!();
    Ok(())
}
