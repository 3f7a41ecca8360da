use anyhow::{Context, bail};
use family_assign::algorithm::assignment::{AssignmentConfig, Granularity, statistics};
use family_assign::models::AssignmentMode;
use family_assign::workflow::{AssignmentWorkflow, CancelFlag};
use family_assign::JsonFileStore;
use log::{info, warn};
use std::path::PathBuf;

/// Command-line options for one workflow run
struct Options {
    data_dir: PathBuf,
    config: AssignmentConfig,
    execute: bool,
}

fn print_usage() {
    eprintln!(
        "Usage: family-assign --batch BATCH [options]\n\
         \n\
         Options:\n\
           --data-dir DIR        Store directory with families.json and students.json (default: ./data)\n\
           --mode MODE           homogeneous | heterogeneous (default: homogeneous)\n\
           --granularity LEVEL   region | zone | wereda | kebele (default: wereda)\n\
           --max-children N      Children cap per family unit (default: 6)\n\
           --no-gender-balance   Disable the gender balance preference\n\
           --consider-age        Exclude candidates older than both parents\n\
           --execute             Persist the plan after preview (default: preview only)"
    );
}

fn parse_options() -> anyhow::Result<Options> {
    let mut data_dir = PathBuf::from("data");
    let mut builder = AssignmentConfig::builder();
    let mut batch: Option<String> = None;
    let mut execute = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--data-dir" => {
                data_dir = PathBuf::from(args.next().context("--data-dir needs a value")?);
            }
            "--batch" => batch = Some(args.next().context("--batch needs a value")?),
            "--mode" => {
                let value = args.next().context("--mode needs a value")?;
                let mode: AssignmentMode = value.parse().map_err(anyhow::Error::msg)?;
                builder = builder.mode(mode);
            }
            "--granularity" => {
                let value = args.next().context("--granularity needs a value")?;
                let granularity: Granularity = value.parse().map_err(anyhow::Error::msg)?;
                builder = builder.granularity(granularity);
            }
            "--max-children" => {
                let value = args.next().context("--max-children needs a value")?;
                builder = builder.max_children_per_unit(
                    value.parse().context("--max-children must be a number")?,
                );
            }
            "--no-gender-balance" => builder = builder.balance_gender(false),
            "--consider-age" => builder = builder.consider_age(true),
            "--execute" => execute = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => bail!("unknown argument: {other} (try --help)"),
        }
    }

    let Some(batch) = batch else {
        print_usage();
        bail!("--batch is required");
    };

    Ok(Options {
        data_dir,
        config: builder.batch(batch).build(),
        execute,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = parse_options()?;
    print!("{}", options.config);

    let store = JsonFileStore::open(&options.data_dir)
        .with_context(|| format!("opening store at {}", options.data_dir.display()))?;

    let mut workflow = AssignmentWorkflow::new(store, options.config)?;
    let outcome = workflow.preview().await.context("preview failed")?.clone();

    println!();
    print!("{}", outcome.statistics.render());
    if !outcome.plan.assignments.is_empty() {
        println!();
        print!("{}", statistics::render_assignments(&outcome.plan.assignments));
    }
    for failure in &outcome.plan.failed {
        warn!(
            "{} ({}): {} slot(s) unfilled: {}",
            failure.family_name, failure.unit_path, failure.unfilled_slots, failure.reason
        );
    }

    if outcome.plan.is_empty() {
        info!("Nothing to assign for this configuration");
        return Ok(());
    }

    if !options.execute {
        info!("Preview only; rerun with --execute to persist the plan");
        return Ok(());
    }

    workflow.confirm_review()?;
    let report = workflow.execute(&CancelFlag::new()).await?;

    println!();
    println!(
        "Execution {}: {} succeeded, {} failed",
        report.status, report.success_count, report.failure_count
    );
    for failure in &report.failures {
        warn!("{} ({}): {}", failure.family_name, failure.family_id, failure.reason);
    }

    Ok(())
}
