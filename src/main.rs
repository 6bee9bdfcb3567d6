//! Capitalics CLI
//!
//! Runs a sample household projection and prints the resulting time series

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;

use capitalics::{
    money, Arena, At, Credit, Endpoint, HouseSavings, RegularTransaction, Savings, Scheduler,
    TimeSeries, Timer, TimerAction,
};

#[derive(Parser)]
#[command(about = "Household finance projection")]
struct Args {
    /// Number of years to project
    #[arg(long, default_value_t = 15)]
    years: u32,

    /// Calendar start date (defaults to today)
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Write the full time series as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write the full time series as CSV
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Capitalics v0.1.0");
    println!("=================\n");

    let mut arena = Arena::new();

    // Accounts
    let checking = arena.insert(Savings::new("checking", 5_000.0, 0.1));
    let reserve = arena.insert(Savings::new("reserve", 20_000.0, 1.5));

    // Income and living costs; the salary gets a raise after three years.
    let salary = arena.insert(RegularTransaction::sequence(
        "salary",
        Endpoint::Outside,
        Endpoint::Entity(checking),
        vec![At::with_value(0, 0, 2_800.0), At::with_value(3, 0, 3_100.0)],
    )?);
    let living = arena.insert(RegularTransaction::fixed(
        "living",
        Endpoint::Entity(checking),
        Endpoint::Outside,
        1_900.0,
    ));

    // A car loan, repaid from checking via its rate transaction.
    let loan = arena.insert(Credit::new("car loan", 12_000.0, 3.9, 280.0));
    let loan_rate = arena.credit_rate_transaction(loan, Endpoint::Entity(checking));

    // A house savings contract starting after one year; its payments leave
    // the checking account, and after six years the saving phase is stopped
    // in favor of the credit payout.
    let house = arena.insert(HouseSavings::new(
        "house savings",
        60_000.0,
        400.0,
        1.6,
        0.25,
        40.0,
        2.3,
    ));
    let house_delayed = arena.insert(Timer::new(1, 0, house));
    let house_payment = arena.insert(RegularTransaction::fixed(
        "house payment",
        Endpoint::Entity(checking),
        Endpoint::Outside,
        400.0,
    ));
    let house_delayed_payment = arena.insert(Timer::new(1, 0, house_payment));
    let stop_house = arena.insert(TimerAction::new(
        6,
        0,
        move |arena: &mut Arena| {
            if let Some(hs) = arena.house_savings_mut(house) {
                hs.stop(true);
            }
        },
        true,
    ));

    if let Some(hs) = arena.house_savings(house) {
        println!("House savings contract:\n{}\n", hs.get_description());
    }
    if let Some(c) = arena.credit(loan) {
        println!("Car loan:\n{}\n", c.get_description());
    }

    let mut scheduler = Scheduler::new(
        arena,
        vec![stop_house],
        vec![checking, reserve, loan, house_delayed],
        vec![salary, living, loan_rate, house_delayed_payment],
    );
    if let Some(date) = args.start_date {
        scheduler = scheduler.with_start_date(date);
    }

    let series = scheduler.run(args.years);

    // Print the first two years of the checking series
    println!("{:>10} {:>14}", "Month", "Checking");
    println!("{}", "-".repeat(25));
    for sample in series["checking"].iter().take(24) {
        println!("{:>10} {:>14}", sample.date, money(sample.value));
    }
    if series["checking"].len() > 24 {
        println!("... ({} more months)", series["checking"].len() - 24);
    }

    // Entity summaries
    let arena = scheduler.arena();
    for (label, id) in [
        ("checking", checking),
        ("reserve", reserve),
        ("car loan", loan),
        ("house savings", house_delayed),
    ] {
        if let Some(summary) = arena.summary(id) {
            println!("\n{label}:");
            for line in summary.lines() {
                println!("  {line}");
            }
        }
    }

    if let Some(path) = &args.json {
        let file = File::create(path)
            .with_context(|| format!("unable to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &series)?;
        println!("\nFull results written to: {}", path.display());
    }

    if let Some(path) = &args.csv {
        write_csv(path, &series)?;
        println!("\nFull results written to: {}", path.display());
    }

    Ok(())
}

fn write_csv(path: &Path, series: &TimeSeries) -> anyhow::Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("unable to create {}", path.display()))?;

    writeln!(file, "Series,Date,Value")?;
    for (name, samples) in series {
        for sample in samples {
            writeln!(file, "{},{},{:.8}", name, sample.date, sample.value)?;
        }
    }

    Ok(())
}
