use clap::Args;
use ebs_core::collab::{select, AcceptAll, Contains};
use ebs_core::{Clock, Forecaster, NameFilter, SystemClock, TomlWorkSheet, WorkItemSource};
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;

use super::Context;

#[derive(Args)]
pub struct GuessArgs {
    /// Only forecast tasks whose name contains this text
    pub filter: Option<String>,

    /// Seed the simulation for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the forecast as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: GuessArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let config = ctx.load_config()?;
    let items = TomlWorkSheet::in_dir(&ctx.dir).load()?;
    let filter: Box<dyn NameFilter> = match args.filter {
        Some(needle) => Box::new(Contains(needle)),
        None => Box::new(AcceptAll),
    };
    let items = select(items, filter.as_ref());

    let mut rng = match args.seed {
        Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
        None => Mcg128Xsl64::from_entropy(),
    };

    let clock = SystemClock;
    let calendar = config.weekday_calendar(clock.now()?)?;
    let forecast = Forecaster::with_settings(config.forecast_settings())
        .forecast_now(&items, &calendar, &clock, &mut rng)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&forecast)?);
        return Ok(());
    }

    let sigma = config.forecast.sigma_level;
    println!("low (-{sigma} sigma): {}", forecast.low);
    println!("mean completion time: {}", forecast.mean);
    println!("high (+{sigma} sigma): {}", forecast.high);
    Ok(())
}
