use ebs_core::calendar::CompletionWalker;
use ebs_core::time;

use super::Context;

/// Print "yes" or "no" for `date` under the configured weekend.
pub fn workday(date: &str, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let config = ctx.load_config()?;
    let range = config.time.range.range();
    let date = time::parse_in(date, &range)?;
    let calendar = config.weekday_calendar(date)?;
    println!("{}", if calendar.is_work_day(&date) { "yes" } else { "no" });
    Ok(())
}

/// Print the completion date for `seconds` of work starting at `start`.
pub fn complete(start: &str, seconds: i64, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let config = ctx.load_config()?;
    let range = config.time.range.range();
    let start = time::parse_in(start, &range)?;
    let calendar = config.weekday_calendar(start)?;
    let done = CompletionWalker::new(&calendar, config.calendar.seconds_per_workday)
        .with_max_days(config.calendar.max_days)
        .completion_date(&start, seconds)?;
    println!("{done}");
    Ok(())
}
