//! Watch schedule parsing.
//!
//! Accepts the forms the watcher understands:
//! - standard five-field cron (`*/30 * * * *`), day of week 0-7 with 0 and 7
//!   both Sunday
//! - six fields with a leading seconds field (`0 0 */6 * * *`)
//! - descriptors: `@yearly`, `@annually`, `@monthly`, `@weekly`, `@daily`,
//!   `@midnight`, `@hourly`
//! - fixed intervals: `@every 6h`

use cron::Schedule;
use std::str::FromStr;
use std::time::Duration;

/// A parsed watch schedule.
#[derive(Debug, Clone)]
pub enum WatchSchedule {
    Cron(Box<Schedule>),
    Every(Duration),
}

/// Parse a schedule expression, returning a human readable reason on failure.
pub fn parse_schedule(expr: &str) -> Result<WatchSchedule, String> {
    let expr = expr.trim();

    if let Some(interval) = expr.strip_prefix("@every") {
        let interval = interval.trim();
        let every = humantime::parse_duration(interval)
            .map_err(|e| format!("invalid @every interval {:?}: {}", interval, e))?;
        if every.is_zero() {
            return Err("@every interval must be greater than zero".to_string());
        }
        return Ok(WatchSchedule::Every(every));
    }

    let expanded = match expr {
        "@yearly" | "@annually" => "0 0 0 1 1 *".to_string(),
        "@monthly" => "0 0 0 1 * *".to_string(),
        "@weekly" => "0 0 0 * * 1".to_string(),
        "@daily" | "@midnight" => "0 0 0 * * *".to_string(),
        "@hourly" => "0 0 * * * *".to_string(),
        _ if expr.starts_with('@') => return Err(format!("unknown descriptor {:?}", expr)),
        _ => with_seconds(expr)?,
    };

    Schedule::from_str(&expanded)
        .map(|schedule| WatchSchedule::Cron(Box::new(schedule)))
        .map_err(|e| e.to_string())
}

/// Normalize five or six standard fields to the seconds-first layout of the
/// `cron` crate, whose weekdays run 1-7 from Sunday.
fn with_seconds(expr: &str) -> Result<String, String> {
    let mut fields: Vec<String> = expr.split_whitespace().map(str::to_string).collect();
    match fields.len() {
        5 => fields.insert(0, "0".to_string()),
        6 => {}
        n => return Err(format!("expected 5 or 6 fields, got {}", n)),
    }
    fields[5] = shift_weekdays(&fields[5]);
    Ok(fields.join(" "))
}

fn shift_weekdays(field: &str) -> String {
    field
        .split(',')
        .map(|item| {
            let (range, step) = match item.split_once('/') {
                Some((range, step)) => (range, Some(step)),
                None => (item, None),
            };
            let range = range
                .split('-')
                .map(|bound| match bound.parse::<u8>() {
                    Ok(day) if day <= 7 => (day % 7 + 1).to_string(),
                    _ => bound.to_string(),
                })
                .collect::<Vec<_>>()
                .join("-");
            match step {
                Some(step) => format!("{}/{}", range, step),
                None => range,
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}
