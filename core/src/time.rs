use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};

/// Parses the due-date inputs the front-ends accept: `today`,
/// `tomorrow`, relative offsets (`+3d`, `+2w`) and ISO dates. Dates
/// resolve to end of day local time, converted to UTC.
pub fn parse_human_date(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    let today = Local::now().date_naive();

    match input.to_lowercase().as_str() {
        "today" | "tod" => return end_of_day(today),
        "tomorrow" | "tom" => return end_of_day(today + Duration::days(1)),
        _ => {}
    }

    if let Some(rest) = input.strip_prefix('+') {
        // Split the unit off as a char, not a byte, so inputs ending
        // in a multi-byte character parse-fail instead of panicking.
        let mut chars = rest.chars();
        let unit = chars
            .next_back()
            .ok_or_else(|| anyhow!("Invalid relative date: {}", input))?;
        let count: i64 = chars
            .as_str()
            .parse()
            .map_err(|_| anyhow!("Invalid relative date: {}", input))?;
        let target = match unit {
            'd' => today + Duration::days(count),
            'w' => today + Duration::weeks(count),
            _ => return Err(anyhow!("Unknown unit in relative date: {}", unit)),
        };
        return end_of_day(target);
    }

    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
        if let Some(local) = Local.from_local_datetime(&dt).earliest() {
            return Ok(local.with_timezone(&Utc));
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return end_of_day(d);
    }

    Err(anyhow!("Could not parse date: {}", input))
}

fn end_of_day(date: NaiveDate) -> Result<DateTime<Utc>> {
    let local_dt = date
        .and_hms_opt(23, 59, 59)
        .ok_or_else(|| anyhow!("Invalid date: {}", date))?;
    Local
        .from_local_datetime(&local_dt)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| anyhow!("Ambiguous local time for date: {}", date))
}
