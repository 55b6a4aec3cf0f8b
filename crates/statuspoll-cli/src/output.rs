use serde::Serialize;
use statuspoll_core::ApplicationReport;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_report(report: &ApplicationReport, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(report);
    }

    println!("application:  {}", report.identifier);
    println!("status:       {}", report.status);
    println!("description:  {}", report.description);
    println!(
        "last request: {}",
        report.last_request_time.format("%Y-%m-%d %H:%M:%S UTC")
    );
    match report.retries_count {
        Some(count) => println!("retries:      {}", count),
        None => println!("retries:      -"),
    }
    Ok(())
}
