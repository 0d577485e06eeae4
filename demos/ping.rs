use eyewitness::{EyewitnessClient, Notification};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,eyewitness=debug".into()),
        )
        .init();

    let client = EyewitnessClient::from_env()?;

    let outcome = client.notify(Notification::TestPing).await;
    println!("test ping: {outcome:?}");

    let outcome = client
        .notify(Notification::SchedulerFinish {
            scheduler: "reports:nightly".to_owned(),
            data: json!({ "exit_code": 0, "runtime_seconds": 12 }),
        })
        .await;
    println!("scheduler finish: {outcome:?}");

    match client.check_dependency_lock().await {
        Some(report) => println!("advisories: {report}"),
        None => println!("dependency check unavailable"),
    }

    Ok(())
}
