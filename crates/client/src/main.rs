use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use uuid::Uuid;

/// Fires concurrent signing requests at a running service to demonstrate
/// that one device hands out gapless, duplicate-free counter values.
#[derive(Parser)]
#[command(about = "Concurrency exerciser for the signature device service")]
struct Args {
    #[clap(long, default_value = "127.0.0.1")]
    host: String,
    #[clap(long, default_value = "8080")]
    port: u16,
    /// Number of concurrent signing tasks
    #[clap(long, default_value = "2")]
    tasks: u32,
    /// Signing requests per task
    #[clap(long, default_value = "100")]
    requests: u32,
}

#[derive(Serialize)]
struct CreateSignatureDeviceRequest {
    id: String,
    algorithm: String,
    label: String,
}

#[derive(Serialize)]
struct SignTransactionRequest {
    data: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let base_url = format!("http://{}:{}/api/v0", args.host, args.port);
    let client = reqwest::Client::new();

    let device_id = Uuid::new_v4().to_string();
    println!("creating device (id: {device_id})");
    client
        .post(format!("{base_url}/signature_devices"))
        .json(&CreateSignatureDeviceRequest {
            id: device_id.clone(),
            algorithm: "RSA".to_string(),
            label: "my rsa key".to_string(),
        })
        .send()
        .await?
        .error_for_status()
        .context("creating signature device")?;

    let mut handles = Vec::new();
    for task in 0..args.tasks {
        let client = client.clone();
        let base_url = base_url.clone();
        let device_id = device_id.clone();
        let requests = args.requests;

        handles.push(tokio::spawn(async move {
            for i in 0..requests {
                println!("task {task}: sending request {i}");
                client
                    .post(format!("{base_url}/signature_devices/{device_id}/signatures"))
                    .json(&SignTransactionRequest {
                        data: format!("some-data-{task}-{i}"),
                    })
                    .send()
                    .await?
                    .error_for_status()
                    .context("signing transaction")?;
            }
            anyhow::Ok(())
        }));
    }

    for handle in handles {
        handle.await??;
    }

    let device: serde_json::Value = client
        .get(format!("{base_url}/signature_devices/{device_id}"))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    println!(
        "final signature counter: {}",
        device["data"]["signature_counter"]
    );

    Ok(())
}
