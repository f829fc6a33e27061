use ledger::prelude::*;

#[tokio::main]
async fn main() {
    CliApp::new("ledger").run(run_replay).await
}

struct Args {
    transfers: String,
    config: Option<String>,
}

/// Parse and validate command-line arguments
fn parse_args(args: Vec<String>) -> Result<Args, AppError> {
    match args.as_slice() {
        [_, transfers] => Ok(Args {
            transfers: transfers.clone(),
            config: None,
        }),
        [_, transfers, config] => Ok(Args {
            transfers: transfers.clone(),
            config: Some(config.clone()),
        }),
        _ => Err(AppError::InvalidArguments(
            "Usage: ledger <transfers.csv> [config.json]".to_string(),
        )),
    }
}

/// Replay the transfer file and write every account balance to stdout
async fn run_replay(
    mut stdout: tokio::io::BufWriter<tokio::io::Stdout>,
) -> Result<(), AppError> {
    let args = parse_args(std::env::args().collect())?;
    let config = match &args.config {
        Some(path) => LedgerConfig::from_file(path).await?,
        None => LedgerConfig::default(),
    };
    init_tracing(&config.log_filter)?;

    let transfers = CsvTransferStream::from_file(&args.transfers).await?;
    replay(transfers, &mut stdout, &config).await?;

    Ok(())
}
