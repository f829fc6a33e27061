use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::error::IoError;
use crate::storage::AccountBalance;

/// Write account balances to CSV format
pub async fn write_balances<W>(balances: &[AccountBalance], mut writer: W) -> Result<(), IoError>
where
    W: AsyncWrite + Unpin + Send,
{
    writer.write_all(b"account,currency,balance\n").await?;

    for balance in balances {
        let line = format!(
            "{},{},{}\n",
            balance.account, balance.currency, balance.balance
        );
        writer.write_all(line.as_bytes()).await?;
    }

    writer.flush().await?;
    Ok(())
}
