use anyhow::{anyhow, Result};
use model::AccountRole;
use rust_decimal::Decimal;
use tracing::{error, info, trace};
use workflow::{AccountDirectory, NewAccount};

use super::initdb::connect;

pub async fn create_account(
    database_url: &str,
    name: &str,
    role: &str,
    balance: Decimal,
) -> Result<()> {
    trace!("Entering create_account function");
    let role: AccountRole = role.parse().map_err(|e: String| anyhow!(e))?;

    let db = connect(database_url).await?;
    let directory = AccountDirectory::new(db);

    let account = match directory
        .bootstrap(NewAccount {
            name: name.to_string(),
            role,
            balance,
        })
        .await
    {
        Ok(account) => account,
        Err(e) => {
            error!("Failed to create account '{}': {}", name, e);
            return Err(e.into());
        }
    };

    info!(
        "Created {} account '{}' with id {} and balance {}",
        account.role, account.name, account.id, account.balance
    );
    println!("{}", account.id);
    Ok(())
}
