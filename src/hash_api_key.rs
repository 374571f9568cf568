//! Prints the Argon2 hash to put in `OWNER_API_KEY_HASH`.
//!
//! Usage: `hash-api-key <api key>`

use color_eyre::eyre::{Result, eyre};
use slotbook_api::middleware::auth::hash_api_key;

fn main() -> Result<()> {
    color_eyre::install()?;

    let key = std::env::args()
        .nth(1)
        .ok_or_else(|| eyre!("usage: hash-api-key <api key>"))?;

    println!("{}", hash_api_key(&key)?);

    Ok(())
}
