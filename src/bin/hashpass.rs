// One-off helper for minting a PHC hash, e.g. to reset a seeded account
// directly in psql.

use hms_server::auth;

fn main() -> anyhow::Result<()> {
    let password = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("Usage: hashpass <password>"))?;
    let phc = auth::hash_password(&password).map_err(anyhow::Error::msg)?;
    println!("{phc}");
    Ok(())
}
