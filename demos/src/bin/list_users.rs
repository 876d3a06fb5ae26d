//! Lists UAA users matching a name prefix.
//!
//! # Running
//!
//! ```bash
//! # Client credentials grant (needs scim.read)
//! export UAA_URL="https://login.example.com/uaa"
//! export UAA_CLIENT_ID="admin"
//! export UAA_CLIENT_SECRET="adminsecret"
//!
//! cargo run -p uaa-demos --bin list_users -- adm
//! ```
//!
//! Set `UAA_USER_ID` and `UAA_PASSWORD` as well to use the password grant.
//! `RUST_LOG=uaa=debug` shows the requests made.

use std::env;

use uaa::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let prefix = env::args().nth(1).unwrap_or_default();

    // URL and credentials come from UAA_* variables
    let client = UaaClient::from_env()?;
    println!("connected to {} using the {} grant", client.url(), client.token_manager().grant_type()?);

    // Active users whose name starts with the prefix, 20 per page
    let mut start = 1;
    loop {
        let mut builder = FilterRequestBuilder::new();
        builder.equals("active", true)?;
        if !prefix.is_empty() {
            builder.starts_with("userName", prefix.as_str())?;
        }
        let request = builder.attributes(["id", "userName", "emails"])?.start(start)?.count(20)?.build()?;

        let page = client.users().list(&request).await?;
        for user in &page.resources {
            println!(
                "{:<40} {:<24} {}",
                user.id.as_deref().unwrap_or("-"),
                user.user_name,
                user.primary_email().unwrap_or("-")
            );
        }

        if !page.has_more() || page.is_empty() {
            println!("\n{} user(s) found", page.total_results);
            break;
        }
        start += page.len() as u32;
    }

    Ok(())
}
