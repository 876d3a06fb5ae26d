//! Creates a group, maps an LDAP group onto it, then removes both.
//!
//! # Running
//!
//! ```bash
//! # Needs scim.write and scim.read
//! export UAA_URL="https://login.example.com/uaa"
//! export UAA_CLIENT_ID="admin"
//! export UAA_CLIENT_SECRET="adminsecret"
//!
//! cargo run -p uaa-demos --bin group_mapping -- "cn=analysts,ou=groups,dc=example,dc=com"
//! ```

use std::env;

use uaa::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let external_group = env::args()
        .nth(1)
        .ok_or_else(|| Error::invalid_argument("usage: group_mapping <external group DN>"))?;

    let client = UaaClient::from_env()?;
    let groups = client.groups();

    let group = groups.create(&UaaGroup::new("demo.reports")).await?;
    let group_id = group.id.clone().unwrap_or_default();
    println!("created group {} ({})", group.display_name, group_id);

    let renamed = groups.update_name(&group_id, "demo.reports.read").await?;
    println!("renamed to {}", renamed.display_name);

    let mapping = groups.create_mapping(MappingIdentifier::GroupId, &group_id, &external_group).await?;
    println!("mapped {} -> {}", mapping.external_group, renamed.display_name);

    let request = FilterRequestBuilder::new().equals("groupId", group_id.as_str())?.build()?;
    let mappings = groups.list_mappings(&request).await?;
    println!("{} mapping(s) for the group", mappings.total_results);

    groups.delete_mapping(&mapping).await?;
    groups.delete(&group_id).await?;
    println!("cleaned up");

    Ok(())
}
