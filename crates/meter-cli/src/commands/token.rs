//! Credential management commands.
//!
//! `meter token create` - Issue a credential and print its secret once.
//! `meter token list`   - List credential metadata, newest first.
//! `meter token revoke` - Revoke a credential by id.

use anyhow::Context;
use std::sync::Arc;
use uuid::Uuid;

use meter_adapter_sqlite::SqliteStore;
use meter_auth::{CredentialService, IssueRequest};

async fn open_service(database: &str) -> anyhow::Result<CredentialService> {
    let store = SqliteStore::open(database)
        .await
        .with_context(|| format!("failed to open credential database at {database}"))?;
    Ok(CredentialService::new(Arc::new(store)))
}

/// Issue a new credential. Validation failures (unknown grants, bad
/// expiration) abort before anything is written.
pub async fn create(
    database: &str,
    name: String,
    grants: String,
    expires: Option<String>,
) -> anyhow::Result<()> {
    let service = open_service(database).await?;
    let grants: Vec<String> = grants
        .split(',')
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
        .collect();

    let issued = service
        .issue(IssueRequest {
            name,
            grants,
            expires_in: expires,
        })
        .await?;
    let credential = &issued.credential;

    println!("Generated API credential:");
    println!("  Token:  {}", issued.secret);
    println!("  Id:     {}", credential.id);
    println!("  Name:   {}", credential.name);
    println!("  Grants: {}", credential.grants);
    match credential.expires_at {
        Some(at) => println!("  Expires: {at}"),
        None => println!("  Expires: never"),
    }
    println!();
    println!("✔ Store this token now - it cannot be retrieved again.");
    println!();
    println!("Example requests:");
    println!(
        "  curl -H 'X-API-Key: {}' http://localhost:8082/api/health",
        issued.secret
    );
    println!(
        "  curl -H 'Authorization: Bearer {}' http://localhost:8082/api/insights/usage",
        issued.secret
    );

    Ok(())
}

/// Print credential metadata, newest first. Secrets are not recoverable and
/// never shown here.
pub async fn list(database: &str) -> anyhow::Result<()> {
    let service = open_service(database).await?;
    let credentials = service.list().await?;

    if credentials.is_empty() {
        println!("No credentials issued.");
        return Ok(());
    }

    for credential in credentials {
        let status = if credential.active { "active" } else { "revoked" };
        println!(
            "{}  {:<24}  {:<7}  [{}]",
            credential.id, credential.name, status, credential.grants
        );
        println!(
            "    created {}  last used {}  expires {}",
            credential.created_at,
            credential
                .last_used
                .map(|t| t.to_string())
                .unwrap_or_else(|| "never".to_string()),
            credential
                .expires_at
                .map(|t| t.to_string())
                .unwrap_or_else(|| "never".to_string()),
        );
    }

    Ok(())
}

/// Revoke a credential by id. Irreversible.
pub async fn revoke(database: &str, id: &str) -> anyhow::Result<()> {
    let service = open_service(database).await?;
    let id = Uuid::parse_str(id).context("credential id must be a UUID")?;

    if service.revoke(id).await? {
        println!("✔ Credential {id} revoked.");
        Ok(())
    } else {
        anyhow::bail!("no credential with id {id}")
    }
}
