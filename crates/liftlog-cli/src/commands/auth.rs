//! Account and session command handlers

use anyhow::{bail, Result};

use liftlog_core::ApiClient;

use crate::output::Output;

/// Register a new account and start a session
pub async fn register(
    api: &ApiClient,
    email: Option<String>,
    password: Option<String>,
    output: &Output,
) -> Result<()> {
    let email = match email {
        Some(e) => e,
        None => prompt("Email")?,
    };
    let password = match password {
        Some(p) => p,
        None => prompt("Password (min 6 characters)")?,
    };

    if let Err(e) = api.register(&email, &password).await {
        // The server reports validation problems as a message list
        for msg in e.messages() {
            eprintln!("{}", msg);
        }
        bail!("Registration failed");
    }

    output.success(&format!("Registered as {}", email));
    Ok(())
}

/// End the current session
pub async fn logout(api: &ApiClient, output: &Output) -> Result<()> {
    api.logout().await?;
    output.success("Logged out");
    Ok(())
}

/// Check whether the saved session is still valid
pub async fn whoami(api: &ApiClient, output: &Output) -> Result<()> {
    match api.me().await {
        Ok(()) => {
            output.message("Authenticated.");
            Ok(())
        }
        Err(e) if e.is_unauthorized() => {
            bail!("Not logged in. Run `liftlog register` first.");
        }
        Err(e) => Err(e.into()),
    }
}

/// Read one line from stdin
fn prompt(label: &str) -> Result<String> {
    use std::io::{self, Write};

    print!("{}: ", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
