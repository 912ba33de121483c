//! Account commands - register, login, logout, whoami

use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Input, Password};

use super::get_context;
use crate::output;
use poketeams_core::services::LoggingService;
use poketeams_core::Credentials;

fn prompt_credentials(
    username: Option<String>,
    password: Option<String>,
    confirm: bool,
) -> Result<Credentials> {
    let username = match username {
        Some(u) => u,
        None => Input::new().with_prompt("Username").interact_text()?,
    };
    let password = match password {
        Some(p) => p,
        None if confirm => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
        None => Password::new().with_prompt("Password").interact()?,
    };
    Ok(Credentials::new(username, password))
}

pub fn register(
    logger: &Option<Arc<LoggingService>>,
    username: Option<String>,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let mut ctx = get_context(logger)?;
    let credentials = prompt_credentials(username, password, true)?;
    let user = ctx.register(&credentials)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
    } else {
        output::success(&format!("Account created. Signed in as {}", user.username.bold()));
    }
    Ok(())
}

pub fn login(
    logger: &Option<Arc<LoggingService>>,
    username: Option<String>,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let mut ctx = get_context(logger)?;
    let credentials = prompt_credentials(username, password, false)?;
    let user = ctx.session.login(&credentials)?;
    let team_count = ctx.session.store().teams().len();

    if json {
        println!(
            "{}",
            serde_json::json!({ "user": user, "teams": team_count })
        );
    } else {
        output::success(&format!("Signed in as {}", user.username.bold()));
        println!("{}", format!("{} team(s) loaded", team_count).dimmed());
    }
    Ok(())
}

pub fn logout(logger: &Option<Arc<LoggingService>>) -> Result<()> {
    let mut ctx = get_context(logger)?;
    let was = ctx.session.current_user().map(|u| u.username.clone());
    ctx.session.logout()?;

    match was {
        Some(name) => output::success(&format!("Signed out {}", name)),
        None => println!("{}", "Not signed in".dimmed()),
    }
    Ok(())
}

pub fn whoami(logger: &Option<Arc<LoggingService>>, json: bool) -> Result<()> {
    let ctx = get_context(logger)?;
    let user = ctx.session.current_user();

    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
        return Ok(());
    }
    match user {
        Some(u) => println!("{} {}", u.username.bold(), format!("({})", u.id).dimmed()),
        None => output::info("Not signed in. Run 'pt login' or 'pt register'."),
    }
    Ok(())
}
