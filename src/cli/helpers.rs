//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use chrono::NaiveDate;
use dialoguer::{theme::ColorfulTheme, Input};
use miette::{IntoDiagnostic, Result};

use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::service::TrackService;
use crate::core::token::VerificationToken;
use crate::core::workspace::{Fingerprint, Workspace};

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Date cell text, "-" when unset
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn format_token(token: Option<&VerificationToken>) -> String {
    token
        .map(|t| t.to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Text for a `--verify` check result
pub fn describe_verification(result: Option<bool>) -> &'static str {
    match result {
        Some(true) => "valid",
        Some(false) => "does not match record",
        None => "cannot be checked",
    }
}

/// Locate the workspace named by `--workspace`, or search upward from cwd
pub fn locate_workspace(global: &GlobalOpts) -> Result<Workspace> {
    let ws = match &global.workspace {
        Some(dir) => Workspace::discover_from(dir)?,
        None => Workspace::discover()?,
    };
    Ok(ws)
}

/// Effective config for logging and commands that need no records
///
/// Falls back to user-level config when outside a workspace.
pub fn load_config(global: &GlobalOpts) -> Result<Config> {
    let ws = locate_workspace(global).ok();
    let config = Config::load(ws.as_ref().map(|w| w.root()))?;
    Ok(config)
}

/// A workspace opened for a single command
pub struct Session {
    pub workspace: Workspace,
    pub config: Config,
    pub service: TrackService,
    read: Fingerprint,
}

impl Session {
    pub fn open(global: &GlobalOpts) -> Result<Self> {
        let workspace = locate_workspace(global)?;
        let config = workspace.config()?;
        let (service, read) = workspace.open_service(&config)?;
        Ok(Self {
            workspace,
            config,
            service,
            read,
        })
    }

    /// Write the records back, unless another command saved since `open`
    pub fn save(&self) -> Result<()> {
        self.workspace.save(&self.service, &self.read)?;
        Ok(())
    }
}

/// Use `value` if given, otherwise prompt (required)
pub fn prompt_required(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Input::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .interact_text()
            .into_diagnostic(),
    }
}

/// Use `value` if given, otherwise prompt (empty answer is `None`)
pub fn prompt_optional(value: Option<String>, prompt: &str) -> Result<Option<String>> {
    if value.is_some() {
        return Ok(value);
    }
    let answer: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("{} (optional)", prompt))
        .allow_empty(true)
        .interact_text()
        .into_diagnostic()?;
    Ok(Some(answer).filter(|a| !a.trim().is_empty()))
}
