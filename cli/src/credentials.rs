// Copyright (c) 2026 Contract Checker Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Credential acquisition
//!
//! Fills controller URL, username and password that neither the config file
//! nor the environment supplied by asking on the terminal.
//!
//! # Architecture
//!
//! - **Layer:** Interface / Presentation Layer
//! - **Purpose:** Interactive completion of [`CheckerConfig`]

use anyhow::{Context, Result};
use checker_core::config::CheckerConfig;
use dialoguer::{Input, Password};

pub trait Prompter {
    fn input(&self, prompt: &str) -> Result<String>;
    fn password(&self, prompt: &str) -> Result<String>;
}

pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn input(&self, prompt: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .interact_text()
            .with_context(|| format!("Failed to read {}", prompt))
    }

    fn password(&self, prompt: &str) -> Result<String> {
        Password::new()
            .with_prompt(prompt)
            .interact()
            .with_context(|| format!("Failed to read {}", prompt))
    }
}

fn missing(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

/// Prompt for every missing controller credential.
pub fn complete(config: &mut CheckerConfig, prompter: &dyn Prompter) -> Result<()> {
    let controller = &mut config.controller;
    if missing(&controller.url) {
        controller.url = Some(prompter.input("APIC URL")?);
    }
    if missing(&controller.username) {
        controller.username = Some(prompter.input("Username")?);
    }
    if missing(&controller.password) {
        controller.password = Some(prompter.password("Password")?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Scripted {
        asked: RefCell<Vec<String>>,
    }

    impl Prompter for Scripted {
        fn input(&self, prompt: &str) -> Result<String> {
            self.asked.borrow_mut().push(prompt.to_string());
            Ok(format!("{}-answer", prompt))
        }

        fn password(&self, prompt: &str) -> Result<String> {
            self.asked.borrow_mut().push(prompt.to_string());
            Ok("hunter2".to_string())
        }
    }

    #[test]
    fn test_prompts_only_for_missing_values() {
        let mut config = CheckerConfig::default();
        config.controller.url = Some("apic.lab.local".into());
        config.controller.username = Some("  ".into());

        let prompter = Scripted::default();
        complete(&mut config, &prompter).unwrap();

        assert_eq!(*prompter.asked.borrow(), vec!["Username", "Password"]);
        assert_eq!(config.controller_url().as_deref(), Some("https://apic.lab.local"));
        assert_eq!(config.controller.username.as_deref(), Some("Username-answer"));
        assert_eq!(config.controller.password.as_deref(), Some("hunter2"));
    }

    #[test]
    fn test_complete_config_asks_nothing() {
        let mut config = CheckerConfig::default();
        config.controller.url = Some("https://apic".into());
        config.controller.username = Some("admin".into());
        config.controller.password = Some("secret".into());

        let prompter = Scripted::default();
        complete(&mut config, &prompter).unwrap();
        assert!(prompter.asked.borrow().is_empty());
    }
}
