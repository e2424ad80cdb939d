//! External programs: editor, opener, pager.
//!
//! The core never looks these up itself. A [`Launcher`] is built once at
//! startup (see [`crate::init`]) and handed to the operations that need it.
//! Closures implement the trait too, which is how tests stand in for an
//! interactive editor.

use crate::error::{Result, SnipzError};
use std::process::Command;

/// Runs some program against a target path or URL and waits for it.
pub trait Launcher {
    fn invoke(&self, target: &str) -> Result<()>;
}

impl<F> Launcher for F
where
    F: Fn(&str) -> Result<()>,
{
    fn invoke(&self, target: &str) -> Result<()> {
        self(target)
    }
}

/// A program parsed from a command string such as `"code --wait"`.
/// The target is appended after the base arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLauncher {
    program: String,
    args: Vec<String>,
}

impl CommandLauncher {
    pub fn parse(command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| SnipzError::Config("command is empty".to_string()))?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Launcher for CommandLauncher {
    fn invoke(&self, target: &str) -> Result<()> {
        log::debug!("launching {} {:?} {}", self.program, self.args, target);

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(target)
            .status()
            .map_err(|e| SnipzError::Launch(format!("failed to launch '{}': {}", self.program, e)))?;

        if !status.success() {
            return Err(SnipzError::Launch(format!(
                "'{}' exited with {}",
                self.program, status
            )));
        }
        Ok(())
    }
}
