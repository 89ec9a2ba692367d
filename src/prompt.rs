use anyhow::Result;
use dialoguer::Confirm;

/// Yes/no confirmation shown before destructive actions.
#[mockall::automock]
pub trait ConfirmPrompt: Send + Sync {
    /// Prints `message` and asks whether to continue. Returns whether the
    /// user accepted.
    fn confirm(&self, message: &str) -> Result<bool>;
}

pub struct TerminalPrompt {
    /// Wired to the global --quiet flag.
    pub assume_yes: bool,
}

impl ConfirmPrompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        println!("{message}");
        let accepted = Confirm::new()
            .with_prompt("Do you want to continue?")
            .default(true)
            .interact()?;
        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_mode_skips_the_prompt() {
        let prompt = TerminalPrompt { assume_yes: true };
        assert!(prompt.confirm("anything").unwrap());
    }
}
