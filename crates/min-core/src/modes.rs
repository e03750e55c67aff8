//! Modal and focus mode
//!
//! While a modal dialog is open, commands are dropped without feedback.
//! Focus mode locks the user into the current tab; commands that would open
//! or switch tabs are refused with a warning.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modes {
    pub modal: bool,
    pub focus: bool,
}

/// What to do with a command under the current modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Allow,
    /// Drop the command silently
    Ignore,
    /// Drop the command and tell the user why
    Warn,
}

impl Modes {
    /// Modal mode wins over focus mode
    pub fn guard(&self) -> Guard {
        if self.modal {
            Guard::Ignore
        } else if self.focus {
            Guard::Warn
        } else {
            Guard::Allow
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard() {
        assert_eq!(Modes::default().guard(), Guard::Allow);
        assert_eq!(Modes { modal: false, focus: true }.guard(), Guard::Warn);
        assert_eq!(Modes { modal: true, focus: true }.guard(), Guard::Ignore);
    }
}
