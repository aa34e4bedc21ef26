use lp_api_types::AccountAddress;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProgramError {
    #[error("storage account {0} does not exist")]
    AccountNotFound(AccountAddress),
    #[error("program rejected the request: {0}")]
    Rejected(String),
    #[error("remote call failed: {0}")]
    Transport(String),
    #[error("malformed account data: {0}")]
    Decode(String),
    #[error("link cannot be empty")]
    EmptyLink,
}

const NOT_FOUND_MARKERS: &[&str] = &["account does not exist", "could not find account"];

const REJECTED_MARKERS: &[&str] = &[
    "already in use",
    "custom program error",
    "simulation failed",
    "user rejected",
    "insufficient funds",
];

const DECODE_MARKERS: &[&str] = &["discriminator", "deserialize", "decode"];

impl ProgramError {
    /// Map a runtime error message onto the taxonomy. Only an explicit
    /// missing-account message becomes `AccountNotFound`.
    pub fn classify(message: &str, account: &AccountAddress) -> Self {
        let lowered = message.to_ascii_lowercase();
        let has = |markers: &[&str]| markers.iter().any(|m| lowered.contains(m));

        if has(NOT_FOUND_MARKERS) {
            ProgramError::AccountNotFound(account.clone())
        } else if has(REJECTED_MARKERS) {
            ProgramError::Rejected(message.to_owned())
        } else if has(DECODE_MARKERS) {
            ProgramError::Decode(message.to_owned())
        } else {
            ProgramError::Transport(message.to_owned())
        }
    }

    pub fn is_account_not_found(&self) -> bool {
        matches!(self, ProgramError::AccountNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lp_api_types::SYSTEM_PROGRAM_ID;

    fn account() -> AccountAddress {
        AccountAddress(SYSTEM_PROGRAM_ID.to_owned())
    }

    #[test]
    fn missing_account_messages_are_distinguished() {
        let err = ProgramError::classify(
            "Account does not exist or has no data 7xKX...",
            &account(),
        );
        assert!(err.is_account_not_found());
        assert!(ProgramError::classify("Could not find account", &account()).is_account_not_found());
    }

    #[test]
    fn network_failures_never_look_like_missing_accounts() {
        let err = ProgramError::classify("TypeError: Failed to fetch", &account());
        assert_eq!(err, ProgramError::Transport("TypeError: Failed to fetch".to_owned()));
        assert!(!err.is_account_not_found());
    }

    #[test]
    fn reinitialisation_is_a_rejection() {
        let err = ProgramError::classify(
            "Transaction simulation failed: Allocate: account Address { .. } already in use",
            &account(),
        );
        assert!(matches!(err, ProgramError::Rejected(_)));
    }

    #[test]
    fn bad_account_data_is_a_decode_error() {
        let err = ProgramError::classify("Invalid account discriminator", &account());
        assert!(matches!(err, ProgramError::Decode(_)));
    }
}
