//! Per-transaction verdicts from the state validator.
//!
//! The validator callback judges whether transactions would succeed against
//! current chain state. Verdict shapes are heterogeneous in practice, so
//! failures carry a list of structured errors and the pool pattern-matches
//! on them; the only signal it interprets is a nonce mismatch.

/// A single validation error inside a FAIL verdict.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerdictError {
    /// Path of the offending field, e.g. `.nonce`
    pub data_path: String,
    /// Observed value, rendered as text
    pub actual: String,
    /// Expected value, rendered as text
    pub expected: String,
}

impl VerdictError {
    /// Convenience constructor for a nonce mismatch error.
    pub fn nonce_mismatch(actual: u64, expected: u64) -> Self {
        VerdictError {
            data_path: ".nonce".to_string(),
            actual: actual.to_string(),
            expected: expected.to_string(),
        }
    }
}

/// Validator verdict for one transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TxVerdict {
    /// The transaction would apply cleanly against current state
    Ok,
    /// The transaction failed validation
    Fail(Vec<VerdictError>),
}

impl TxVerdict {
    /// True for [`TxVerdict::Ok`].
    pub fn is_ok(&self) -> bool {
        matches!(self, TxVerdict::Ok)
    }

    /// True when the failure carries a nonce mismatch.
    ///
    /// A nonce mismatch means the transaction is not applicable *yet*; the
    /// pool keeps it as unprocessable instead of rejecting it.
    pub fn has_nonce_mismatch(&self) -> bool {
        match self {
            TxVerdict::Ok => false,
            TxVerdict::Fail(errors) => errors.iter().any(|e| e.data_path == ".nonce"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_verdict() {
        assert!(TxVerdict::Ok.is_ok());
        assert!(!TxVerdict::Ok.has_nonce_mismatch());
    }

    #[test]
    fn test_nonce_mismatch_detection() {
        let verdict = TxVerdict::Fail(vec![VerdictError::nonce_mismatch(9, 3)]);
        assert!(!verdict.is_ok());
        assert!(verdict.has_nonce_mismatch());
    }

    #[test]
    fn test_other_failure_is_not_nonce_mismatch() {
        let verdict = TxVerdict::Fail(vec![VerdictError {
            data_path: ".fee".to_string(),
            actual: "10".to_string(),
            expected: "100".to_string(),
        }]);
        assert!(!verdict.has_nonce_mismatch());
    }

    #[test]
    fn test_mixed_errors() {
        let verdict = TxVerdict::Fail(vec![
            VerdictError {
                data_path: ".balance".to_string(),
                actual: "0".to_string(),
                expected: "50".to_string(),
            },
            VerdictError::nonce_mismatch(4, 2),
        ]);
        assert!(verdict.has_nonce_mismatch());
    }
}
