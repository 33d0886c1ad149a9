//! Branch policy evaluation.

use crate::types::BranchOutcome;

/// Evaluate the current branch against the protected set.
///
/// Matching is exact and case-sensitive. When the outcome is not allowed
/// the orchestrator short-circuits: no scanner is started and the verdict's
/// sole blocking reason names the branch.
#[must_use]
pub fn evaluate_branch(branch: &str, protected: &[String]) -> BranchOutcome {
    let is_protected = protected.iter().any(|p| p == branch);
    BranchOutcome {
        branch: branch.to_string(),
        protected: is_protected,
        allowed: !is_protected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn protected() -> Vec<String> {
        vec!["master".to_string(), "main".to_string()]
    }

    #[test]
    fn test_protected_branch_not_allowed() {
        let outcome = evaluate_branch("main", &protected());
        assert!(outcome.protected);
        assert!(!outcome.allowed);
        assert_eq!(outcome.branch, "main");
    }

    #[test]
    fn test_feature_branch_allowed() {
        let outcome = evaluate_branch("feature/login", &protected());
        assert!(!outcome.protected);
        assert!(outcome.allowed);
    }

    #[test]
    fn test_matching_is_exact_and_case_sensitive() {
        assert!(evaluate_branch("Main", &protected()).allowed);
        assert!(evaluate_branch("main2", &protected()).allowed);
        assert!(evaluate_branch("main/sub", &protected()).allowed);
    }

    #[test]
    fn test_empty_protected_set_allows_everything() {
        assert!(evaluate_branch("master", &[]).allowed);
    }
}
