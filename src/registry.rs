//! Check registry applicability: which configured checks run for a given
//! staged file set, and with which matched files.

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use vibegate_config::{CheckSpec, FilePredicate};

/// A check that will run this invocation, with the staged files its
/// predicate matched. Whole-tree (`always`) checks carry no matched files.
#[derive(Debug, Clone)]
pub struct ApplicableCheck {
    pub spec: CheckSpec,
    pub matched: Vec<Utf8PathBuf>,
}

/// Evaluate every check's applicability predicate against the staged set.
///
/// Predicates are independent; a file may be matched by several checks.
/// `always` checks appear regardless of the staged set. File-scoped checks
/// with zero matches still appear so the runner can report them Skipped,
/// keeping the result count equal to the check count.
///
/// Inputs are sorted before matching and the output is ordered by check id,
/// so the applicable set is identical across runs for identical inputs.
pub fn applicable_checks(
    checks: &[CheckSpec],
    staged: &[Utf8PathBuf],
) -> Result<Vec<ApplicableCheck>> {
    let mut staged: Vec<Utf8PathBuf> = staged.to_vec();
    staged.sort();

    let mut applicable = Vec::with_capacity(checks.len());
    for spec in checks {
        let matched = match &spec.files {
            FilePredicate::Always => Vec::new(),
            FilePredicate::Any => staged.clone(),
            FilePredicate::Glob(pattern) => {
                let glob = globset::Glob::new(pattern)
                    .with_context(|| {
                        format!("invalid glob pattern '{pattern}' for check '{}'", spec.id)
                    })?
                    .compile_matcher();
                staged
                    .iter()
                    .filter(|path| glob.is_match(path.as_std_path()))
                    .cloned()
                    .collect()
            }
        };

        applicable.push(ApplicableCheck {
            spec: spec.clone(),
            matched,
        });
    }

    applicable.sort_by(|a, b| a.spec.id.cmp(&b.spec.id));
    Ok(applicable)
}
