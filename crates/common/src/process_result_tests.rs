// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn skipped_phase_counts_as_success() {
    assert!(ProcessResult::skipped().succeeded());
}

#[test]
fn infra_failure_is_nonzero() {
    let r = ProcessResult::infra_failure("Language not found");
    assert!(!r.succeeded());
    assert_eq!(r.exit_code, 1);
    assert_eq!(r.combined, "Language not found");
}
