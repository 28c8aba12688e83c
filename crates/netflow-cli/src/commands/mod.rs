pub mod schema;
pub mod solve;
pub mod validate;

use netflow_core::NetflowError;

/// Print the offending rows of an integrity failure to stderr.
pub fn report_integrity(err: &NetflowError) {
    if let NetflowError::Integrity { check, failures } = err {
        eprintln!("{check}: {} failing row(s)", failures.len());
        for failure in failures {
            eprintln!("  {failure}");
        }
    }
}
