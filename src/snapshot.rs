//! Decoding and validation of lease snapshots.

use std::path::Path;

use crate::date_math::{MAX_RENEWAL_YEARS, check_date_order, years_between};
use crate::error::Error;
use crate::model::LeaseSnapshot;

pub fn parse(path: &Path) -> Result<LeaseSnapshot, Error> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
            std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
        ),
        _ => Error::Io(e),
    })?;
    parse_bytes(&bytes)
}

pub fn parse_bytes(bytes: &[u8]) -> Result<LeaseSnapshot, Error> {
    let snapshot: LeaseSnapshot = serde_json::from_slice(bytes)
        .map_err(|e| Error::InvalidSnapshot(format!("malformed JSON: {e}")))?;
    validate(&snapshot)?;
    Ok(snapshot)
}

fn invalid(msg: impl Into<String>) -> Error {
    Error::InvalidSnapshot(msg.into())
}

/// Check the structural invariants of a snapshot.
pub fn validate(snapshot: &LeaseSnapshot) -> Result<(), Error> {
    let lease = &snapshot.lease;
    check_date_order(lease.start_date, lease.expiry_date)?;

    if snapshot.property.square_footage == 0 {
        return Err(invalid("property.squareFootage must be positive"));
    }
    if lease.term == 0 {
        return Err(invalid("lease.term must be positive"));
    }
    if !(lease.base_rent.is_finite() && lease.base_rent > 0.0) {
        return Err(invalid("lease.baseRent must be positive"));
    }
    if let Some(c) = lease
        .rent_components
        .iter()
        .find(|c| !(c.amount.is_finite() && c.amount >= 0.0))
    {
        return Err(invalid(format!(
            "rent component {:?} has a negative amount",
            c.kind
        )));
    }
    if let Some(e) = lease.escalations.iter().find(|e| e.year == 0 || e.amount <= 0.0) {
        return Err(invalid(format!(
            "escalation for year {} must have a positive year and amount",
            e.year
        )));
    }
    for pair in lease.escalations.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.year <= prev.year || next.amount <= prev.amount {
            return Err(invalid(format!(
                "escalations must increase in year and amount (year {} -> {})",
                prev.year, next.year
            )));
        }
    }
    if let Some(i) = lease.renewal_options.iter().position(|o| o.term == 0) {
        return Err(invalid(format!("renewal option {} has a zero term", i + 1)));
    }
    let renewal_years: u64 = lease
        .renewal_options
        .iter()
        .map(|o| u64::from(o.term))
        .sum();
    if renewal_years > MAX_RENEWAL_YEARS {
        return Err(invalid(format!(
            "renewal options total {renewal_years} years; at most {MAX_RENEWAL_YEARS} are supported"
        )));
    }

    let expected_term = years_between(lease.start_date, lease.expiry_date);
    if (expected_term - lease.term as f64).abs() > 1.0 {
        log::warn!(
            "lease.term is {} years but the dates span {:.2} years",
            lease.term,
            expected_term
        );
    }
    Ok(())
}
