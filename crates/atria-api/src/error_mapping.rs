// SPDX-License-Identifier: Apache-2.0

use atria_core::ErrorKind;

/// HTTP status for each failure kind. `Dependency` is deliberately a
/// generic 500; the detail is logged server-side, not leaked to callers.
#[must_use]
pub fn status_for(kind: ErrorKind) -> u16 {
    match kind {
        ErrorKind::Validation | ErrorKind::InvalidState => 400,
        ErrorKind::Forbidden => 403,
        ErrorKind::NotFound => 404,
        ErrorKind::Conflict => 409,
        _ => 500,
    }
}
