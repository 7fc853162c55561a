// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Standard error enum for sequencer operations.

/// Standard errors returned by power sequencing operations.
///
/// There are no success cases here; operations return
/// `Result<(), ErrorCode>`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(usize)]
pub enum ErrorCode {
    /// Generic failure condition
    FAIL = 0,
    /// Underlying system is busy; retry
    BUSY = 1,
    /// The state requested is already set
    ALREADY = 2,
    /// The component is powered down
    OFF = 3,
    /// An invalid parameter was passed
    INVAL = 5,
    /// Operation or command is unsupported
    NOSUPPORT = 9,
    /// Device does not exist
    NODEVICE = 10,
    /// Hardware handshake not acknowledged within its timeout
    NOACK = 12,
}

impl From<ErrorCode> for usize {
    fn from(err: ErrorCode) -> usize {
        err as usize
    }
}

/// Status word reported to the platform firmware on success.
pub const STATUS_SUCCESS: u32 = 0;
/// Status word reported to the platform firmware on a generic failure.
pub const STATUS_FAILURE: u32 = 1;
/// Status word reported to the platform firmware for a bad argument.
pub const STATUS_INVALID_PARAM: u32 = 15;

/// Convert a `Result<(), ErrorCode>` into the status word expected by the
/// platform firmware on the other side of the inter-processor interface.
///
/// | Result                    | Status word            |
/// |---------------------------|------------------------|
/// | `Ok(())`                  | `STATUS_SUCCESS`       |
/// | `Err(ErrorCode::INVAL)`   | `STATUS_INVALID_PARAM` |
/// | any other `Err`           | `STATUS_FAILURE`       |
pub fn into_status(r: Result<(), ErrorCode>) -> u32 {
    match r {
        Ok(()) => STATUS_SUCCESS,
        Err(ErrorCode::INVAL) => STATUS_INVALID_PARAM,
        Err(_) => STATUS_FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_words() {
        assert_eq!(into_status(Ok(())), STATUS_SUCCESS);
        assert_eq!(into_status(Err(ErrorCode::INVAL)), STATUS_INVALID_PARAM);
        assert_eq!(into_status(Err(ErrorCode::NOACK)), STATUS_FAILURE);
        assert_eq!(usize::from(ErrorCode::NOACK), 12);
    }
}
