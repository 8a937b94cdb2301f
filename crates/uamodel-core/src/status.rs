// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! OPC UA status codes.
//!
//! A [`StatusCode`] is a 32-bit value whose two high bits carry the severity
//! (`00` good, `01` uncertain, `10` bad) and whose next fourteen bits carry the
//! sub-code. Only the codes produced or inspected by this workspace are given
//! names; any other value is still representable.
//!
//! # Examples
//!
//! ```
//! use uamodel_core::StatusCode;
//!
//! let status = StatusCode::BAD_TYPE_MISMATCH;
//! assert!(status.is_bad());
//! assert_eq!(status.name(), "Bad_TypeMismatch");
//! assert_eq!(status.to_string(), "Bad_TypeMismatch (0x80740000)");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// StatusCode
// =============================================================================

/// A 32-bit OPC UA status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(u32);

const SEVERITY_MASK: u32 = 0xC000_0000;
const SEVERITY_UNCERTAIN: u32 = 0x4000_0000;
const SEVERITY_BAD: u32 = 0x8000_0000;
const SUB_CODE_MASK: u32 = 0xFFFF_0000;

macro_rules! status_codes {
    ($($(#[$meta:meta])* $ident:ident = $value:literal, $name:literal;)+) => {
        impl StatusCode {
            $(
                $(#[$meta])*
                pub const $ident: StatusCode = StatusCode($value);
            )+

            /// Returns the symbolic name of this code, ignoring info bits.
            ///
            /// Unnamed good, uncertain and bad codes map to `"Good"`,
            /// `"Uncertain"` and `"Bad"` respectively.
            pub fn name(&self) -> &'static str {
                match self.0 & SUB_CODE_MASK {
                    $($value => $name,)+
                    _ if self.is_bad() => "Bad",
                    _ if self.is_uncertain() => "Uncertain",
                    _ => "Good",
                }
            }
        }
    };
}

status_codes! {
    /// The operation succeeded.
    GOOD = 0x0000_0000, "Good";
    /// The operation was uncertain.
    UNCERTAIN = 0x4000_0000, "Uncertain";
    /// The operation failed.
    BAD = 0x8000_0000, "Bad";
    /// An unexpected error occurred.
    BAD_UNEXPECTED_ERROR = 0x8001_0000, "Bad_UnexpectedError";
    /// An internal error occurred as a result of a programming or configuration error.
    BAD_INTERNAL_ERROR = 0x8002_0000, "Bad_InternalError";
    /// Decoding halted because of invalid data in the stream.
    BAD_DECODING_ERROR = 0x8007_0000, "Bad_DecodingError";
    /// The request could not be processed because it specified too many operations.
    BAD_TOO_MANY_OPERATIONS = 0x8010_0000, "Bad_TooManyOperations";
    /// User does not have permission to perform the requested operation.
    BAD_USER_ACCESS_DENIED = 0x801F_0000, "Bad_UserAccessDenied";
    /// The syntax of the node id is not valid.
    BAD_NODE_ID_INVALID = 0x8033_0000, "Bad_NodeIdInvalid";
    /// The node id refers to a node that does not exist in the server address space.
    BAD_NODE_ID_UNKNOWN = 0x8034_0000, "Bad_NodeIdUnknown";
    /// The access level does not allow reading or subscribing to the Node.
    BAD_NOT_READABLE = 0x803A_0000, "Bad_NotReadable";
    /// The access level does not allow writing to the Node.
    BAD_NOT_WRITABLE = 0x803B_0000, "Bad_NotWritable";
    /// The value was out of range.
    BAD_OUT_OF_RANGE = 0x803C_0000, "Bad_OutOfRange";
    /// The requested operation is not supported.
    BAD_NOT_SUPPORTED = 0x803D_0000, "Bad_NotSupported";
    /// A requested item was not found or a search operation ended without success.
    BAD_NOT_FOUND = 0x803E_0000, "Bad_NotFound";
    /// Requested operation is not implemented.
    BAD_NOT_IMPLEMENTED = 0x8040_0000, "Bad_NotImplemented";
    /// The requested node id is already used by another node.
    BAD_NODE_ID_EXISTS = 0x805E_0000, "Bad_NodeIdExists";
    /// The browse name is not unique among nodes that share the same relationship with the parent.
    BAD_BROWSE_NAME_DUPLICATED = 0x8061_0000, "Bad_BrowseNameDuplicated";
    /// The value supplied for the attribute is not of the same type as the attribute's value.
    BAD_TYPE_MISMATCH = 0x8074_0000, "Bad_TypeMismatch";
    /// The method id does not refer to a method for the specified object.
    BAD_METHOD_INVALID = 0x8075_0000, "Bad_MethodInvalid";
    /// The client did not specify all of the input arguments for the method.
    BAD_ARGUMENTS_MISSING = 0x8076_0000, "Bad_ArgumentsMissing";
    /// There is a problem with the configuration that affects the usefulness of the value.
    BAD_CONFIGURATION_ERROR = 0x8089_0000, "Bad_ConfigurationError";
    /// One or more arguments are invalid.
    BAD_INVALID_ARGUMENT = 0x80AB_0000, "Bad_InvalidArgument";
    /// The operation cannot be completed because the object is closed, uninitialized or in some other invalid state.
    BAD_INVALID_STATE = 0x80AF_0000, "Bad_InvalidState";
    /// The executable attribute does not allow the execution of the method.
    BAD_NOT_EXECUTABLE = 0x8111_0000, "Bad_NotExecutable";
    /// The client specified more input arguments than defined for the method.
    BAD_TOO_MANY_ARGUMENTS = 0x80E5_0000, "Bad_TooManyArguments";
    /// An operating system resource is not available.
    BAD_RESOURCE_UNAVAILABLE = 0x8004_0000, "Bad_ResourceUnavailable";
    /// This condition has already been disabled.
    BAD_CONDITION_ALREADY_DISABLED = 0x8098_0000, "Bad_ConditionAlreadyDisabled";
    /// This condition has already been enabled.
    BAD_CONDITION_ALREADY_ENABLED = 0x80CC_0000, "Bad_ConditionAlreadyEnabled";
    /// Property not available, this condition is disabled.
    BAD_CONDITION_DISABLED = 0x8099_0000, "Bad_ConditionDisabled";
    /// The specified event id is not recognized.
    BAD_EVENT_ID_UNKNOWN = 0x809A_0000, "Bad_EventIdUnknown";
    /// The condition branch has already been acknowledged.
    BAD_CONDITION_BRANCH_ALREADY_ACKED = 0x80CF_0000, "Bad_ConditionBranchAlreadyAcked";
    /// The condition branch has already been confirmed.
    BAD_CONDITION_BRANCH_ALREADY_CONFIRMED = 0x80D0_0000, "Bad_ConditionBranchAlreadyConfirmed";
    /// The condition has already been shelved.
    BAD_CONDITION_ALREADY_SHELVED = 0x80D1_0000, "Bad_ConditionAlreadyShelved";
    /// The condition is not currently shelved.
    BAD_CONDITION_NOT_SHELVED = 0x80D2_0000, "Bad_ConditionNotShelved";
    /// The shelving time not within an acceptable range.
    BAD_SHELVING_TIME_OUT_OF_RANGE = 0x80D3_0000, "Bad_ShelvingTimeOutOfRange";
}

impl StatusCode {
    /// Creates a status code from its raw value.
    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw 32-bit value.
    #[inline]
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Returns `true` if the severity is good.
    #[inline]
    pub const fn is_good(&self) -> bool {
        self.0 & SEVERITY_MASK == 0
    }

    /// Returns `true` if the severity is uncertain.
    #[inline]
    pub const fn is_uncertain(&self) -> bool {
        self.0 & SEVERITY_MASK == SEVERITY_UNCERTAIN
    }

    /// Returns `true` if the severity is bad.
    #[inline]
    pub const fn is_bad(&self) -> bool {
        self.0 & SEVERITY_MASK == SEVERITY_BAD
    }
}

impl Default for StatusCode {
    fn default() -> Self {
        Self::GOOD
    }
}

impl From<u32> for StatusCode {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<StatusCode> for u32 {
    fn from(status: StatusCode) -> Self {
        status.0
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:08X})", self.name(), self.0)
    }
}

// =============================================================================
// Tests
// =============================================================================
