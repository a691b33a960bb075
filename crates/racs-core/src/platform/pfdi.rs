//! PFDI firmware interface call surface.
//!
//! Requests follow the SMC calling shape: a function identifier plus two
//! arguments in, four registers back, with `x0` carrying the return code.

/// Function identifiers.
pub mod function {
    pub const VERSION: u32 = 0x8400_0200;
    pub const FEATURES: u32 = 0x8400_0201;
    pub const PE_TEST_ID: u32 = 0x8400_0202;
    pub const PE_TEST_PART_COUNT: u32 = 0x8400_0203;
    pub const PE_TEST_RUN: u32 = 0x8400_0204;
    pub const PE_TEST_RESULT: u32 = 0x8400_0205;
    pub const FW_CHECK: u32 = 0x8400_0206;
    pub const FORCE_ERROR: u32 = 0x8400_0207;

    /// Functions every conforming firmware must implement.
    pub const MANDATORY: &[u32] = &[
        VERSION,
        FEATURES,
        PE_TEST_ID,
        PE_TEST_PART_COUNT,
        PE_TEST_RUN,
        PE_TEST_RESULT,
        FW_CHECK,
    ];
}

/// `x0` return codes.
pub const SUCCESS: i64 = 0;
pub const NOT_SUPPORTED: i64 = -1;
pub const TEST_FAILED: i64 = -2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PfdiRequest {
    pub function: u32,
    pub arg0: u64,
    pub arg1: u64,
}

impl PfdiRequest {
    pub fn new(function: u32) -> Self {
        Self {
            function,
            arg0: 0,
            arg1: 0,
        }
    }

    pub fn with_args(function: u32, arg0: u64, arg1: u64) -> Self {
        Self {
            function,
            arg0,
            arg1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PfdiReturn {
    pub x0: i64,
    pub x1: u64,
    pub x2: u64,
    pub x3: u64,
}

impl PfdiReturn {
    pub fn success() -> Self {
        Self {
            x0: SUCCESS,
            x1: 0,
            x2: 0,
            x3: 0,
        }
    }

    pub fn error(code: i64) -> Self {
        Self {
            x0: code,
            x1: 0,
            x2: 0,
            x3: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.x0 == SUCCESS
    }
}

/// Version word layout in `x1`: major in bits [31:16], minor in [15:0].
pub fn pack_version(major: u16, minor: u16) -> u64 {
    ((major as u64) << 16) | minor as u64
}

pub fn unpack_version(x1: u64) -> (u16, u16) {
    (((x1 >> 16) & 0xFFFF) as u16, (x1 & 0xFFFF) as u16)
}
