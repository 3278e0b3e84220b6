//! Descriptor field numbers and versioning constants.
//!
//! Field numbers come from `descriptor.proto` and make up the structural
//! paths that `source_code_info` locations are keyed by.

// ============================================================================
// FileDescriptorProto
// ============================================================================

pub const FILE_PACKAGE: i32 = 2;
pub const FILE_MESSAGE_TYPE: i32 = 4;
pub const FILE_ENUM_TYPE: i32 = 5;
pub const FILE_SERVICE: i32 = 6;
pub const FILE_EXTENSION: i32 = 7;
pub const FILE_SYNTAX: i32 = 12;

// ============================================================================
// DescriptorProto
// ============================================================================

pub const MESSAGE_FIELD: i32 = 2;
pub const MESSAGE_NESTED_TYPE: i32 = 3;
pub const MESSAGE_ENUM_TYPE: i32 = 4;
pub const MESSAGE_EXTENSION: i32 = 6;

// ============================================================================
// EnumDescriptorProto / ServiceDescriptorProto
// ============================================================================

pub const ENUM_VALUE: i32 = 2;
pub const SERVICE_METHOD: i32 = 2;

/// Locations whose comments make up a file's documentation, in order.
pub const FILE_DOC_LOCATIONS: &[i32] = &[FILE_SYNTAX, FILE_PACKAGE];

// ============================================================================
// Config versions
// ============================================================================

/// The newest service config version understood by the analysis.
pub const CURRENT_CONFIG_VERSION: u32 = 3;

/// The version assumed when a service config does not declare one.
pub const DEFAULT_CONFIG_VERSION: u32 = 1;
