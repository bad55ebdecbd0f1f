//! Stable error codes for the preview compiler.
//!
//! All codes are SCREAMING_SNAKE_CASE and stable across versions.

/// A relative import did not match any file in the virtual filesystem.
pub const MODULE_NOT_FOUND: &str = "MODULE_NOT_FOUND";

/// A module failed to parse.
pub const BUNDLE_PARSE_ERROR: &str = "BUNDLE_PARSE_ERROR";

/// A module parsed but could not be transformed or emitted.
pub const BUNDLE_TRANSFORM_ERROR: &str = "BUNDLE_TRANSFORM_ERROR";

/// A module uses module syntax the linker cannot express.
pub const BUNDLE_UNSUPPORTED_SYNTAX: &str = "BUNDLE_UNSUPPORTED_SYNTAX";

/// Internal invariant violated while building the bundle.
pub const BUNDLE_INTERNAL_ERROR: &str = "BUNDLE_INTERNAL_ERROR";

/// The shared transform toolchain failed to initialize.
pub const TOOLCHAIN_INIT_FAILED: &str = "TOOLCHAIN_INIT_FAILED";

/// The input contained no component files.
pub const NO_INPUT: &str = "NO_INPUT";

/// A component filename is empty or names a nested path.
pub const INVALID_FILENAME: &str = "INVALID_FILENAME";

/// The config file could not be read.
pub const CONFIG_READ_ERROR: &str = "CONFIG_READ_ERROR";

/// The config file is not valid JSON for `PreviewConfig`.
pub const CONFIG_PARSE_ERROR: &str = "CONFIG_PARSE_ERROR";

/// The config parsed but holds unusable values.
pub const CONFIG_INVALID: &str = "CONFIG_INVALID";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_codes_are_screaming_snake_case() {
        let codes = [
            MODULE_NOT_FOUND,
            BUNDLE_PARSE_ERROR,
            BUNDLE_TRANSFORM_ERROR,
            BUNDLE_UNSUPPORTED_SYNTAX,
            BUNDLE_INTERNAL_ERROR,
            TOOLCHAIN_INIT_FAILED,
            NO_INPUT,
            INVALID_FILENAME,
            CONFIG_READ_ERROR,
            CONFIG_PARSE_ERROR,
            CONFIG_INVALID,
        ];

        for code in codes {
            assert!(
                code.chars().all(|c| c.is_uppercase() || c == '_'),
                "Code '{code}' should be SCREAMING_SNAKE_CASE"
            );
        }
    }
}
