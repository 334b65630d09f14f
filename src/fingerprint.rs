//! Test fingerprints.
//!
//! A fingerprint is the cross-run correlation key of a test: the SHA-1 digest of the
//! fully-qualified declaring type joined to the method name with a `.`, rendered as
//! 40 lowercase hexadecimal characters. Identical inputs yield the same fingerprint on
//! every platform, so the backend can match results of the same test across runs.

use sha1::{Digest, Sha1};

/// Length of a rendered fingerprint (SHA-1 digest in hex).
pub const FINGERPRINT_HEX_LEN: usize = 40;

/// Separator between the type identifier and the method identifier.
const SEPARATOR: &str = ".";

/// Computes the fingerprint of a test from its declaring type and method name.
///
/// `type_identifier` is the canonical fully-qualified type name, for example
/// `io.probedock.client.common.model.v1.ModelFactoryTest`.
pub fn fingerprint(type_identifier: &str, method_identifier: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(type_identifier.as_bytes());
    hasher.update(SEPARATOR.as_bytes());
    hasher.update(method_identifier.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;

    #[test]
    fn test_fingerprint_golden_vector() {
        let result = fingerprint(
            "io.probedock.client.common.model.v1.ModelFactoryTest",
            "fingerprintShouldBeBasedOnPackageClassAndMethodNames",
        );
        assert_eq!(result, "2124ed3c55b62e67bb3d00b79324d6094d47ec34");
    }

    #[test]
    fn test_fingerprint_differs_by_method() {
        assert_ne!(fingerprint("a.B", "first"), fingerprint("a.B", "second"));
    }

    #[test]
    fn prop_fingerprint_is_deterministic_lowercase_hex() {
        fn prop(type_identifier: String, method_identifier: String) -> bool {
            let first = fingerprint(&type_identifier, &method_identifier);
            let second = fingerprint(&type_identifier, &method_identifier);
            first == second
                && first.len() == FINGERPRINT_HEX_LEN
                && first
                    .chars()
                    .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        }
        quickcheck(prop as fn(String, String) -> bool);
    }
}
