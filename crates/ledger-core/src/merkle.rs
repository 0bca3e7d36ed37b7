//! Merkle root computation over transaction id strings.

use crate::hash::sha256_hex;
use crate::network::DIGEST_HEX_LEN;

/// Root reported for a block with no transactions.
pub const EMPTY_MERKLE_ROOT: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Compute the merkle root from a list of transaction IDs.
///
/// Nodes are combined by concatenating their hex *strings* and hashing the
/// result with SHA256. An odd level pairs its last node with itself.
///
/// A single transaction ID is returned as-is, without hashing.
pub fn merkle_root<S: AsRef<str>>(tx_ids: &[S]) -> String {
    if tx_ids.is_empty() {
        return EMPTY_MERKLE_ROOT.to_string();
    }

    if tx_ids.len() == 1 {
        return tx_ids[0].as_ref().to_string();
    }

    let mut current_level: Vec<String> = tx_ids.iter().map(|id| id.as_ref().to_string()).collect();

    while current_level.len() > 1 {
        let mut next_level = Vec::with_capacity((current_level.len() + 1) / 2);

        for pair in current_level.chunks(2) {
            let left = &pair[0];
            // If odd number of elements, duplicate the last one
            let right = pair.get(1).unwrap_or(left);

            let mut combined = String::with_capacity(left.len() + right.len());
            combined.push_str(left);
            combined.push_str(right);
            next_level.push(sha256_hex(combined.as_bytes()));
        }

        current_level = next_level;
    }

    current_level.swap_remove(0)
}

/// Whether `root` is the empty-block sentinel.
pub fn is_empty_root(root: &str) -> bool {
    root.len() == DIGEST_HEX_LEN && root.bytes().all(|b| b == b'0')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(s: &str) -> String {
        sha256_hex(s.as_bytes())
    }

    #[test]
    fn test_empty_merkle_root() {
        let root = merkle_root::<&str>(&[]);
        assert_eq!(root, "0".repeat(64));
        assert!(is_empty_root(&root));
    }

    #[test]
    fn test_single_tx_merkle_root_is_unhashed() {
        assert_eq!(merkle_root(&["abc"]), "abc");
        assert_eq!(merkle_root(&[String::from("not-even-hex")]), "not-even-hex");
    }

    #[test]
    fn test_two_tx_merkle_root() {
        assert_eq!(merkle_root(&["a", "b"]), h("ab"));
    }

    #[test]
    fn test_three_tx_merkle_root() {
        // Level 1: hash(a + b), hash(c + c)
        let left = h("ab");
        let right = h("cc");
        let expected = h(&format!("{}{}", left, right));

        assert_eq!(merkle_root(&["a", "b", "c"]), expected);
    }

    #[test]
    fn test_four_tx_merkle_root() {
        let expected = h(&format!("{}{}", h("ab"), h("cd")));
        assert_eq!(merkle_root(&["a", "b", "c", "d"]), expected);
    }

    #[test]
    fn test_merkle_root_is_order_sensitive() {
        assert_ne!(merkle_root(&["a", "b"]), merkle_root(&["b", "a"]));
    }

    #[test]
    fn test_real_txid_strings() {
        let ids = [h("tx1"), h("tx2")];
        let root = merkle_root(&ids);
        assert_eq!(root, h(&format!("{}{}", ids[0], ids[1])));
        assert_eq!(root.len(), 64);
        assert!(!is_empty_root(&root));
    }
}
