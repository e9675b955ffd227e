//! Merkle commitments over lock hashes.
//!
//! The tree follows the netting channel contract's proof check: leaves are sorted, each pair of nodes is hashed in
//! ascending byte order, and an unpaired node is carried up to the next layer unchanged. Because pairs are ordered
//! by value, a proof is just the list of sibling hashes and carries no left/right flags. Sorting the leaves makes the
//! root depend only on the set of leaves, not on the order they were supplied in.

use crate::hashes::{keccak256, Hash256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MerkleError {
    #[error("The leaf {0} appears more than once")]
    DuplicateLeaf(Hash256),
}

/// Hashes two nodes, smaller one first.
pub fn hash_pair(first: &Hash256, second: &Hash256) -> Hash256 {
    let (lo, hi) = if first <= second { (first, second) } else { (second, first) };
    let mut data = [0u8; 64];
    data[..32].copy_from_slice(lo.as_bytes());
    data[32..].copy_from_slice(hi.as_bytes());
    keccak256(data)
}

/// An inclusion proof: the sibling hashes on the path from a leaf to the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MerkleProof {
    siblings: Vec<Hash256>,
}

impl MerkleProof {
    pub fn new(siblings: Vec<Hash256>) -> Self {
        MerkleProof { siblings }
    }

    pub fn siblings(&self) -> &[Hash256] {
        &self.siblings
    }

    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }

    /// The proof as one concatenated byte string, the form the contract takes it in.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.siblings.iter().flat_map(|h| h.as_bytes().iter().copied()).collect()
    }
}

/// Returns true if `proof` links `leaf` to `root`.
pub fn verify_proof(proof: &MerkleProof, root: &Hash256, leaf: &Hash256) -> bool {
    let computed = proof.siblings.iter().fold(*leaf, |node, sibling| hash_pair(&node, sibling));
    computed == *root
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    /// `layers[0]` holds the sorted leaves, the last layer holds the root (or nothing, for an empty tree).
    layers: Vec<Vec<Hash256>>,
}

impl MerkleTree {
    pub fn new<I: IntoIterator<Item = Hash256>>(leaves: I) -> Result<Self, MerkleError> {
        let mut leaves = leaves.into_iter().collect::<Vec<_>>();
        leaves.sort();
        if let Some(pair) = leaves.windows(2).find(|w| w[0] == w[1]) {
            return Err(MerkleError::DuplicateLeaf(pair[0]));
        }
        let mut layers = vec![leaves];
        loop {
            let current = &layers[layers.len() - 1];
            if current.len() <= 1 {
                break;
            }
            let next = current
                .chunks(2)
                .map(|pair| match pair {
                    [a, b] => hash_pair(a, b),
                    [a] => *a,
                    _ => unreachable!("chunks(2) yields one or two elements"),
                })
                .collect::<Vec<_>>();
            layers.push(next);
        }
        Ok(MerkleTree { layers })
    }

    pub fn root(&self) -> Hash256 {
        self.layers.last().and_then(|layer| layer.first()).copied().unwrap_or(Hash256::ZERO)
    }

    /// The leaves in tree order (sorted).
    pub fn leaves(&self) -> &[Hash256] {
        &self.layers[0]
    }

    pub fn contains(&self, leaf: &Hash256) -> bool {
        self.layers[0].binary_search(leaf).is_ok()
    }

    /// Builds the inclusion proof for `leaf`, or `None` if the leaf is not in the tree.
    pub fn make_proof(&self, leaf: &Hash256) -> Option<MerkleProof> {
        let mut index = self.layers[0].binary_search(leaf).ok()?;
        let mut siblings = Vec::with_capacity(self.layers.len());
        for layer in &self.layers[..self.layers.len() - 1] {
            let pair = index ^ 1;
            if pair < layer.len() {
                siblings.push(layer[pair]);
            }
            index /= 2;
        }
        Some(MerkleProof { siblings })
    }
}

/// The root of the tree over `leaves`.
pub fn merkleroot<I: IntoIterator<Item = Hash256>>(leaves: I) -> Result<Hash256, MerkleError> {
    MerkleTree::new(leaves).map(|tree| tree.root())
}

#[cfg(test)]
mod test {
    use super::*;

    fn leaves(n: u8) -> Vec<Hash256> {
        (0..n).map(|i| keccak256([i])).collect()
    }

    #[test]
    fn empty_tree() {
        let tree = MerkleTree::new(Vec::new()).unwrap();
        assert_eq!(tree.root(), Hash256::ZERO);
        assert!(tree.leaves().is_empty());
        assert!(tree.make_proof(&keccak256(b"x")).is_none());
    }

    #[test]
    fn single_leaf_is_root() {
        let leaf = keccak256(b"one");
        let tree = MerkleTree::new([leaf]).unwrap();
        assert_eq!(tree.root(), leaf);
        let proof = tree.make_proof(&leaf).unwrap();
        assert!(proof.is_empty());
        assert!(verify_proof(&proof, &tree.root(), &leaf));
    }

    #[test]
    fn two_leaves() {
        let l = leaves(2);
        let tree = MerkleTree::new(l.clone()).unwrap();
        assert_eq!(tree.root(), hash_pair(&l[0], &l[1]));
        assert_eq!(hash_pair(&l[0], &l[1]), hash_pair(&l[1], &l[0]));
        let proof = tree.make_proof(&l[0]).unwrap();
        assert_eq!(proof.siblings(), &[l[1]]);
    }

    #[test]
    fn odd_node_is_carried_up() {
        let mut l = leaves(3);
        l.sort();
        let tree = MerkleTree::new(l.clone()).unwrap();
        let expected = hash_pair(&hash_pair(&l[0], &l[1]), &l[2]);
        assert_eq!(tree.root(), expected);
        let proof = tree.make_proof(&l[2]).unwrap();
        assert_eq!(proof.siblings(), &[hash_pair(&l[0], &l[1])]);
    }

    #[test]
    fn every_leaf_has_a_valid_proof() {
        for n in 1..=9 {
            let l = leaves(n);
            let tree = MerkleTree::new(l.clone()).unwrap();
            let root = tree.root();
            for leaf in &l {
                let proof = tree.make_proof(leaf).unwrap();
                assert!(verify_proof(&proof, &root, leaf), "proof failed for {n} leaves");
                assert!(!verify_proof(&proof, &root, &keccak256(b"not a leaf")));
            }
        }
    }

    #[test]
    fn root_ignores_input_order() {
        let l = leaves(7);
        let mut reversed = l.clone();
        reversed.reverse();
        assert_eq!(merkleroot(l).unwrap(), merkleroot(reversed).unwrap());
    }

    #[test]
    fn duplicate_leaves_are_rejected() {
        let leaf = keccak256(b"dup");
        let err = MerkleTree::new([leaf, keccak256(b"other"), leaf]).unwrap_err();
        assert_eq!(err, MerkleError::DuplicateLeaf(leaf));
    }

    #[test]
    fn proof_bytes_are_concatenated_siblings() {
        let l = leaves(4);
        let tree = MerkleTree::new(l.clone()).unwrap();
        let proof = tree.make_proof(&l[0]).unwrap();
        assert_eq!(proof.len(), 2);
        assert_eq!(proof.to_bytes().len(), 64);
        assert_eq!(&proof.to_bytes()[..32], proof.siblings()[0].as_bytes());
    }
}
