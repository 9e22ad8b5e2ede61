//! # In-Memory Engine
//!
//! A [`TreeEngine`] implementation backed by a plain node map.
//!
//! This is the reference double for the session layer's test suite and for
//! offline demos: it does full tree bookkeeping (insert, move, remove,
//! field updates) but no real encoding rules. Its "raw" input form is a
//! JSON node list, its stored form is the whole engine serialized, and its
//! binary export is the serialized node list's bytes.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::{EngineError, Node, TreeEngine};

/// In-memory document engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryEngine {
    nodes: BTreeMap<usize, Node>,
    roots: Vec<usize>,
    next_id: usize,
}

impl MemoryEngine {
    /// Build an engine from an already-flat node list.
    ///
    /// The list must describe a forest: every `parent` reference resolves,
    /// every `children` entry points back at its container, and every node
    /// is reachable from a root exactly once. Anything else is a decode
    /// error rather than a tree the walkers could loop on.
    pub fn from_nodes(nodes: Vec<Node>) -> Result<Self, EngineError> {
        let mut engine = Self::default();

        for node in &nodes {
            if node.parent.is_none() {
                engine.roots.push(node.id);
            }
            engine.next_id = engine.next_id.max(node.id + 1);
        }

        for node in nodes {
            if engine.nodes.insert(node.id, node).is_some() {
                return Err(EngineError::Decode("duplicate node id".to_string()));
            }
        }

        for node in engine.nodes.values() {
            if let Some(parent) = node.parent {
                if !engine.nodes.contains_key(&parent) {
                    return Err(EngineError::Decode(format!(
                        "node {} references missing parent {}",
                        node.id, parent
                    )));
                }
            }
            for &child in &node.children {
                let linked_back = engine
                    .nodes
                    .get(&child)
                    .is_some_and(|c| c.parent == Some(node.id));
                if !linked_back {
                    return Err(EngineError::Decode(format!(
                        "node {} lists {} as a child without a matching parent link",
                        node.id, child
                    )));
                }
            }
        }

        // Cycles hide from the link checks above; a root walk does not.
        let mut visited = std::collections::BTreeSet::new();
        let mut stack: Vec<usize> = engine.roots.clone();
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                return Err(EngineError::Decode(format!(
                    "node {id} is reachable more than once"
                )));
            }
            if let Some(node) = engine.nodes.get(&id) {
                stack.extend(node.children.iter().copied());
            }
        }
        if visited.len() != engine.nodes.len() {
            return Err(EngineError::Decode(
                "node list contains entries unreachable from any root".to_string(),
            ));
        }

        Ok(engine)
    }

    fn node_mut(&mut self, id: usize) -> Result<&mut Node, EngineError> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| EngineError::InvalidOperation(format!("no such node: {id}")))
    }

    /// Definite-form length octets: short form below 0x80, otherwise a
    /// `0x80 | n` prefix followed by `n` big-endian bytes.
    fn length_octets(length: usize) -> Vec<u8> {
        if length < 0x80 {
            return vec![length as u8];
        }
        let bytes: Vec<u8> = length
            .to_be_bytes()
            .into_iter()
            .skip_while(|&b| b == 0)
            .collect();
        let mut out = vec![0x80 | bytes.len() as u8];
        out.extend(bytes);
        out
    }

    fn fresh_node(tag: u8, content: &str, label: &str, parent: Option<usize>) -> Node {
        Node {
            id: 0, // assigned by the caller
            label: label.to_string(),
            tag: (tag, format!("{tag:02X}"), vec![tag]),
            length: (
                content.len(),
                content.len().to_string(),
                Self::length_octets(content.len()),
            ),
            content: (
                content.to_string(),
                content.to_string(),
                content.as_bytes().to_vec(),
            ),
            children: Vec::new(),
            parent,
        }
    }

    fn insert(&mut self, mut node: Node, index: Option<usize>) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        node.id = id;

        match node.parent {
            Some(parent) => {
                let children = &mut self
                    .nodes
                    .get_mut(&parent)
                    .expect("parent checked before insert")
                    .children;
                let at = index.unwrap_or(children.len()).min(children.len());
                children.insert(at, id);
            }
            None => self.roots.push(id),
        }

        self.nodes.insert(id, node);
        id
    }

    fn collect_pre_order(&self, id: usize, out: &mut Vec<Node>) {
        if let Some(node) = self.nodes.get(&id) {
            out.push(node.clone());
            for child in &node.children {
                self.collect_pre_order(*child, out);
            }
        }
    }

    /// Built-in example: a trimmed-down RSA certificate skeleton.
    fn example_rsa_cert() -> Self {
        let mut engine = Self::default();

        let cert = engine.insert(Self::fresh_node(16, "", "Certificate", None), None);
        let tbs = engine.insert(
            Self::fresh_node(16, "", "TBSCertificate", Some(cert)),
            None,
        );
        engine.insert(Self::fresh_node(2, "1", "serialNumber", Some(tbs)), None);
        engine.insert(
            Self::fresh_node(23, "240101000000Z", "notBefore", Some(tbs)),
            None,
        );
        engine.insert(
            Self::fresh_node(6, "1.2.840.113549.1.1.11", "signatureAlgorithm", Some(cert)),
            None,
        );
        engine.insert(
            Self::fresh_node(3, "'0'B", "signatureValue", Some(cert)),
            None,
        );

        engine
    }

    /// Built-in example: an RSAPublicKey structure.
    fn example_rsa_key() -> Self {
        let mut engine = Self::default();

        let key = engine.insert(Self::fresh_node(16, "", "RSAPublicKey", None), None);
        engine.insert(Self::fresh_node(2, "65537", "publicExponent", Some(key)), None);
        engine.insert(Self::fresh_node(2, "3233", "modulus", Some(key)), None);

        engine
    }
}

impl TreeEngine for MemoryEngine {
    fn from_raw(data: &str) -> Result<Self, EngineError> {
        let nodes: Vec<Node> = serde_json::from_str(data.trim())
            .map_err(|e| EngineError::Decode(format!("invalid node list: {e}")))?;
        Self::from_nodes(nodes)
    }

    fn from_stored(encoded: &str) -> Result<Self, EngineError> {
        serde_json::from_str(encoded)
            .map_err(|e| EngineError::Decode(format!("invalid stored engine: {e}")))
    }

    fn load_example(name: &str) -> Result<Self, EngineError> {
        match name {
            "rsa-cert" => Ok(Self::example_rsa_cert()),
            "rsa-key" => Ok(Self::example_rsa_key()),
            other => Err(EngineError::Decode(format!("unknown example: {other}"))),
        }
    }

    fn serialize_tree(&self) -> String {
        let mut nodes = Vec::with_capacity(self.nodes.len());
        for root in &self.roots {
            self.collect_pre_order(*root, &mut nodes);
        }
        serde_json::to_string(&nodes).expect("node list is always serializable")
    }

    fn add_node(
        &mut self,
        tag: u8,
        content: &str,
        parent: usize,
        label: &str,
        index: Option<usize>,
    ) -> Result<(), EngineError> {
        if !self.nodes.contains_key(&parent) {
            return Err(EngineError::InvalidOperation(format!(
                "no such parent: {parent}"
            )));
        }

        self.insert(Self::fresh_node(tag, content, label, Some(parent)), index);
        Ok(())
    }

    fn move_node(&mut self, id: usize, new_parent: usize, index: usize)
        -> Result<(), EngineError>
    {
        if !self.nodes.contains_key(&new_parent) {
            return Err(EngineError::InvalidOperation(format!(
                "no such parent: {new_parent}"
            )));
        }

        let old_parent = self.node_mut(id)?.parent;

        // Detach from the current container
        match old_parent {
            Some(parent) => {
                if let Some(parent_node) = self.nodes.get_mut(&parent) {
                    parent_node.children.retain(|&child| child != id);
                }
            }
            None => self.roots.retain(|&root| root != id),
        }

        let children = &mut self
            .nodes
            .get_mut(&new_parent)
            .expect("parent existence checked above")
            .children;
        children.insert(index.min(children.len()), id);

        self.node_mut(id)?.parent = Some(new_parent);
        Ok(())
    }

    fn replace_node(
        &mut self,
        id: usize,
        tag: u8,
        length: usize,
        content: &str,
    ) -> Result<(), EngineError> {
        let node = self.node_mut(id)?;
        node.tag = (tag, format!("{tag:02X}"), vec![tag]);
        node.length = (length, length.to_string(), Self::length_octets(length));
        node.content = (
            content.to_string(),
            content.to_string(),
            content.as_bytes().to_vec(),
        );
        Ok(())
    }

    fn set_content(&mut self, id: usize, content: &str) -> Result<(), EngineError> {
        let node = self.node_mut(id)?;
        node.content = (
            content.to_string(),
            content.to_string(),
            content.as_bytes().to_vec(),
        );
        node.length = (
            content.len(),
            content.len().to_string(),
            Self::length_octets(content.len()),
        );
        Ok(())
    }

    fn set_length(&mut self, id: usize, length: usize) -> Result<(), EngineError> {
        let node = self.node_mut(id)?;
        node.length = (length, length.to_string(), Self::length_octets(length));
        Ok(())
    }

    fn set_tag(&mut self, id: usize, tag: u8) -> Result<(), EngineError> {
        let node = self.node_mut(id)?;
        node.tag = (tag, format!("{tag:02X}"), vec![tag]);
        Ok(())
    }

    fn set_label(&mut self, id: usize, label: &str) -> Result<(), EngineError> {
        self.node_mut(id)?.label = label.to_string();
        Ok(())
    }

    fn remove_node(&mut self, id: usize) -> Result<(), EngineError> {
        let node = self
            .nodes
            .get(&id)
            .ok_or_else(|| EngineError::InvalidOperation(format!("no such node: {id}")))?;
        let parent = node.parent;

        // Collect the whole subtree before touching the map
        let mut doomed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            doomed.push(current);
            if let Some(node) = self.nodes.get(&current) {
                stack.extend(node.children.iter().copied());
            }
        }

        for victim in doomed {
            self.nodes.remove(&victim);
        }

        match parent {
            Some(parent) => {
                if let Some(parent_node) = self.nodes.get_mut(&parent) {
                    parent_node.children.retain(|&child| child != id);
                }
            }
            None => self.roots.retain(|&root| root != id),
        }

        Ok(())
    }

    fn export_bin(&self) -> Vec<u8> {
        self.serialize_tree().into_bytes()
    }

    fn export_base64(&self) -> String {
        BASE64.encode(self.export_bin())
    }

    fn export_stored(&self) -> String {
        serde_json::to_string(self).expect("engine is always serializable")
    }
}
