//! Output of the router: one envelope per routed document.

use serde::{Serialize, Serializer};
use serde_json::Value;
use trustmesh_documents::{Block, Transaction};

use crate::classify::DocumentKind;
use crate::peer::TargetPeer;

/// The document carried by an envelope.
///
/// The received JSON is what gets forwarded, byte for byte. Blocks and
/// transactions also carry their parsed form for local inspection.
#[derive(Clone, Debug, PartialEq)]
pub enum RoutedDocument {
    Block { received: Value, block: Box<Block> },
    Transaction { received: Value, transaction: Box<Transaction> },
    Record(Value),
}

impl RoutedDocument {
    pub fn from_json(kind: DocumentKind, doc: Value) -> Self {
        match kind {
            DocumentKind::Block => {
                let block = Box::new(Block::from_json(&doc));
                Self::Block { received: doc, block }
            }
            DocumentKind::Transaction => {
                let transaction = Box::new(Transaction::from_json(&doc));
                Self::Transaction {
                    received: doc,
                    transaction,
                }
            }
            _ => Self::Record(doc),
        }
    }

    /// The document as received.
    pub fn received(&self) -> &Value {
        match self {
            Self::Block { received, .. } | Self::Transaction { received, .. } => received,
            Self::Record(value) => value,
        }
    }
}

impl Serialize for RoutedDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.received().serialize(serializer)
    }
}

/// A routing decision, consumed by the network send stage.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoutingEnvelope {
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub document: RoutedDocument,
    pub peers: Vec<TargetPeer>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blocks_and_transactions_are_parsed() {
        let block = RoutedDocument::from_json(DocumentKind::Block, json!({ "joiners": [] }));
        assert!(matches!(block, RoutedDocument::Block { .. }));
        let tx = RoutedDocument::from_json(
            DocumentKind::Transaction,
            json!({ "inputs": [], "issuers": [] }),
        );
        assert!(matches!(tx, RoutedDocument::Transaction { .. }));
        let peer = RoutedDocument::from_json(DocumentKind::Peer, json!({ "endpoints": [] }));
        assert_eq!(peer, RoutedDocument::Record(json!({ "endpoints": [] })));
    }

    #[test]
    fn envelope_serializes_with_type_tag() {
        let envelope = RoutingEnvelope {
            kind: DocumentKind::Certification,
            document: RoutedDocument::Record(json!({ "idty_uid": "alice" })),
            peers: Vec::new(),
        };
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["type"], "cert");
        assert_eq!(value["document"]["idty_uid"], "alice");
        assert_eq!(value["peers"], json!([]));
    }

    #[test]
    fn forwarded_block_is_the_received_json() {
        let received = json!({
            "joiners": [],
            "number": "7",
            "dividend": 0,
            "hash": "abcdef",
            "monetaryMass": 123456
        });
        let document = RoutedDocument::from_json(DocumentKind::Block, received.clone());
        assert_eq!(serde_json::to_value(&document).unwrap(), received);
        match &document {
            RoutedDocument::Block { block, .. } => assert_eq!(block.number, 7),
            other => panic!("unexpected document {other:?}"),
        }
    }

    #[test]
    fn forwarded_transaction_keeps_unmodelled_fields() {
        let received = json!({
            "inputs": ["1:0:D:A:0"],
            "issuers": ["A"],
            "received_time": 1_600_000_000
        });
        let document = RoutedDocument::from_json(DocumentKind::Transaction, received.clone());
        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(value, received);
        assert!(value.get("hash").is_none());
    }
}
