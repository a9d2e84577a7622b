//! Deterministic clause fingerprinting over a tagged structural encoding.
#![allow(clippy::cast_possible_truncation)]

use crate::clause::{Clause, HistoryPredicate, Operand, TerminalClause, Value};
use sha2::{Digest, Sha256};

///
/// ClauseFingerprint
///
/// Stable, deterministic fingerprint for clause trees.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ClauseFingerprint([u8; 32]);

impl ClauseFingerprint {
    #[must_use]
    pub fn as_hex(&self) -> String {
        let mut out = String::with_capacity(64);
        for byte in self.0 {
            use std::fmt::Write as _;
            let _ = write!(out, "{byte:02x}");
        }
        out
    }
}

impl std::fmt::Display for ClauseFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_hex())
    }
}

impl Clause {
    /// Compute a stable fingerprint for this clause tree.
    #[must_use]
    pub fn fingerprint(&self) -> ClauseFingerprint {
        let mut hasher = Sha256::new();
        hasher.update(b"clausefp:v1");
        hash_clause(&mut hasher, self);
        let digest = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        ClauseFingerprint(out)
    }
}

fn hash_clause(hasher: &mut Sha256, clause: &Clause) {
    match clause {
        Clause::Terminal(terminal) => {
            write_tag(hasher, 0x01);
            hash_terminal(hasher, terminal);
        }
        Clause::And(children) => {
            write_tag(hasher, 0x02);
            write_u32(hasher, children.len() as u32);
            for child in children {
                hash_clause(hasher, child);
            }
        }
        Clause::Or(children) => {
            write_tag(hasher, 0x03);
            write_u32(hasher, children.len() as u32);
            for child in children {
                hash_clause(hasher, child);
            }
        }
        Clause::Not(inner) => {
            write_tag(hasher, 0x04);
            hash_clause(hasher, inner);
        }
    }
}

fn hash_terminal(hasher: &mut Sha256, terminal: &TerminalClause) {
    write_str(hasher, &terminal.field);
    write_tag(hasher, terminal.operator.tag());
    hash_operand(hasher, &terminal.operand);
    match &terminal.predicate {
        Some(predicate) => {
            write_tag(hasher, 0x01);
            hash_predicate(hasher, predicate);
        }
        None => write_tag(hasher, 0x00),
    }
}

fn hash_predicate(hasher: &mut Sha256, predicate: &HistoryPredicate) {
    match predicate {
        HistoryPredicate::Terminal { op, operand } => {
            write_tag(hasher, 0x20);
            write_tag(hasher, op.tag());
            hash_operand(hasher, operand);
        }
        HistoryPredicate::And(parts) => {
            write_tag(hasher, 0x21);
            write_u32(hasher, parts.len() as u32);
            for part in parts {
                hash_predicate(hasher, part);
            }
        }
    }
}

fn hash_operand(hasher: &mut Sha256, operand: &Operand) {
    match operand {
        Operand::Value(value) => {
            write_tag(hasher, 0x30);
            hash_value(hasher, value);
        }
        Operand::List(items) => {
            write_tag(hasher, 0x31);
            write_u32(hasher, items.len() as u32);
            for item in items {
                hash_operand(hasher, item);
            }
        }
        Operand::Empty => write_tag(hasher, 0x32),
        Operand::Function(call) => {
            write_tag(hasher, 0x33);
            write_str(hasher, &call.name);
            write_u32(hasher, call.args.len() as u32);
            for arg in &call.args {
                write_str(hasher, arg);
            }
        }
    }
}

fn hash_value(hasher: &mut Sha256, value: &Value) {
    match value {
        Value::Text(text) => {
            write_tag(hasher, 0x40);
            write_str(hasher, text);
        }
        Value::Number(n) => {
            write_tag(hasher, 0x41);
            hasher.update(n.to_be_bytes());
        }
        Value::Date(date) => {
            write_tag(hasher, 0x42);
            hasher.update(date.and_utc().timestamp().to_be_bytes());
        }
    }
}

fn write_tag(hasher: &mut Sha256, tag: u8) {
    hasher.update([tag]);
}

fn write_u32(hasher: &mut Sha256, value: u32) {
    hasher.update(value.to_be_bytes());
}

fn write_str(hasher: &mut Sha256, value: &str) {
    write_u32(hasher, value.len() as u32);
    hasher.update(value.as_bytes());
}
