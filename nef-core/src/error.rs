use thiserror::Error;

/// Assembly-time validation failures. Every variant aborts the call that
/// raised it; nothing is recovered internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NefError {
    #[error("node '{name}' already exists in network '{network}'")]
    DuplicateName { network: String, name: String },

    #[error("unknown node '{0}'")]
    UnknownNode(String),

    #[error("node '{node}' has no signal named '{signal}'")]
    UnknownSignal { node: String, signal: String },

    #[error("invalid dimension for '{name}': {reason}")]
    InvalidDimension { name: String, reason: &'static str },

    #[error("weight shape mismatch: expected {expected_rows}x{expected_cols}, got {rows}x{cols}")]
    WeightShape {
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("network '{0}' is finalized")]
    NetworkFinalized(String),

    #[error("input '{0}' is not controllable")]
    NotControllable(String),
}

pub type NefResult<T, E = NefError> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let dup = NefError::DuplicateName {
            network: "Basal Ganglia".into(),
            name: "output".into(),
        };
        assert_eq!(
            format!("{}", dup),
            "node 'output' already exists in network 'Basal Ganglia'"
        );
        assert_eq!(format!("{}", NefError::UnknownNode("pre".into())), "unknown node 'pre'");
        assert_eq!(
            format!("{}", NefError::NetworkFinalized("net".into())),
            "network 'net' is finalized"
        );
        let shape = NefError::WeightShape { expected_rows: 2, expected_cols: 1, rows: 1, cols: 1 };
        assert_eq!(
            format!("{}", shape),
            "weight shape mismatch: expected 2x1, got 1x1"
        );
    }
}
