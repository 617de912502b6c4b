//! Directed connections between node signals.

use serde::{Deserialize, Serialize};

use crate::error::{NefError, NefResult};
use crate::node::NodeId;

/// Post-synaptic time constant (seconds) used when none is given.
pub const DEFAULT_PSTC: f64 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub u32);

/// Linear transform applied along a connection.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weight {
    #[default]
    Identity,
    Scalar(f64),
    /// Row-major, `destination dims × source dims`.
    Matrix(Vec<Vec<f64>>),
}

impl Weight {
    /// Matrix of `rows × cols` with every entry set to `value`.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Weight::Matrix(vec![vec![value; cols]; rows])
    }

    fn kind(&self) -> &'static str {
        match self {
            Weight::Identity => "identity",
            Weight::Scalar(_) => "scalar",
            Weight::Matrix(_) => "matrix",
        }
    }

    /// Validate against a `source_dims → dest_dims` mapping.
    pub fn check_shape(&self, source_dims: usize, dest_dims: usize) -> NefResult<()> {
        match self {
            Weight::Identity | Weight::Scalar(_) => {
                if let Weight::Scalar(s) = self {
                    if !s.is_finite() {
                        return Err(NefError::InvalidParameter(format!(
                            "weight {} is not finite",
                            s
                        )));
                    }
                }
                // No matrix to blame here, only the two dimensionalities
                if source_dims != dest_dims {
                    return Err(NefError::InvalidParameter(format!(
                        "{} weight cannot map {}-D to {}-D; give a {}x{} matrix",
                        self.kind(),
                        source_dims,
                        dest_dims,
                        dest_dims,
                        source_dims
                    )));
                }
                Ok(())
            }
            Weight::Matrix(rows) => {
                let cols = rows.first().map(|r| r.len()).unwrap_or(0);
                if rows.iter().any(|r| r.len() != cols) {
                    return Err(NefError::InvalidParameter(
                        "weight matrix rows have unequal length".into(),
                    ));
                }
                if rows.iter().flatten().any(|w| !w.is_finite()) {
                    return Err(NefError::InvalidParameter(
                        "weight matrix has non-finite entries".into(),
                    ));
                }
                if rows.len() != dest_dims || cols != source_dims {
                    return Err(NefError::WeightShape {
                        expected_rows: dest_dims,
                        expected_cols: source_dims,
                        rows: rows.len(),
                        cols,
                    });
                }
                Ok(())
            }
        }
    }
}

/// Options for [`crate::Network::connect`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectOptions {
    pub weight: Weight,
    pub pstc: f64,
    /// Modulatory connections carry a teaching signal rather than input.
    pub modulatory: bool,
    /// Present when the engine should adapt this connection's weights.
    pub learning_rate: Option<f64>,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            weight: Weight::Identity,
            pstc: DEFAULT_PSTC,
            modulatory: false,
            learning_rate: None,
        }
    }
}

impl ConnectOptions {
    pub fn weight(mut self, weight: Weight) -> Self {
        self.weight = weight;
        self
    }

    pub fn scalar(self, w: f64) -> Self {
        self.weight(Weight::Scalar(w))
    }

    pub fn pstc(mut self, pstc: f64) -> Self {
        self.pstc = pstc;
        self
    }

    pub fn modulatory(mut self) -> Self {
        self.modulatory = true;
        self
    }

    pub fn learned(mut self, rate: f64) -> Self {
        self.learning_rate = Some(rate);
        self
    }

    pub(crate) fn validate(&self) -> NefResult<()> {
        if !(self.pstc >= 0.0 && self.pstc.is_finite()) {
            return Err(NefError::InvalidParameter(format!(
                "pstc must be >= 0, got {}",
                self.pstc
            )));
        }
        if let Some(rate) = self.learning_rate {
            if !(rate >= 0.0 && rate.is_finite()) {
                return Err(NefError::InvalidParameter(format!(
                    "learning rate must be >= 0, got {}",
                    rate
                )));
            }
        }
        Ok(())
    }
}

/// Caller-side reference to a connection endpoint: a node by id or name,
/// optionally naming one of its signals.
#[derive(Clone, Debug, PartialEq)]
pub enum EndpointRef {
    Id(NodeId, Option<String>),
    Name(String, Option<String>),
}

impl EndpointRef {
    /// Refer to a named signal (origin or termination) of `node`.
    pub fn signal(node: impl Into<EndpointRef>, signal: impl Into<String>) -> Self {
        match node.into() {
            EndpointRef::Id(id, _) => EndpointRef::Id(id, Some(signal.into())),
            EndpointRef::Name(name, _) => EndpointRef::Name(name, Some(signal.into())),
        }
    }

    pub fn signal_name(&self) -> Option<&str> {
        match self {
            EndpointRef::Id(_, s) | EndpointRef::Name(_, s) => s.as_deref(),
        }
    }
}

impl From<NodeId> for EndpointRef {
    fn from(id: NodeId) -> Self {
        EndpointRef::Id(id, None)
    }
}

impl From<&str> for EndpointRef {
    fn from(name: &str) -> Self {
        EndpointRef::Name(name.to_string(), None)
    }
}

impl From<String> for EndpointRef {
    fn from(name: String) -> Self {
        EndpointRef::Name(name, None)
    }
}

impl From<&String> for EndpointRef {
    fn from(name: &String) -> Self {
        EndpointRef::Name(name.clone(), None)
    }
}

/// A resolved endpoint inside a graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub node: NodeId,
    pub signal: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub source: Endpoint,
    pub destination: Endpoint,
    pub weight: Weight,
    pub pstc: f64,
    pub modulatory: bool,
    pub learning_rate: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_requires_equal_dimensions() {
        assert!(Weight::Identity.check_shape(5, 5).is_ok());
        assert_eq!(
            Weight::Identity.check_shape(1, 2),
            Err(NefError::InvalidParameter(
                "identity weight cannot map 1-D to 2-D; give a 2x1 matrix".into()
            ))
        );
        assert!(Weight::Scalar(-1.0).check_shape(1, 1).is_ok());
        match Weight::Scalar(2.0).check_shape(3, 4) {
            Err(NefError::InvalidParameter(msg)) => {
                assert!(msg.contains("3-D to 4-D"), "{}", msg);
                assert!(msg.contains("4x3"), "{}", msg);
            }
            other => panic!("expected InvalidParameter, got {:?}", other),
        }
        assert!(Weight::Scalar(f64::NAN).check_shape(1, 1).is_err());
    }

    #[test]
    fn matrix_shape_is_dest_by_source() {
        let w = Weight::filled(3, 1, -10.0);
        assert!(w.check_shape(1, 3).is_ok());
        assert!(matches!(w.check_shape(3, 1), Err(NefError::WeightShape { .. })));
        let ragged = Weight::Matrix(vec![vec![1.0, 2.0], vec![1.0]]);
        assert!(matches!(ragged.check_shape(2, 2), Err(NefError::InvalidParameter(_))));
    }

    #[test]
    fn options_validate_pstc_and_rate() {
        assert!(ConnectOptions::default().validate().is_ok());
        assert!(ConnectOptions::default().pstc(0.0).validate().is_ok());
        assert!(ConnectOptions::default().pstc(-0.1).validate().is_err());
        assert!(ConnectOptions::default().learned(5e-7).validate().is_ok());
        assert!(ConnectOptions::default().learned(-1.0).validate().is_err());
    }

    #[test]
    fn endpoint_refs() {
        let r: EndpointRef = "post".into();
        assert_eq!(r.signal_name(), None);
        let s = EndpointRef::signal("post", "error");
        assert_eq!(s, EndpointRef::Name("post".into(), Some("error".into())));
        let i = EndpointRef::signal(NodeId(2), "gate");
        assert_eq!(i.signal_name(), Some("gate"));
    }
}
