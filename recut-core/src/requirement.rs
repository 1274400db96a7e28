//! The connectivity requirement a cluster must beat to be accepted.
//!
//! A requirement is a linear form over a handful of named terms, written
//! as `+`-separated `<coefficient><symbol>` pairs, e.g. `1log10+2mcd` or
//! plain `4`. Symbols: `log10`, `log2`, `ln` (of the cluster's node
//! count), `mcd` (its minimum induced degree at evaluation time) and `k`
//! (the clusterer's IKC parameter, zero for every other clusterer). The
//! empty expression is the zero function.

use std::str::FromStr;

use thiserror::Error;

use crate::{clusterer::Clusterer, view::ClusterView};

/// Errors raised while parsing a threshold expression.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum ThresholdParseError {
    /// A `+`-separated term was empty.
    #[error("empty term in threshold expression `{expr}`")]
    EmptyTerm {
        /// The full expression being parsed.
        expr: String,
    },
    /// A term named a symbol without a leading coefficient.
    #[error("term `{term}` is missing its coefficient")]
    MissingCoefficient {
        /// The offending term.
        term: String,
    },
    /// A coefficient was not a valid number.
    #[error("term `{term}` has an unparseable coefficient")]
    InvalidCoefficient {
        /// The offending term.
        term: String,
    },
    /// A coefficient was negative or non-finite.
    #[error("coefficient in term `{term}` must be finite and non-negative")]
    CoefficientOutOfRange {
        /// The offending term.
        term: String,
    },
    /// A term named an unknown symbol.
    #[error("unknown symbol `{symbol}` in term `{term}`")]
    UnknownSymbol {
        /// The offending term.
        term: String,
        /// The unrecognized symbol.
        symbol: String,
    },
}

/// A parsed connectivity requirement.
///
/// # Examples
/// ```
/// use recut_core::MincutRequirement;
///
/// let requirement: MincutRequirement = "1log10+2mcd+0.5".parse().expect("expression is valid");
/// assert_ne!(requirement, MincutRequirement::default());
/// assert_eq!("".parse::<MincutRequirement>().expect("empty is the zero function"),
///            MincutRequirement::default());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MincutRequirement {
    constant: f64,
    log10: f64,
    log2: f64,
    ln: f64,
    mcd: f64,
    k: f64,
}

impl MincutRequirement {
    /// Evaluates the requirement against a realized cluster, producing the
    /// validity threshold its mincut must strictly exceed.
    ///
    /// The `log*` terms apply to the view's node count (clamped to one so
    /// the logs stay finite), `mcd` to its minimum induced degree at this
    /// moment, and `k` to the clusterer's IKC parameter when it has one.
    #[must_use]
    pub fn validity_threshold<C>(&self, clusterer: &C, view: &ClusterView) -> f64
    where
        C: Clusterer + ?Sized,
    {
        let n = view.n().max(1) as f64;
        let k = clusterer.k().map_or(0.0, f64::from);
        self.constant
            + self.log10 * n.log10()
            + self.log2 * n.log2()
            + self.ln * n.ln()
            + self.mcd * view.mcd() as f64
            + self.k * k
    }
}

impl FromStr for MincutRequirement {
    type Err = ThresholdParseError;

    fn from_str(expr: &str) -> Result<Self, Self::Err> {
        let compact: String = expr.chars().filter(|c| !c.is_whitespace()).collect();
        let mut requirement = Self::default();
        if compact.is_empty() {
            return Ok(requirement);
        }
        for term in compact.split('+') {
            if term.is_empty() {
                return Err(ThresholdParseError::EmptyTerm {
                    expr: expr.to_owned(),
                });
            }
            let split = term
                .char_indices()
                .find_map(|(at, c)| c.is_alphabetic().then_some(at))
                .unwrap_or(term.len());
            let (number, symbol) = term.split_at(split);
            if number.is_empty() {
                return Err(ThresholdParseError::MissingCoefficient {
                    term: term.to_owned(),
                });
            }
            let coefficient: f64 =
                number
                    .parse()
                    .map_err(|_| ThresholdParseError::InvalidCoefficient {
                        term: term.to_owned(),
                    })?;
            if !coefficient.is_finite() || coefficient < 0.0 {
                return Err(ThresholdParseError::CoefficientOutOfRange {
                    term: term.to_owned(),
                });
            }
            let slot = match symbol {
                "" => &mut requirement.constant,
                "log10" => &mut requirement.log10,
                "log2" => &mut requirement.log2,
                "ln" => &mut requirement.ln,
                "mcd" => &mut requirement.mcd,
                "k" => &mut requirement.k,
                _ => {
                    return Err(ThresholdParseError::UnknownSymbol {
                        term: term.to_owned(),
                        symbol: symbol.to_owned(),
                    });
                }
            };
            *slot += coefficient;
        }
        Ok(requirement)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::{
        ClusterIndex, ClusterView, GlobalGraph, IntangibleCluster,
        error::ClustererError,
    };

    use super::*;

    struct PlainClusterer;

    impl Clusterer for PlainClusterer {
        fn name(&self) -> &str {
            "plain"
        }

        fn cluster(
            &self,
            _view: &ClusterView,
        ) -> Result<Vec<IntangibleCluster>, ClustererError> {
            Ok(Vec::new())
        }

        fn from_existing_clustering(
            &self,
            _path: &std::path::Path,
        ) -> Result<Vec<IntangibleCluster>, ClustererError> {
            Ok(Vec::new())
        }
    }

    struct KClusterer(u32);

    impl Clusterer for KClusterer {
        fn name(&self) -> &str {
            "k"
        }

        fn cluster(
            &self,
            _view: &ClusterView,
        ) -> Result<Vec<IntangibleCluster>, ClustererError> {
            Ok(Vec::new())
        }

        fn from_existing_clustering(
            &self,
            _path: &std::path::Path,
        ) -> Result<Vec<IntangibleCluster>, ClustererError> {
            Ok(Vec::new())
        }

        fn requires_positive_modularity(&self) -> bool {
            true
        }

        fn k(&self) -> Option<u32> {
            Some(self.0)
        }
    }

    fn hundred_node_clique_view() -> ClusterView {
        let members: Vec<u32> = (0..100).collect();
        let mut edges = Vec::new();
        for u in 0..100u32 {
            for v in (u + 1)..100 {
                edges.push((u, v));
            }
        }
        let graph = GlobalGraph::from_edges(edges);
        ClusterView::realize(&graph, ClusterIndex::new("0"), &members)
    }

    #[test]
    fn empty_expression_is_the_zero_function() {
        let requirement: MincutRequirement = "".parse().expect("empty must parse");
        let view = hundred_node_clique_view();
        assert_eq!(requirement.validity_threshold(&PlainClusterer, &view), 0.0);
    }

    #[rstest]
    #[case::constant("4", 4.0)]
    #[case::log10("1log10", 2.0)]
    #[case::log2_scaled("0.5log2", 0.5 * 100f64.log2())]
    #[case::ln("2ln", 2.0 * 100f64.ln())]
    #[case::mcd("1mcd", 99.0)]
    #[case::sum("1log10+2mcd+0.5", 2.0 + 198.0 + 0.5)]
    #[case::whitespace(" 1 log10 + 3 ", 5.0)]
    #[case::repeated_terms("1+2", 3.0)]
    fn evaluates_terms_against_the_view(#[case] expr: &str, #[case] expected: f64) {
        let requirement: MincutRequirement = expr.parse().expect("expression must parse");
        let view = hundred_node_clique_view();
        let got = requirement.validity_threshold(&PlainClusterer, &view);
        assert!((got - expected).abs() < 1e-9, "{expr}: {got} != {expected}");
    }

    #[test]
    fn k_term_sees_the_clusterer_parameter() {
        let requirement: MincutRequirement = "1k".parse().expect("expression must parse");
        let view = hundred_node_clique_view();
        assert_eq!(requirement.validity_threshold(&KClusterer(10), &view), 10.0);
        assert_eq!(requirement.validity_threshold(&PlainClusterer, &view), 0.0);
    }

    #[rstest]
    #[case::dangling_plus("1+")]
    #[case::bare_symbol("log10")]
    #[case::negative("-3")]
    #[case::gibberish("1quux")]
    #[case::scientific("1e3")]
    fn rejects_malformed_expressions(#[case] expr: &str) {
        assert!(expr.parse::<MincutRequirement>().is_err(), "{expr} must fail");
    }
}
