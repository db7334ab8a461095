use serde::Deserialize;
use serde::Serialize;

/// How settled a read or write must be before the ledger reports it.
///
/// Variants are ordered from weakest to strongest, so a status observed at
/// `Finalized` also satisfies a request for `Confirmed`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Commitment {
    #[default]
    Processed,
    Confirmed,
    Finalized,
}

impl Commitment {
    /// Returns true when a transaction observed at `observed` meets this level.
    pub fn is_met_by(self, observed: Commitment) -> bool {
        observed >= self
    }
}
