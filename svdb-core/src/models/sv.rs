use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::IntervalError;
use crate::models::{GenomicSpan, Interval};

/// Structural-variant class, as translated from the caller's own vocabulary.
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "UPPERCASE")
)]
pub enum SvType {
    Loss,
    Gain,
    Inv,
    Ins,
    Ref,
    Unknown,
}

impl SvType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SvType::Loss => "LOSS",
            SvType::Gain => "GAIN",
            SvType::Inv => "INV",
            SvType::Ins => "INS",
            SvType::Ref => "REF",
            SvType::Unknown => "UNKNOWN",
        }
    }
}

impl FromStr for SvType {
    type Err = IntervalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LOSS" => Ok(SvType::Loss),
            "GAIN" => Ok(SvType::Gain),
            "INV" => Ok(SvType::Inv),
            "INS" => Ok(SvType::Ins),
            "REF" => Ok(SvType::Ref),
            "UNKNOWN" => Ok(SvType::Unknown),
            _ => Err(IntervalError::UnknownSvType(s.to_string())),
        }
    }
}

impl Display for SvType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "UPPERCASE")
)]
pub enum Genotype {
    Hom,
    Het,
    Ref,
    Unknown,
}

impl Genotype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Genotype::Hom => "HOM",
            Genotype::Het => "HET",
            Genotype::Ref => "REF",
            Genotype::Unknown => "UNKNOWN",
        }
    }
}

impl FromStr for Genotype {
    type Err = IntervalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "HOM" => Ok(Genotype::Hom),
            "HET" => Ok(Genotype::Het),
            "REF" => Ok(Genotype::Ref),
            "UNKNOWN" => Ok(Genotype::Unknown),
            _ => Err(IntervalError::UnknownGenotype(s.to_string())),
        }
    }
}

impl Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// VCF FILTER status of a call. Anything other than `PASS` is kept verbatim.
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub enum Filter {
    Pass,
    Failed(String),
}

impl Filter {
    pub fn is_pass(&self) -> bool {
        matches!(self, Filter::Pass)
    }
}

impl FromStr for Filter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PASS" => Ok(Filter::Pass),
            other => Ok(Filter::Failed(other.to_string())),
        }
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Pass => f.write_str("PASS"),
            Filter::Failed(reason) => f.write_str(reason),
        }
    }
}

/// Identity of a call: VCF ids are only unique within one caller's output,
/// so the caller name is part of the key.
#[derive(Eq, PartialEq, Hash, Debug, Clone, PartialOrd, Ord)]
pub struct CallId {
    pub source: String,
    pub vcf_id: String,
}

impl Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.vcf_id)
    }
}

///
/// One structural-variant call from one caller for one sample.
///
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Sv {
    pub interval: Interval,
    pub sv_type: SvType,
    pub filter: Filter,
    pub source: String,
    pub vcf_id: String,
    pub genotype: Genotype,
}

impl Sv {
    pub fn new(
        interval: Interval,
        sv_type: SvType,
        filter: Filter,
        source: impl Into<String>,
        vcf_id: impl Into<String>,
        genotype: Genotype,
    ) -> Self {
        Sv {
            interval,
            sv_type,
            filter,
            source: source.into(),
            vcf_id: vcf_id.into(),
            genotype,
        }
    }

    ///
    /// Catalog name, `{chrom}-{start}-{end}-{svtype}`. Calls of different types
    /// over the same span are distinct catalog entries.
    ///
    pub fn name(&self) -> String {
        format!("{}-{}", self.interval.name(), self.sv_type)
    }

    pub fn call_id(&self) -> CallId {
        CallId {
            source: self.source.clone(),
            vcf_id: self.vcf_id.clone(),
        }
    }
}

impl GenomicSpan for Sv {
    #[inline]
    fn interval(&self) -> &Interval {
        &self.interval
    }
}
