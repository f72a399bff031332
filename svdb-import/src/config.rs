use std::collections::{BTreeMap, BTreeSet};
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use svdb_core::models::{Genotype, Sv, SvType};
use svdb_grouping::PriorityPolicy;

use crate::errors::{ImportError, Result};

pub const DEFAULT_ANNOTATION_DISTANCE: f64 = 0.5;

#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct ImportConfig {
    pub params: Params,
    #[serde(default)]
    pub priority: PriorityPolicy,
    #[serde(default)]
    pub filters: Filters,
    #[serde(default)]
    pub annotation: AnnotationConfig,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct Params {
    /// Deduplication and carrier similarity cutoff.
    pub distance: f64,
}

///
/// Which calls enter the import. A call must pass all three checks.
///
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
#[serde(default)]
pub struct Filters {
    /// `None` selects the autosomes 0 to 22 plus X and Y, bare or
    /// `chr`-prefixed.
    pub chromosomes: Option<BTreeSet<String>>,
    pub sv_types: Vec<SvType>,
    pub genotypes: Vec<Genotype>,
}

impl Default for Filters {
    fn default() -> Self {
        Filters {
            chromosomes: None,
            sv_types: vec![SvType::Loss, SvType::Gain, SvType::Inv],
            genotypes: vec![Genotype::Hom, Genotype::Het],
        }
    }
}

fn is_default_chromosome(chrom: &str) -> bool {
    let bare = chrom.strip_prefix("chr").unwrap_or(chrom);
    match bare {
        "X" | "Y" => true,
        // "0" is in the list, "01" is not
        _ => bare
            .parse::<u8>()
            .is_ok_and(|n| n < 23 && n.to_string() == bare),
    }
}

impl Filters {
    pub fn admits_chromosome(&self, chrom: &str) -> bool {
        match &self.chromosomes {
            Some(allowed) => allowed.contains(chrom),
            None => is_default_chromosome(chrom),
        }
    }

    pub fn admits(&self, sv: &Sv) -> bool {
        self.admits_chromosome(sv.interval.chrom())
            && self.sv_types.contains(&sv.sv_type)
            && self.genotypes.contains(&sv.genotype)
    }
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
#[serde(default)]
pub struct AnnotationConfig {
    pub distance: f64,
    pub references: Vec<ReferenceConfig>,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        AnnotationConfig {
            distance: DEFAULT_ANNOTATION_DISTANCE,
            references: vec![],
        }
    }
}

/// A named set of reference count tables, one per SV type.
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct ReferenceConfig {
    pub name: String,
    pub tables: BTreeMap<SvType, PathBuf>,
}

fn check_cutoff(field: &str, value: f64) -> Result<()> {
    if (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(ImportError::InvalidConfig(format!(
            "{field} must be in [0, 1), got {value}"
        )))
    }
}

impl ImportConfig {
    pub fn validate(&self) -> Result<()> {
        check_cutoff("params.distance", self.params.distance)?;
        check_cutoff("annotation.distance", self.annotation.distance)?;

        let mut names = BTreeSet::new();
        for reference in &self.annotation.references {
            if !names.insert(reference.name.as_str()) {
                return Err(ImportError::InvalidConfig(format!(
                    "duplicate reference name: {}",
                    reference.name
                )));
            }
        }
        Ok(())
    }

    /// Make relative reference table paths relative to `base`.
    fn resolve_paths(&mut self, base: &Path) {
        for reference in &mut self.annotation.references {
            for table in reference.tables.values_mut() {
                if table.is_relative() {
                    *table = base.join(&*table);
                }
            }
        }
    }
}

impl TryFrom<&Path> for ImportConfig {
    type Error = ImportError;

    fn try_from(path: &Path) -> Result<Self> {
        let yaml_str = read_to_string(path)?;
        let mut config: ImportConfig = serde_yaml::from_str(&yaml_str)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use svdb_core::models::{Filter, Interval};

    #[rstest]
    fn test_try_from_yaml() {
        let path = PathBuf::from("../tests/data/import/config.yml");
        let config = ImportConfig::try_from(path.as_path()).unwrap();

        assert_eq!(config.params.distance, 0.1);
        assert_eq!(config.priority, PriorityPolicy::default());
        assert_eq!(config.filters, Filters::default());
        assert_eq!(config.annotation.references.len(), 1);

        let reference = &config.annotation.references[0];
        assert_eq!(reference.name, "dbvar");
        assert_eq!(
            reference.tables.get(&SvType::Loss),
            Some(&PathBuf::from("../tests/data/import/dbvar_loss.bed"))
        );
    }

    #[rstest]
    fn test_defaults_from_minimal_yaml() {
        let config: ImportConfig = serde_yaml::from_str("params:\n  distance: 0.2\n").unwrap();
        assert_eq!(config.annotation.distance, DEFAULT_ANNOTATION_DISTANCE);
        assert_eq!(config.priority.deprioritized_sources, vec!["canvas"]);
        assert!(config.validate().is_ok());
    }

    #[rstest]
    fn test_missing_distance_is_an_error() {
        let result = serde_yaml::from_str::<ImportConfig>("filters:\n  sv_types: [LOSS]\n");
        assert!(result.is_err());
    }

    #[rstest]
    #[case(1.0)]
    #[case(-0.5)]
    fn test_validate_rejects_distance(#[case] distance: f64) {
        let config = ImportConfig {
            params: Params { distance },
            priority: PriorityPolicy::default(),
            filters: Filters::default(),
            annotation: AnnotationConfig::default(),
        };
        assert!(matches!(config.validate(), Err(ImportError::InvalidConfig(_))));
    }

    #[rstest]
    fn test_validate_rejects_duplicate_reference_names() {
        let yaml = "params:\n  distance: 0.1\nannotation:\n  references:\n    - name: a\n      tables: {}\n    - name: a\n      tables: {}\n";
        let config: ImportConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(config.validate(), Err(ImportError::InvalidConfig(_))));
    }

    #[rstest]
    #[case("1", true)]
    #[case("chr22", true)]
    #[case("chr0", true)]
    #[case("X", true)]
    #[case("chrY", true)]
    #[case("chr23", false)]
    #[case("chrM", false)]
    #[case("01", false)]
    #[case("chr1_KI270706v1_random", false)]
    fn test_default_chromosomes(#[case] chrom: &str, #[case] admitted: bool) {
        assert_eq!(Filters::default().admits_chromosome(chrom), admitted);
    }

    #[rstest]
    fn test_filters_admit() {
        let filters = Filters::default();
        let call = |sv_type, genotype| {
            Sv::new(
                Interval::new("chr1", 10, 20).unwrap(),
                sv_type,
                Filter::Pass,
                "manta",
                "x",
                genotype,
            )
        };
        assert!(filters.admits(&call(SvType::Loss, Genotype::Het)));
        assert!(!filters.admits(&call(SvType::Ins, Genotype::Het)));
        assert!(!filters.admits(&call(SvType::Gain, Genotype::Ref)));
    }
}
