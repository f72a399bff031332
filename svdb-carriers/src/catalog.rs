//! The cohort catalog: one row per distinct SV, the patients, and one row per
//! (patient, SV) call.
//!
//! [`Catalog`] is the persistence seam; [`MemoryCatalog`] keeps everything in
//! memory with an ordered index on `(chrom, sv_type, start, end)` so the
//! carrier range query never scans the whole catalog.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

use fxhash::FxHashMap as HashMap;

use svdb_core::models::{Filter, Genotype, Interval, Sv, SvType};

use crate::errors::{CarrierError, Result};

pub type SvId = u32;
pub type PatientId = u32;

/// Named annotation values; `None` marks an annotation that does not apply
/// to the SV type.
pub type Annotations = BTreeMap<String, Option<u64>>;

#[derive(Debug, Clone, PartialEq)]
pub struct SvRecord {
    pub id: SvId,
    pub name: String,
    pub interval: Interval,
    pub sv_type: SvType,
    pub n_carriers: Option<usize>,
    pub annotations: Annotations,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patient {
    pub id: PatientId,
    pub name: String,
    pub family_id: String,
}

/// One patient's call of one catalog SV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientSv {
    pub patient_id: PatientId,
    pub sv_id: SvId,
    pub genotype: Genotype,
    pub vcf_id: String,
    pub source: String,
    pub filter: Filter,
    pub is_duplicate: bool,
}

/// A catalog SV joined with the family of one patient carrying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarrierHit<'a> {
    pub sv_id: SvId,
    pub start: u32,
    pub end: u32,
    pub family_id: &'a str,
}

pub trait Catalog {
    /// Register a patient, or return the id of the patient with that name.
    fn insert_patient(&mut self, name: &str, family_id: &str) -> PatientId;

    fn find_patient(&self, name: &str) -> Option<PatientId>;

    fn patient(&self, id: PatientId) -> Option<&Patient>;

    /// Add an SV row keyed by [`Sv::name`], or return the existing row's id.
    fn insert_if_absent(&mut self, sv: &Sv) -> SvId;

    fn find_by_name(&self, name: &str) -> Option<SvId>;

    fn sv(&self, id: SvId) -> Option<&SvRecord>;

    fn svs<'a>(&'a self) -> Box<dyn Iterator<Item = &'a SvRecord> + 'a>;

    fn set_annotations(&mut self, id: SvId, annotations: Annotations) -> Result<()>;

    fn insert_patient_sv(&mut self, row: PatientSv) -> Result<()>;

    fn patient_svs<'a>(&'a self) -> Box<dyn Iterator<Item = &'a PatientSv> + 'a>;

    /// Carriers of every SV of `sv_type` on `chrom` whose start and end fall
    /// in the given ranges, one hit per (SV, patient call).
    fn range_query<'a>(
        &'a self,
        chrom: &str,
        sv_type: SvType,
        start: RangeInclusive<u32>,
        end: RangeInclusive<u32>,
    ) -> Box<dyn Iterator<Item = CarrierHit<'a>> + 'a>;

    fn update_carrier_count(&mut self, id: SvId, count: usize) -> Result<()>;
}

type IndexKey = (String, SvType, u32, u32, SvId);

///
/// In-memory [`Catalog`]. Ids are assigned sequentially from 1.
///
#[derive(Debug, Default, Clone)]
pub struct MemoryCatalog {
    svs: Vec<SvRecord>,
    sv_by_name: HashMap<String, SvId>,
    index: BTreeSet<IndexKey>,
    patients: Vec<Patient>,
    patient_by_name: HashMap<String, PatientId>,
    patient_svs: Vec<PatientSv>,
    calls_by_sv: HashMap<SvId, Vec<usize>>,
}

fn slot(id: u32) -> Option<usize> {
    (id as usize).checked_sub(1)
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.svs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.svs.is_empty()
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    fn sv_mut(&mut self, id: SvId) -> Result<&mut SvRecord> {
        slot(id)
            .and_then(|i| self.svs.get_mut(i))
            .ok_or(CarrierError::UnknownSv(id))
    }
}

impl Catalog for MemoryCatalog {
    fn insert_patient(&mut self, name: &str, family_id: &str) -> PatientId {
        if let Some(&id) = self.patient_by_name.get(name) {
            return id;
        }
        let id = self.patients.len() as PatientId + 1;
        self.patients.push(Patient {
            id,
            name: name.to_string(),
            family_id: family_id.to_string(),
        });
        self.patient_by_name.insert(name.to_string(), id);
        id
    }

    fn find_patient(&self, name: &str) -> Option<PatientId> {
        self.patient_by_name.get(name).copied()
    }

    fn patient(&self, id: PatientId) -> Option<&Patient> {
        slot(id).and_then(|i| self.patients.get(i))
    }

    fn insert_if_absent(&mut self, sv: &Sv) -> SvId {
        let name = sv.name();
        if let Some(&id) = self.sv_by_name.get(&name) {
            return id;
        }

        let id = self.svs.len() as SvId + 1;
        self.index.insert((
            sv.interval.chrom().to_string(),
            sv.sv_type,
            sv.interval.start(),
            sv.interval.end(),
            id,
        ));
        self.sv_by_name.insert(name.clone(), id);
        self.svs.push(SvRecord {
            id,
            name,
            interval: sv.interval.clone(),
            sv_type: sv.sv_type,
            n_carriers: None,
            annotations: Annotations::new(),
        });
        id
    }

    fn find_by_name(&self, name: &str) -> Option<SvId> {
        self.sv_by_name.get(name).copied()
    }

    fn sv(&self, id: SvId) -> Option<&SvRecord> {
        slot(id).and_then(|i| self.svs.get(i))
    }

    fn svs<'a>(&'a self) -> Box<dyn Iterator<Item = &'a SvRecord> + 'a> {
        Box::new(self.svs.iter())
    }

    fn set_annotations(&mut self, id: SvId, annotations: Annotations) -> Result<()> {
        self.sv_mut(id)?.annotations = annotations;
        Ok(())
    }

    fn insert_patient_sv(&mut self, row: PatientSv) -> Result<()> {
        if self.sv(row.sv_id).is_none() {
            return Err(CarrierError::UnknownSv(row.sv_id));
        }
        if self.patient(row.patient_id).is_none() {
            return Err(CarrierError::UnknownPatient(row.patient_id));
        }
        self.calls_by_sv
            .entry(row.sv_id)
            .or_default()
            .push(self.patient_svs.len());
        self.patient_svs.push(row);
        Ok(())
    }

    fn patient_svs<'a>(&'a self) -> Box<dyn Iterator<Item = &'a PatientSv> + 'a> {
        Box::new(self.patient_svs.iter())
    }

    fn range_query<'a>(
        &'a self,
        chrom: &str,
        sv_type: SvType,
        start: RangeInclusive<u32>,
        end: RangeInclusive<u32>,
    ) -> Box<dyn Iterator<Item = CarrierHit<'a>> + 'a> {
        if start.is_empty() || end.is_empty() {
            return Box::new(std::iter::empty());
        }

        let lower = (chrom.to_string(), sv_type, *start.start(), u32::MIN, SvId::MIN);
        let upper = (chrom.to_string(), sv_type, *start.end(), u32::MAX, SvId::MAX);

        let hits = self
            .index
            .range(lower..=upper)
            .filter(move |(_, _, _, sv_end, _)| end.contains(sv_end))
            .flat_map(move |&(_, _, sv_start, sv_end, sv_id)| {
                self.calls_by_sv
                    .get(&sv_id)
                    .into_iter()
                    .flatten()
                    .filter_map(move |&row| {
                        let patient = self.patient(self.patient_svs[row].patient_id)?;
                        Some(CarrierHit {
                            sv_id,
                            start: sv_start,
                            end: sv_end,
                            family_id: patient.family_id.as_str(),
                        })
                    })
            });

        Box::new(hits)
    }

    fn update_carrier_count(&mut self, id: SvId, count: usize) -> Result<()> {
        self.sv_mut(id)?.n_carriers = Some(count);
        Ok(())
    }
}
