//! The cohort import driver.
//!
//! Importing a cohort runs in three phases:
//!
//! 1. Per patient, in parallel: filter the calls, group them, mark the
//!    redundant calls of every group and annotate every call.
//! 2. Sequentially, in patient order: insert the calls into the catalog and
//!    record one patient call row per catalog SV.
//! 3. Once the catalog is complete: the carrier count pass.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use svdb_carriers::catalog::{Annotations, PatientId, PatientSv};
use svdb_carriers::{Catalog, annotate_carriers};
use svdb_core::models::{CallId, Sv};
use svdb_grouping::{deduplicate, group};

use crate::annotate::{SvAnnotator, annotate_sv};
use crate::config::{Filters, ImportConfig};
use crate::errors::{ImportError, Result};
use crate::io::PatientRecord;

/// One group's calls in retention order, with the calls it marks redundant.
#[derive(Debug, Clone)]
pub struct PlannedGroup {
    pub calls: Vec<Sv>,
    pub redundant: HashSet<CallId>,
}

///
/// Everything about one patient's import that does not touch the catalog.
///
#[derive(Debug, Clone)]
pub struct PatientPlan {
    pub patient_id: PatientId,
    pub patient: String,
    /// Admitted calls in input order, paired with their annotations.
    pub calls: Vec<(Sv, Annotations)>,
    pub dropped: usize,
    pub groups: Vec<PlannedGroup>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub patients: usize,
    pub calls: usize,
    pub dropped: usize,
    pub svs: usize,
    pub patient_svs: usize,
    pub duplicates: usize,
}

/// Drop the calls the filters do not admit.
pub fn filter_calls(patient: &str, calls: Vec<Sv>, filters: &Filters) -> Vec<Sv> {
    let total = calls.len();
    let admitted: Vec<Sv> = calls
        .into_iter()
        .filter(|sv| {
            let admitted = filters.admits(sv);
            if !admitted {
                debug!(patient, sv = %sv.name(), source = %sv.source, genotype = %sv.genotype, "dropping call");
            }
            admitted
        })
        .collect();

    let dropped = total - admitted.len();
    if dropped > 0 {
        warn!(patient, dropped, total, "calls dropped by chromosome, type or genotype filters");
    }
    admitted
}

///
/// Group, deduplicate and annotate one patient's calls.
///
pub fn plan_patient(
    patient_id: PatientId,
    patient: &str,
    calls: Vec<Sv>,
    config: &ImportConfig,
    annotators: &[Box<dyn SvAnnotator>],
) -> Result<PatientPlan> {
    let total = calls.len();
    let calls = filter_calls(patient, calls, &config.filters);
    let dropped = total - calls.len();

    let groups = group(calls.clone())?
        .iter()
        .map(|g| PlannedGroup {
            calls: config
                .priority
                .order(g.members())
                .into_iter()
                .cloned()
                .collect(),
            redundant: deduplicate(g, config.params.distance, &config.priority),
        })
        .collect();

    let calls = calls
        .into_iter()
        .map(|sv| {
            let annotations = annotate_sv(annotators, &sv);
            (sv, annotations)
        })
        .collect();

    Ok(PatientPlan {
        patient_id,
        patient: patient.to_string(),
        calls,
        dropped,
        groups,
    })
}

///
/// Write one patient's plan into the catalog.
///
/// Every call becomes (or maps onto) a catalog SV; new SVs receive their
/// annotations. Then, visiting the groups in order and each group's calls
/// in retention order, the first call to reach a given catalog SV yields the
/// patient's row for it, flagged if its group marked it redundant.
///
pub fn import_patient<C: Catalog + ?Sized>(catalog: &mut C, plan: PatientPlan) -> Result<ImportSummary> {
    let mut summary = ImportSummary {
        patients: 1,
        calls: plan.calls.len(),
        dropped: plan.dropped,
        ..Default::default()
    };

    for (sv, annotations) in plan.calls {
        if catalog.find_by_name(&sv.name()).is_some() {
            continue;
        }
        let sv_id = catalog.insert_if_absent(&sv);
        summary.svs += 1;
        if !annotations.is_empty() {
            catalog.set_annotations(sv_id, annotations)?;
        }
    }

    let mut done = HashSet::new();
    for planned in plan.groups {
        for sv in planned.calls {
            let name = sv.name();
            let sv_id = catalog
                .find_by_name(&name)
                .ok_or(ImportError::MissingCatalogRow(name))?;
            if !done.insert(sv_id) {
                continue;
            }

            let is_duplicate = planned.redundant.contains(&sv.call_id());
            if is_duplicate {
                summary.duplicates += 1;
            }
            catalog.insert_patient_sv(PatientSv {
                patient_id: plan.patient_id,
                sv_id,
                genotype: sv.genotype,
                vcf_id: sv.vcf_id,
                source: sv.source,
                filter: sv.filter,
                is_duplicate,
            })?;
            summary.patient_svs += 1;
        }
    }

    info!(
        patient = %plan.patient,
        calls = summary.calls,
        new_svs = summary.svs,
        rows = summary.patient_svs,
        duplicates = summary.duplicates,
        "imported patient"
    );

    Ok(summary)
}

///
/// Import a whole cohort and compute carrier counts.
///
/// Patients are registered in table order. Calls keyed by a patient absent
/// from `patients` are an error.
///
pub fn import_cohort<C: Catalog + Sync>(
    catalog: &mut C,
    patients: &[PatientRecord],
    mut calls: HashMap<String, Vec<Sv>>,
    config: &ImportConfig,
    annotators: &[Box<dyn SvAnnotator>],
) -> Result<ImportSummary> {
    config.validate()?;

    let known: HashSet<&str> = patients.iter().map(|p| p.name.as_str()).collect();
    let mut unknown: Vec<&String> = calls.keys().filter(|name| !known.contains(name.as_str())).collect();
    unknown.sort();
    if let Some(name) = unknown.first() {
        return Err(ImportError::UnknownPatient(name.to_string()));
    }

    let mut work = vec![];
    for patient in patients {
        let patient_id = catalog.insert_patient(&patient.name, &patient.family_id);
        let patient_calls = calls.remove(&patient.name).unwrap_or_default();
        work.push((patient_id, patient.name.as_str(), patient_calls));
    }

    info!(patients = work.len(), "planning patients");
    let plans = work
        .into_par_iter()
        .map(|(patient_id, name, patient_calls)| {
            plan_patient(patient_id, name, patient_calls, config, annotators)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut summary = ImportSummary::default();
    for plan in plans {
        let imported = import_patient(catalog, plan)?;
        summary.patients += imported.patients;
        summary.calls += imported.calls;
        summary.dropped += imported.dropped;
        summary.svs += imported.svs;
        summary.patient_svs += imported.patient_svs;
        summary.duplicates += imported.duplicates;
    }

    info!(svs = summary.svs, "computing carrier counts");
    annotate_carriers(catalog, config.params.distance)?;

    Ok(summary)
}
