#![allow(dead_code)]

use fw_core::{
    FcType, KindProbe, ProbeFailure, ProbeRequest, Procedure, Resolver, TypeCatalog, TypeTables,
};

/// Maps every kind to the first candidate C type.
pub struct FirstCandidate;

impl KindProbe for FirstCandidate {
    fn probe(&self, requests: &[ProbeRequest]) -> Result<Vec<FcType>, ProbeFailure> {
        requests
            .iter()
            .map(|req| {
                req.candidates
                    .first()
                    .copied()
                    .ok_or_else(|| -> ProbeFailure {
                        format!("no candidates for {}", req.type_name).into()
                    })
            })
            .collect()
    }
}

pub fn resolve(procs: &[Procedure]) -> TypeCatalog {
    Resolver::new(TypeTables::standard())
        .resolve(procs, &FirstCandidate)
        .expect("resolution with an in-memory probe")
}
