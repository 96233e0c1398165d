use futures::future::try_join_all;
use itertools::Itertools;

use crate::api::AbstractApi;
use crate::error::{Error, Result};
use crate::logic::lookup::{Lookup, LookupOutput};
use crate::model::{Descriptor, Field};

/// A descriptor with every requested field filled in, plus the responses of
/// the lookups that filled them.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub descriptor: Descriptor,
    pub lookups: Vec<LookupOutput>,
}

impl Resolved {
    pub fn lookup_count(&self) -> usize {
        self.lookups.len()
    }
}

/// Lookups to run, grouped into stages. Lookups within a stage have no data
/// dependency on each other; each stage depends only on earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub stages: Vec<Vec<Lookup>>,
}

impl Plan {
    /// Work out the lookups needed to supply `needed` for `descriptor`.
    /// Fails before any request is made if a field cannot be derived.
    pub fn for_fields(descriptor: &Descriptor, needed: &[Field]) -> Result<Self> {
        descriptor.validate()?;
        let kind = descriptor.kind();

        let missing: Vec<(Field, Lookup)> = needed
            .iter()
            .copied()
            .filter(|field| !descriptor.has(*field))
            .map(|field| {
                Lookup::supplying(kind, field)
                    .map(|lookup| (field, lookup))
                    .ok_or_else(|| Error::invalid(kind, field))
            })
            .collect::<Result<_>>()?;

        let pending: Vec<Lookup> = missing.iter().map(|(_, lookup)| *lookup).unique().collect();

        // Every input must be on the descriptor already or produced by a
        // lookup in this plan.
        for (field, lookup) in &missing {
            let satisfiable = lookup.inputs().iter().all(|input| {
                descriptor.has(*input)
                    || pending
                        .iter()
                        .any(|other| other != lookup && other.outputs().contains(input))
            });
            if !satisfiable {
                return Err(Error::invalid(kind, *field));
            }
        }

        let mut stages = Vec::new();
        let mut pending = pending;
        while !pending.is_empty() {
            let waiting = pending.clone();
            let (ready, blocked): (Vec<Lookup>, Vec<Lookup>) = pending
                .into_iter()
                .partition(|lookup| lookup.after().iter().all(|dep| !waiting.contains(dep)));

            if ready.is_empty() {
                // Unreachable with an acyclic table; run the rest in order.
                stages.extend(blocked.into_iter().map(|lookup| vec![lookup]));
                break;
            }
            stages.push(ready);
            pending = blocked;
        }

        Ok(Self { stages })
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn lookups(&self) -> impl Iterator<Item = Lookup> + '_ {
        self.stages.iter().flatten().copied()
    }
}

/// Fills missing descriptor fields by issuing the dependent lookups the
/// lookup table prescribes.
pub struct Resolver<'a> {
    api: &'a AbstractApi,
}

impl<'a> Resolver<'a> {
    pub fn new(api: &'a AbstractApi) -> Self {
        Self { api }
    }

    /// Resolve `needed` on `descriptor`. Either every needed field ends up
    /// present on the returned descriptor or an error is returned; the
    /// caller's descriptor is never modified.
    pub async fn resolve(&self, descriptor: &Descriptor, needed: &[Field]) -> Result<Resolved> {
        let plan = Plan::for_fields(descriptor, needed)?;
        if plan.is_empty() {
            return Ok(Resolved {
                descriptor: descriptor.clone(),
                lookups: Vec::new(),
            });
        }

        log::debug!(
            "Resolving {:?} on {} descriptor via {:?}",
            needed,
            descriptor.kind(),
            plan.stages
        );

        let mut current = descriptor.clone();
        let mut lookups = Vec::new();

        for stage in &plan.stages {
            let outputs = try_join_all(stage.iter().map(|lookup| lookup.run(self.api, &current))).await?;

            let mut next = current.clone();
            for output in outputs {
                for field in output.lookup().outputs() {
                    if !next.has(*field) {
                        next = next.with_field(*field, output.value(*field)?);
                    }
                }
                lookups.push(output);
            }
            current = next;
        }

        for field in needed {
            current.require(*field)?;
        }

        Ok(Resolved {
            descriptor: current,
            lookups,
        })
    }
}
