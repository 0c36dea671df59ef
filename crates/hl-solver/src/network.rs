//! Steady conductance network for multi-zone temperatures.
//!
//! Unknowns are zone temperatures (°C). For zone i with conductances `G_ij`
//! to its neighbours:
//!
//! ```text
//! (S_i + w_i)·T_i − Σ_j G_ij·T_j = Φ_i + w_i·T_b,i      S_i = Σ_j G_ij
//! ```
//!
//! where `w_i` is non-zero only for zones carrying a boundary temperature
//! `T_b,i`. The boundary enters as a Robin coupling to a reservoir, not as a
//! Dirichlet constraint: a connected boundary zone settles within `O(1/λ)` of
//! its boundary value, an isolated one lands on it exactly.

use std::collections::BTreeMap;

use hl_core::{HlError, NameIndex, ensure_finite, ensure_non_negative};
use nalgebra::{DMatrix, DVector};
use tracing::{debug, warn};

use crate::error::{SolverError, SolverResult};
use crate::linear::solve_linear_system;

/// Network assembly options.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkOptions {
    /// Boundary coupling λ: a boundary zone is tied to its reservoir with
    /// conductance `λ·S_i` (or `λ·1 W/K` when it has no other conductance).
    /// Zero reproduces the bare Laplacian, which is singular for every
    /// connected network.
    pub boundary_coupling: f64,
}

impl Default for NetworkOptions {
    fn default() -> Self {
        Self {
            boundary_coupling: 1e6,
        }
    }
}

/// Zones, conductances, boundary temperatures and heat sources, indexed.
#[derive(Clone, Debug)]
pub struct ThermalNetwork {
    index: NameIndex,
    /// Symmetric conductance matrix (W/K), zero diagonal
    conductance: DMatrix<f64>,
    /// Pairs whose conductance has been set, zero included
    given: DMatrix<bool>,
    /// Boundary temperature per zone (°C)
    boundary: Vec<Option<f64>>,
    /// Internal heat source per zone (W)
    sources: Vec<f64>,
    options: NetworkOptions,
}

impl ThermalNetwork {
    /// Create a network over the given zones with no links.
    pub fn new<I, S>(zones: I) -> SolverResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let index = NameIndex::from_names(zones)?;
        let n = index.len();
        Ok(Self {
            index,
            conductance: DMatrix::zeros(n, n),
            given: DMatrix::from_element(n, n, false),
            boundary: vec![None; n],
            sources: vec![0.0; n],
            options: NetworkOptions::default(),
        })
    }

    pub fn with_options(mut self, options: NetworkOptions) -> Self {
        self.options = options;
        self
    }

    fn zone_idx(&self, name: &str, context: &'static str) -> SolverResult<usize> {
        self.index.idx(name).ok_or_else(|| SolverError::UnknownName {
            name: name.to_string(),
            context,
        })
    }

    /// Set the conductance between two zones (order irrelevant).
    ///
    /// Supplying the same pair twice with different values is an error.
    pub fn set_conductance(&mut self, a: &str, b: &str, g: f64) -> SolverResult<()> {
        let i = self.zone_idx(a, "conductances")?;
        let j = self.zone_idx(b, "conductances")?;
        if i == j {
            return Err(HlError::InvalidArg {
                what: "conductance from a zone to itself",
            }
            .into());
        }
        ensure_non_negative(g, "conductance")?;

        if self.given[(i, j)] && self.conductance[(i, j)] != g {
            return Err(HlError::InvalidParameter {
                what: "conductance",
                value: g,
                reason: "pair already given with a different value",
            }
            .into());
        }
        self.conductance[(i, j)] = g;
        self.conductance[(j, i)] = g;
        self.given[(i, j)] = true;
        self.given[(j, i)] = true;
        Ok(())
    }

    pub fn set_boundary(&mut self, zone: &str, temperature: f64) -> SolverResult<()> {
        let i = self.zone_idx(zone, "boundary temperatures")?;
        self.boundary[i] = Some(ensure_finite(temperature, "boundary temperature")?);
        Ok(())
    }

    pub fn set_source(&mut self, zone: &str, power: f64) -> SolverResult<()> {
        let i = self.zone_idx(zone, "heat sources")?;
        self.sources[i] = ensure_finite(power, "heat source")?;
        Ok(())
    }

    pub fn zone_count(&self) -> usize {
        self.index.len()
    }

    pub fn zones(&self) -> &[String] {
        self.index.names()
    }

    /// Conductance between two zones by index.
    pub fn conductance(&self, i: usize, j: usize) -> f64 {
        self.conductance[(i, j)]
    }

    /// Assemble the stiffness matrix `K` and right-hand side `Q`.
    pub fn assemble(&self) -> SolverResult<(DMatrix<f64>, DVector<f64>)> {
        let lambda = ensure_non_negative(self.options.boundary_coupling, "boundary coupling")?;
        let n = self.zone_count();
        let mut k = DMatrix::zeros(n, n);
        let mut q = DVector::zeros(n);

        for i in 0..n {
            let mut sum = 0.0;
            for j in 0..n {
                if i != j {
                    let g = self.conductance[(i, j)];
                    k[(i, j)] = -g;
                    sum += g;
                }
            }
            k[(i, i)] = sum;

            if let Some(t_b) = self.boundary[i] {
                let w = lambda * if sum > 0.0 { sum } else { 1.0 };
                k[(i, i)] += w;
                q[i] += w * t_b;
            }
            q[i] += self.sources[i];
        }

        Ok((k, q))
    }

    /// Solve for every zone temperature (°C), keyed by zone name.
    pub fn solve(&self) -> SolverResult<BTreeMap<String, f64>> {
        let (k, q) = self.assemble()?;
        let t = solve_linear_system(&k, &q).inspect_err(|e| {
            warn!(zones = self.zone_count(), error = %e, "conduction network solve failed");
        })?;

        debug!(zones = self.zone_count(), "conduction network solved");
        Ok(self
            .index
            .names()
            .iter()
            .cloned()
            .zip(t.iter().copied())
            .collect())
    }
}

/// Solve a multi-zone conductance network given by names.
///
/// `conductances` lists `(zone_a, zone_b, W/K)`; pairs not listed conduct
/// nothing.
pub fn solve_multi_zone_temperatures(
    zones: &[String],
    conductances: &[(String, String, f64)],
    boundary_temps: &BTreeMap<String, f64>,
    heat_sources: &BTreeMap<String, f64>,
) -> SolverResult<BTreeMap<String, f64>> {
    solve_multi_zone_temperatures_with(
        zones,
        conductances,
        boundary_temps,
        heat_sources,
        &NetworkOptions::default(),
    )
}

/// [`solve_multi_zone_temperatures`] with explicit assembly options.
pub fn solve_multi_zone_temperatures_with(
    zones: &[String],
    conductances: &[(String, String, f64)],
    boundary_temps: &BTreeMap<String, f64>,
    heat_sources: &BTreeMap<String, f64>,
    options: &NetworkOptions,
) -> SolverResult<BTreeMap<String, f64>> {
    let mut network = ThermalNetwork::new(zones.iter().cloned())?.with_options(options.clone());
    for (a, b, g) in conductances {
        network.set_conductance(a, b, *g)?;
    }
    for (zone, &t) in boundary_temps {
        network.set_boundary(zone, t)?;
    }
    for (zone, &p) in heat_sources {
        network.set_source(zone, p)?;
    }
    network.solve()
}
