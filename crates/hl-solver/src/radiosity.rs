//! Radiosity network for longwave exchange between N gray surfaces.
//!
//! Each surface i satisfies the net-radiation balance
//!
//! ```text
//! (E_i − J_i)·ε_i/(1−ε_i) = Σ_j F_ij·(J_i − J_j)
//! ```
//!
//! assembled in emissivity-scaled form so that ε = 0 (a re-radiating
//! surface) stays well defined:
//!
//! ```text
//! [ε_i + (1−ε_i)·Σ_j F_ij]·J_i − (1−ε_i)·Σ_j F_ij·J_j = ε_i·σ·T_i⁴
//! ```

use std::collections::BTreeMap;

use hl_core::units::constants::{STEFAN_BOLTZMANN, blackbody_power};
use hl_core::{NameIndex, celsius_to_kelvin, ensure_kelvin, ensure_positive, ensure_unit_interval};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SolverError, SolverResult};
use crate::linear::solve_linear_system;

/// A radiating surface. Temperature is absolute (K).
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    pub name: String,
    /// Area (m²)
    pub area: f64,
    /// Longwave emissivity in [0, 1]
    pub emissivity: f64,
    /// Solar absorptance in [0, 1], where relevant
    pub absorptance: Option<f64>,
    /// Temperature (K)
    pub temperature: f64,
}

impl Surface {
    pub fn new(name: impl Into<String>, area: f64, emissivity: f64, temperature: f64) -> Self {
        Self {
            name: name.into(),
            area,
            emissivity,
            absorptance: None,
            temperature,
        }
    }

    pub fn with_absorptance(mut self, absorptance: f64) -> Self {
        self.absorptance = Some(absorptance);
        self
    }

    pub fn validate(&self) -> SolverResult<()> {
        ensure_positive(self.area, "surface area")?;
        ensure_unit_interval(self.emissivity, "surface emissivity")?;
        if let Some(a) = self.absorptance {
            ensure_unit_interval(a, "surface absorptance")?;
        }
        ensure_kelvin(self.temperature, "surface temperature")?;
        Ok(())
    }
}

/// Dense view-factor matrix; row i holds the fractions leaving surface i.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewFactors {
    f: DMatrix<f64>,
}

impl ViewFactors {
    /// Area-ratio approximation `F_ij = A_j / ΣA` for i ≠ j.
    ///
    /// A coarse stand-in for geometric view factors: it ignores orientation,
    /// distance and obstruction, and rows sum to less than one (no surface
    /// sees itself), so the set is not a closed enclosure.
    pub fn area_ratio(surfaces: &[Surface]) -> Self {
        let n = surfaces.len();
        let total: f64 = surfaces.iter().map(|s| s.area).sum();
        let f = DMatrix::from_fn(n, n, |i, j| {
            if i == j || total <= 0.0 {
                0.0
            } else {
                surfaces[j].area / total
            }
        });
        Self { f }
    }

    /// Build from named `(from, to) -> F` pairs; unlisted pairs are zero.
    pub fn from_pairs<'a, I>(index: &NameIndex, pairs: I) -> SolverResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str, f64)>,
    {
        let n = index.len();
        let mut f = DMatrix::zeros(n, n);
        for (from, to, value) in pairs {
            let i = index.idx(from).ok_or_else(|| SolverError::UnknownName {
                name: from.to_string(),
                context: "view factors",
            })?;
            let j = index.idx(to).ok_or_else(|| SolverError::UnknownName {
                name: to.to_string(),
                context: "view factors",
            })?;
            f[(i, j)] = ensure_unit_interval(value, "view factor")?;
        }
        Ok(Self { f })
    }

    pub fn len(&self) -> usize {
        self.f.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.f.nrows() == 0
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.f[(i, j)]
    }

    /// Largest reciprocity defect `|A_i·F_ij − A_j·F_ji|` (m²).
    ///
    /// Diagnostic only: nothing enforces reciprocity.
    pub fn reciprocity_error(&self, surfaces: &[Surface]) -> f64 {
        let n = self.len().min(surfaces.len());
        let mut worst: f64 = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                let defect =
                    (surfaces[i].area * self.f[(i, j)] - surfaces[j].area * self.f[(j, i)]).abs();
                worst = worst.max(defect);
            }
        }
        worst
    }
}

/// Per-surface radiosity solution.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurfaceExchange {
    /// Radiosity J (W/m²)
    pub radiosity: f64,
    /// Net radiative flux leaving the surface (W/m²)
    pub net_flux: f64,
    /// Blackbody emissive power σ·T⁴ (W/m²), not scaled by emissivity
    pub emissive_power: f64,
}

/// Surfaces plus the view factors coupling them.
#[derive(Clone, Debug)]
pub struct RadiationSystem {
    pub surfaces: Vec<Surface>,
    pub view_factors: ViewFactors,
}

impl RadiationSystem {
    pub fn new(surfaces: Vec<Surface>, view_factors: ViewFactors) -> SolverResult<Self> {
        if view_factors.len() != surfaces.len() {
            return Err(SolverError::DimensionMismatch {
                what: format!(
                    "{} surfaces but {}x{} view factors",
                    surfaces.len(),
                    view_factors.len(),
                    view_factors.len()
                ),
            });
        }
        for surface in &surfaces {
            surface.validate()?;
        }
        Ok(Self {
            surfaces,
            view_factors,
        })
    }

    /// Surfaces coupled by the area-ratio approximation.
    pub fn with_area_ratio_view_factors(surfaces: Vec<Surface>) -> SolverResult<Self> {
        let view_factors = ViewFactors::area_ratio(&surfaces);
        Self::new(surfaces, view_factors)
    }

    /// Assemble `M·J = C`.
    pub fn assemble(&self) -> (DMatrix<f64>, DVector<f64>) {
        let n = self.surfaces.len();
        let mut m = DMatrix::zeros(n, n);
        let mut c = DVector::zeros(n);

        for (i, surface) in self.surfaces.iter().enumerate() {
            let eps = surface.emissivity;
            let reflect = 1.0 - eps;
            let mut row_sum = 0.0;
            for j in 0..n {
                if i != j {
                    let f_ij = self.view_factors.get(i, j);
                    m[(i, j)] = -reflect * f_ij;
                    row_sum += f_ij;
                }
            }
            m[(i, i)] = eps + reflect * row_sum;
            c[i] = eps * STEFAN_BOLTZMANN * surface.temperature.powi(4);
        }

        (m, c)
    }

    /// Solve for radiosities and derive net flux per surface, in surface order.
    pub fn solve(&self) -> SolverResult<Vec<SurfaceExchange>> {
        let (m, c) = self.assemble();
        let j = solve_linear_system(&m, &c)?;

        let exchanges: Vec<SurfaceExchange> = self
            .surfaces
            .iter()
            .zip(j.iter())
            .map(|(surface, &radiosity)| {
                let eps = surface.emissivity;
                let emissive_power = blackbody_power(surface.temperature);
                // A black surface has no surface resistance; reported as zero.
                let net_flux = if eps < 1.0 {
                    (emissive_power - radiosity) * eps / (1.0 - eps)
                } else {
                    0.0
                };
                SurfaceExchange {
                    radiosity,
                    net_flux,
                    emissive_power,
                }
            })
            .collect();

        debug!(surfaces = exchanges.len(), "radiosity system solved");
        Ok(exchanges)
    }
}

/// Caller-facing surface description (temperature in °C).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSpec {
    pub area: f64,
    pub emissivity: f64,
    /// Surface temperature (°C); the ambient temperature when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Solve longwave exchange between named surfaces using area-ratio view factors.
pub fn solve_radiation_exchange(
    surfaces: &BTreeMap<String, SurfaceSpec>,
    ambient_temp: f64,
) -> SolverResult<BTreeMap<String, SurfaceExchange>> {
    let index = NameIndex::from_names(surfaces.keys().cloned())?;
    let list: Vec<Surface> = surfaces
        .iter()
        .map(|(name, spec)| {
            Surface::new(
                name.clone(),
                spec.area,
                spec.emissivity,
                celsius_to_kelvin(spec.temperature.unwrap_or(ambient_temp)),
            )
        })
        .collect();

    let system = RadiationSystem::with_area_ratio_view_factors(list)?;
    let exchanges = system.solve()?;

    let mut out = BTreeMap::new();
    for (i, exchange) in exchanges.into_iter().enumerate() {
        out.insert(index.name(i)?.to_string(), exchange);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_plates(t1: f64, t2: f64, eps: f64) -> RadiationSystem {
        RadiationSystem::with_area_ratio_view_factors(vec![
            Surface::new("a", 10.0, eps, t1),
            Surface::new("b", 10.0, eps, t2),
        ])
        .unwrap()
    }

    #[test]
    fn identical_surfaces_exchange_nothing() {
        let out = two_plates(293.15, 293.15, 0.9).solve().unwrap();
        for ex in &out {
            assert!(ex.net_flux.abs() < 1e-9, "net flux {}", ex.net_flux);
            assert!((ex.radiosity - ex.emissive_power).abs() < 1e-9);
        }
    }

    #[test]
    fn hot_surface_loses_heat() {
        let out = two_plates(320.0, 280.0, 0.85).solve().unwrap();
        assert!(out[0].net_flux > 0.0);
        assert!(out[1].net_flux < 0.0);
        // Equal areas: what one loses the other gains.
        assert!((out[0].net_flux + out[1].net_flux).abs() < 1e-9);
    }

    #[test]
    fn black_surface_reports_zero_flux() {
        let out = two_plates(350.0, 280.0, 1.0).solve().unwrap();
        for ex in &out {
            assert_eq!(ex.net_flux, 0.0);
            assert!((ex.radiosity - ex.emissive_power).abs() < 1e-9);
        }
    }

    #[test]
    fn area_ratio_view_factors() {
        let surfaces = vec![
            Surface::new("floor", 20.0, 0.9, 295.0),
            Surface::new("ceiling", 20.0, 0.9, 293.0),
            Surface::new("window", 10.0, 0.84, 280.0),
        ];
        let vf = ViewFactors::area_ratio(&surfaces);
        assert_eq!(vf.get(0, 0), 0.0);
        assert!((vf.get(0, 1) - 0.4).abs() < 1e-12);
        assert!((vf.get(1, 2) - 0.2).abs() < 1e-12);
        assert!((vf.get(2, 0) - 0.4).abs() < 1e-12);
        assert!(vf.reciprocity_error(&surfaces) < 1e-12);
    }

    #[test]
    fn reciprocity_defect_is_reported() {
        let surfaces = vec![
            Surface::new("a", 2.0, 0.9, 300.0),
            Surface::new("b", 1.0, 0.9, 300.0),
        ];
        let index = NameIndex::from_names(["a", "b"]).unwrap();
        let vf = ViewFactors::from_pairs(&index, [("a", "b", 0.5), ("b", "a", 0.5)]).unwrap();
        // 2*0.5 - 1*0.5
        assert!((vf.reciprocity_error(&surfaces) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn from_pairs_rejects_unknown_names() {
        let index = NameIndex::from_names(["a", "b"]).unwrap();
        let err = ViewFactors::from_pairs(&index, [("a", "c", 0.5)]).unwrap_err();
        assert!(matches!(err, SolverError::UnknownName { .. }));
        let vf = ViewFactors::from_pairs(&index, [("a", "b", 1.0), ("b", "a", 1.0)]).unwrap();
        assert_eq!(vf.get(0, 1), 1.0);
        assert_eq!(vf.get(1, 1), 0.0);
    }

    #[test]
    fn invalid_surfaces_rejected_before_solve() {
        let bad_eps = RadiationSystem::with_area_ratio_view_factors(vec![Surface::new(
            "a", 1.0, 1.2, 300.0,
        )]);
        assert!(matches!(bad_eps, Err(SolverError::InvalidParameter(_))));

        let bad_area = RadiationSystem::with_area_ratio_view_factors(vec![Surface::new(
            "a", 0.0, 0.9, 300.0,
        )]);
        assert!(matches!(bad_area, Err(SolverError::InvalidParameter(_))));

        let bad_temp = RadiationSystem::with_area_ratio_view_factors(vec![Surface::new(
            "a", 1.0, 0.9, -1.0,
        )]);
        assert!(matches!(bad_temp, Err(SolverError::InvalidParameter(_))));
    }

    #[test]
    fn reradiating_surfaces_alone_are_singular() {
        let system = two_plates(300.0, 290.0, 0.0);
        assert!(matches!(
            system.solve(),
            Err(SolverError::SingularSystem { dim: 2 })
        ));
    }

    #[test]
    fn named_exchange_uses_ambient_default() {
        let mut surfaces = BTreeMap::new();
        surfaces.insert(
            "floor".to_string(),
            SurfaceSpec {
                area: 20.0,
                emissivity: 0.9,
                temperature: None,
            },
        );
        surfaces.insert(
            "ceiling".to_string(),
            SurfaceSpec {
                area: 20.0,
                emissivity: 0.9,
                temperature: Some(20.0),
            },
        );
        let out = solve_radiation_exchange(&surfaces, 20.0).unwrap();
        assert_eq!(out.len(), 2);
        for ex in out.values() {
            assert!(ex.net_flux.abs() < 1e-9);
        }
    }
}
