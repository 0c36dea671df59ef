//! Project validation logic.

use crate::schema::{
    DesignCaseDef, EnvelopeDef, GlasshouseCaseDef, NetworkCaseDef, Project, RadiationCaseDef,
    TransientCaseDef,
};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Length mismatch: {field} has {actual} entries, expected {expected}")]
    LengthMismatch {
        field: String,
        actual: usize,
        expected: usize,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

type VResult = Result<(), ValidationError>;

fn invalid(field: String, value: f64, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn finite(field: impl Fn() -> String, v: f64) -> VResult {
    if v.is_finite() {
        Ok(())
    } else {
        Err(invalid(field(), v, "must be finite"))
    }
}

fn positive(field: impl Fn() -> String, v: f64) -> VResult {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(field(), v, "must be positive and finite"))
    }
}

fn non_negative(field: impl Fn() -> String, v: f64) -> VResult {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field(), v, "must be non-negative and finite"))
    }
}

fn unit_interval(field: impl Fn() -> String, v: f64) -> VResult {
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(invalid(field(), v, "must lie in [0, 1]"))
    }
}

fn above_absolute_zero(field: impl Fn() -> String, v: f64) -> VResult {
    if v.is_finite() && v > -273.15 {
        Ok(())
    } else {
        Err(invalid(field(), v, "must be a finite temperature above absolute zero"))
    }
}

fn unique_ids<'a>(ids: impl Iterator<Item = &'a String>, context: &str) -> VResult {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateId {
                id: id.clone(),
                context: context.to_string(),
            });
        }
    }
    Ok(())
}

pub fn validate_project(project: &Project) -> VResult {
    if project.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    if let Some(envelope) = &project.envelope {
        validate_envelope(envelope)?;
    }
    let has_envelope = project.envelope.is_some();

    unique_ids(project.glasshouses.iter().map(|c| &c.id), "glasshouses")?;
    for case in &project.glasshouses {
        validate_glasshouse(case)?;
    }

    unique_ids(project.designs.iter().map(|c| &c.id), "designs")?;
    for case in &project.designs {
        validate_design(case, has_envelope)?;
    }

    unique_ids(project.radiation.iter().map(|c| &c.id), "radiation")?;
    for case in &project.radiation {
        validate_radiation(case)?;
    }

    unique_ids(project.networks.iter().map(|c| &c.id), "networks")?;
    for case in &project.networks {
        validate_network(case)?;
    }

    unique_ids(project.transients.iter().map(|c| &c.id), "transients")?;
    for case in &project.transients {
        validate_transient(case, project.envelope.as_ref())?;
    }

    Ok(())
}

fn validate_envelope(e: &EnvelopeDef) -> VResult {
    for (name, area, u) in [
        ("wall", e.wall_area, e.wall_u_value),
        ("roof", e.roof_area, e.roof_u_value),
        ("floor", e.floor_area, e.floor_u_value),
        ("window", e.window_area, e.window_u_value),
    ] {
        non_negative(|| format!("envelope {name}_area"), area)?;
        non_negative(|| format!("envelope {name}_u_value"), u)?;
    }
    unit_interval(|| "envelope shgc".to_string(), e.shgc)?;
    non_negative(|| "envelope ventilation_rate".to_string(), e.ventilation_rate)?;
    positive(|| "envelope building_volume".to_string(), e.building_volume)?;
    finite(|| "envelope indoor_temp".to_string(), e.indoor_temp)?;
    finite(|| "envelope design_outdoor_temp".to_string(), e.design_outdoor_temp)?;
    Ok(())
}

fn validate_glasshouse(c: &GlasshouseCaseDef) -> VResult {
    let field = |name: &str| {
        let id = c.id.clone();
        let name = name.to_string();
        move || format!("glasshouse '{id}' {name}")
    };

    above_absolute_zero(field("outdoor_temp"), c.outdoor_temp)?;
    non_negative(field("solar_irradiance"), c.solar_irradiance)?;
    positive(field("glass_area"), c.glass_area)?;
    positive(field("collector_area"), c.collector_area)?;

    let p = &c.properties;
    for (name, v) in [
        ("glass_transmittance", p.glass_transmittance),
        ("glass_absorptance", p.glass_absorptance),
        ("collector_absorptance", p.collector_absorptance),
        ("emissivity_glass", p.emissivity_glass),
        ("emissivity_collector", p.emissivity_collector),
        ("emissivity_interior", p.emissivity_interior),
    ] {
        unit_interval(field(name), v)?;
    }
    if p.glass_transmittance + p.glass_absorptance > 1.0 {
        return Err(invalid(
            field("glass_transmittance + glass_absorptance")(),
            p.glass_transmittance + p.glass_absorptance,
            "must not exceed 1",
        ));
    }
    non_negative(field("h_conv_ext"), p.h_conv_ext)?;
    non_negative(field("h_conv_int"), p.h_conv_int)?;
    non_negative(field("u_back"), p.u_back)?;

    let it = &c.iteration;
    if it.max_iterations == 0 {
        return Err(invalid(field("max_iterations")(), 0.0, "must be at least 1"));
    }
    positive(field("tolerance"), it.tolerance)?;
    if !(it.relaxation > 0.0 && it.relaxation <= 1.0) {
        return Err(invalid(field("relaxation")(), it.relaxation, "must lie in (0, 1]"));
    }

    if let Some(setpoint) = c.heating_setpoint {
        finite(field("heating_setpoint"), setpoint)?;
    }
    Ok(())
}

fn validate_design(c: &DesignCaseDef, has_envelope: bool) -> VResult {
    let field = |name: &str| {
        let id = c.id.clone();
        let name = name.to_string();
        move || format!("design '{id}' {name}")
    };

    above_absolute_zero(field("outdoor_temp"), c.outdoor_temp)?;
    non_negative(field("solar_irradiance"), c.solar_irradiance)?;
    match c.building_load {
        Some(load) => non_negative(field("building_load"), load)?,
        None if !has_envelope => {
            return Err(ValidationError::MissingReference {
                id: "envelope".to_string(),
                context: format!("design '{}' needs a building_load or an envelope", c.id),
            });
        }
        None => {}
    }
    positive(field("min_glass_area"), c.min_glass_area)?;
    positive(field("max_glass_area"), c.max_glass_area)?;
    if c.max_glass_area < c.min_glass_area {
        return Err(invalid(
            field("max_glass_area")(),
            c.max_glass_area,
            "must not be below min_glass_area",
        ));
    }
    if c.steps == 0 {
        return Err(invalid(field("steps")(), 0.0, "must be at least 1"));
    }
    Ok(())
}

fn validate_radiation(c: &RadiationCaseDef) -> VResult {
    let context = format!("radiation '{}'", c.id);
    finite(|| format!("{context} ambient_temp"), c.ambient_temp)?;
    if c.surfaces.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: format!("{context} surfaces"),
            value: "[]".to_string(),
            reason: "at least one surface is required".to_string(),
        });
    }
    unique_ids(c.surfaces.iter().map(|s| &s.name), &format!("{context} surfaces"))?;

    for s in &c.surfaces {
        positive(|| format!("{context} surface '{}' area", s.name), s.area)?;
        unit_interval(|| format!("{context} surface '{}' emissivity", s.name), s.emissivity)?;
        if let Some(a) = s.absorptance {
            unit_interval(|| format!("{context} surface '{}' absorptance", s.name), a)?;
        }
        if let Some(t) = s.temperature {
            above_absolute_zero(|| format!("{context} surface '{}' temperature", s.name), t)?;
        }
    }

    let names: HashSet<&String> = c.surfaces.iter().map(|s| &s.name).collect();
    for vf in &c.view_factors {
        for end in [&vf.from, &vf.to] {
            if !names.contains(end) {
                return Err(ValidationError::MissingReference {
                    id: end.clone(),
                    context: format!("{context} view_factors"),
                });
            }
        }
        unit_interval(|| format!("{context} view factor {} -> {}", vf.from, vf.to), vf.value)?;
    }
    Ok(())
}

fn validate_network(c: &NetworkCaseDef) -> VResult {
    let context = format!("network '{}'", c.id);
    unique_ids(c.zones.iter(), &format!("{context} zones"))?;
    let zones: HashSet<&String> = c.zones.iter().collect();
    let known = |name: &String, what: &str| {
        if zones.contains(name) {
            Ok(())
        } else {
            Err(ValidationError::MissingReference {
                id: name.clone(),
                context: format!("{context} {what}"),
            })
        }
    };

    for g in &c.conductances {
        known(&g.a, "conductances")?;
        known(&g.b, "conductances")?;
        if g.a == g.b {
            return Err(invalid(
                format!("{context} conductance {} -> {}", g.a, g.b),
                g.value,
                "a zone cannot conduct to itself",
            ));
        }
        non_negative(|| format!("{context} conductance {} -> {}", g.a, g.b), g.value)?;
    }
    for (zone, &t) in &c.boundary_temps {
        known(zone, "boundary_temps")?;
        finite(|| format!("{context} boundary temperature of '{zone}'"), t)?;
    }
    for (zone, &q) in &c.heat_sources {
        known(zone, "heat_sources")?;
        finite(|| format!("{context} heat source in '{zone}'"), q)?;
    }
    if let Some(lambda) = c.boundary_coupling {
        non_negative(|| format!("{context} boundary_coupling"), lambda)?;
    }
    Ok(())
}

fn validate_transient(c: &TransientCaseDef, envelope: Option<&EnvelopeDef>) -> VResult {
    let context = format!("transient '{}'", c.id);
    let has_envelope = envelope.is_some();
    finite(|| format!("{context} initial_temp"), c.initial_temp)?;
    positive(|| format!("{context} dt"), c.dt)?;

    for (name, value) in [("resistance", c.resistance), ("capacity", c.capacity)] {
        match value {
            Some(v) => positive(|| format!("{context} {name}"), v)?,
            None if !has_envelope => {
                return Err(ValidationError::MissingReference {
                    id: "envelope".to_string(),
                    context: format!("{context} has no {name} and no envelope to estimate it"),
                });
            }
            None => {}
        }
    }
    if let (None, Some(e)) = (c.resistance, envelope) {
        let conductance = e.wall_area * e.wall_u_value
            + e.roof_area * e.roof_u_value
            + e.floor_area * e.floor_u_value
            + e.window_area * e.window_u_value;
        if conductance <= 0.0 {
            return Err(ValidationError::InvalidValue {
                field: format!("{context} resistance"),
                value: format!("envelope conductance {conductance} W/K"),
                reason: "no finite resistance to estimate; give resistance explicitly".to_string(),
            });
        }
    }

    let f = &c.forcing;
    let n = f.outdoor_temps.len();
    for (name, column) in [
        ("solar_gains", &f.solar_gains),
        ("solar_irradiance", &f.solar_irradiance),
        ("heating", &f.heating),
    ] {
        if !column.is_empty() && column.len() != n {
            return Err(ValidationError::LengthMismatch {
                field: format!("{context} forcing {name}"),
                actual: column.len(),
                expected: n,
            });
        }
    }
    if !f.solar_gains.is_empty() && !f.solar_irradiance.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: format!("{context} forcing"),
            value: "solar_gains + solar_irradiance".to_string(),
            reason: "give solar input one way only".to_string(),
        });
    }
    if !f.solar_irradiance.is_empty() && !has_envelope {
        return Err(ValidationError::MissingReference {
            id: "envelope".to_string(),
            context: format!("{context} solar_irradiance needs envelope glazing"),
        });
    }
    for (k, v) in f
        .outdoor_temps
        .iter()
        .chain(&f.solar_gains)
        .chain(&f.solar_irradiance)
        .chain(&f.heating)
        .enumerate()
    {
        finite(|| format!("{context} forcing value #{k}"), *v)?;
    }
    Ok(())
}
