// Plan file: TOML description of one reserve-selection run

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::error::LoadError;
use super::raster::{read_boundary_table, read_raster};
use crate::application::{planner::PlanningProblem, PlanResult};
use crate::domain::{
    boundary::BoundaryMatrix, grid::PlanningGrid, models::SolverConfig, targets::TargetSpec,
    value_objects::{SolverBackend, TargetKind},
};

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct GridSection {
    #[serde(default = "default_cell_size")]
    pub cell_width: f64,
    #[serde(default = "default_cell_size")]
    pub cell_height: f64,
}

impl Default for GridSection {
    fn default() -> Self {
        Self {
            cell_width: default_cell_size(),
            cell_height: default_cell_size(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct InputSection {
    pub cost: PathBuf,
    pub features: Vec<PathBuf>,
    #[serde(default)]
    pub boundary: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct TargetsSection {
    pub kind: TargetKind,
    pub values: Vec<f64>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ObjectiveSection {
    #[serde(default)]
    pub boundary_penalty: f64,
    #[serde(default = "default_edge_factor")]
    pub edge_factor: f64,
}

impl Default for ObjectiveSection {
    fn default() -> Self {
        Self {
            boundary_penalty: 0.0,
            edge_factor: default_edge_factor(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct UnitsSection {
    #[serde(default)]
    pub locked_in: Vec<usize>,
    #[serde(default)]
    pub locked_out: Vec<usize>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct SolverSection {
    #[serde(default)]
    pub backend: SolverBackend,
    pub gap: Option<f64>,
    pub time_limit: Option<f64>,
    #[serde(default)]
    pub verbose: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PlanFile {
    #[serde(default)]
    pub grid: GridSection,
    pub input: InputSection,
    pub targets: TargetsSection,
    #[serde(default)]
    pub objective: ObjectiveSection,
    #[serde(default)]
    pub units: UnitsSection,
    #[serde(default)]
    pub solver: SolverSection,
}

/// Command-line values that take precedence over the plan file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanOverrides {
    pub boundary_penalty: Option<f64>,
    pub edge_factor: Option<f64>,
    pub gap: Option<f64>,
    pub time_limit: Option<f64>,
    pub backend: Option<SolverBackend>,
}

fn default_cell_size() -> f64 {
    1.0
}

fn default_edge_factor() -> f64 {
    1.0
}

impl PlanFile {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        debug!("Loading plan file from: {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| LoadError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply(&mut self, overrides: &PlanOverrides) {
        if let Some(b) = overrides.boundary_penalty {
            self.objective.boundary_penalty = b;
        }
        if let Some(e) = overrides.edge_factor {
            self.objective.edge_factor = e;
        }
        if let Some(gap) = overrides.gap {
            self.solver.gap = Some(gap);
        }
        if let Some(limit) = overrides.time_limit {
            self.solver.time_limit = Some(limit);
        }
        if let Some(backend) = overrides.backend {
            self.solver.backend = backend;
        }
    }

    pub fn solver_config(&self) -> Result<SolverConfig, LoadError> {
        if let Some(gap) = self.solver.gap {
            if !(gap.is_finite() && gap >= 0.0) {
                return Err(LoadError::Config(format!(
                    "gap must be non-negative, got {}",
                    gap
                )));
            }
        }
        if let Some(limit) = self.solver.time_limit {
            if !(limit.is_finite() && limit > 0.0) {
                return Err(LoadError::Config(format!(
                    "time-limit must be positive, got {}",
                    limit
                )));
            }
        }
        Ok(SolverConfig {
            backend: self.solver.backend,
            time_limit: self.solver.time_limit,
            gap: self.solver.gap,
            verbose: self.solver.verbose,
        })
    }

    /// Read every input grid, resolving relative paths against `base_dir`.
    pub fn into_problem(self, base_dir: &Path) -> PlanResult<PlanningProblem> {
        let solver_config = self.solver_config()?;
        let resolve = |p: &Path| -> PathBuf {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                base_dir.join(p)
            }
        };

        if self.input.features.is_empty() {
            return Err(LoadError::Config(
                "input.features must list at least one grid".to_string(),
            )
            .into());
        }

        let cost = read_raster(&resolve(&self.input.cost))?;
        let mut occupancy = Vec::with_capacity(self.input.features.len());
        for feature in &self.input.features {
            let path = resolve(feature);
            let layer = read_raster(&path)?;
            if !layer.same_shape(&cost) {
                return Err(LoadError::GridMismatch {
                    path,
                    rows: cost.nrows,
                    cols: cost.ncols,
                    actual_rows: layer.nrows,
                    actual_cols: layer.ncols,
                }
                .into());
            }
            occupancy.push(layer.values);
        }

        let grid = PlanningGrid::new(
            cost.nrows,
            cost.ncols,
            self.grid.cell_width,
            self.grid.cell_height,
        )?;

        let boundary = match &self.input.boundary {
            Some(path) => {
                let entries = read_boundary_table(&resolve(path))?;
                Some(BoundaryMatrix::from_entries(grid.num_units(), &entries)?)
            }
            None => None,
        };

        Ok(PlanningProblem {
            grid,
            costs: cost.values,
            occupancy,
            boundary,
            boundary_weight: self.objective.boundary_penalty,
            edge_factor: self.objective.edge_factor,
            targets: TargetSpec::new(self.targets.kind, self.targets.values),
            locked_in: self.units.locked_in,
            locked_out: self.units.locked_out,
            solver_config,
        })
    }
}
