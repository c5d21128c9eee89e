use crate::engine::search::INFINITY;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchForm {
    #[default]
    Negamax,
    Minimax,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("search_depth must be at least 1")]
    ZeroDepth,
    #[error("path_weight must be positive")]
    PathWeight,
    #[error("secondary terms can swing {swing}, which is not below path_weight {path_weight}")]
    SecondarySwing { swing: i64, path_weight: i32 },
    #[error("near_win_score {near_win} must exceed every plain evaluation ({bound})")]
    NearWin { near_win: i32, bound: i64 },
    #[error("win_score must exceed near_win_score")]
    WinScore,
    #[error("win_score {0} leaves no room below the search bound {INFINITY}")]
    WinHeadroom(i32),
    #[error("easy_wall_probability {0} is outside [0, 1]")]
    Probability(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Search Parameters
    pub search_depth: u8,
    pub search_form: SearchForm,
    pub alpha_beta: bool,
    pub max_wall_candidates: usize,
    pub wall_row_span: u8,
    pub wall_col_radius: u8,
    pub path_lookahead: usize,
    pub wall_trigger_distance: u32,
    pub early_game_walls: usize, // 0 disables the gate
    pub oscillation_memory: usize,

    // Easy / Medium tiers
    pub easy_wall_probability: f64,
    pub easy_wall_attempts: u32,
    pub medium_wall_radius: u8,
    pub medium_ahead_margin: i32,

    // Evaluation Parameters
    pub win_score: i32,
    pub near_win_score: i32,
    pub path_weight: i32,
    pub wall_weight: i32,
    pub row_weight: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            search_depth: 4,
            search_form: SearchForm::Negamax,
            alpha_beta: true,
            max_wall_candidates: 6,
            wall_row_span: 3,
            wall_col_radius: 2,
            path_lookahead: 4,
            wall_trigger_distance: 5,
            early_game_walls: 0,
            oscillation_memory: 4,

            easy_wall_probability: 0.3,
            easy_wall_attempts: 20,
            medium_wall_radius: 2,
            medium_ahead_margin: -1,

            win_score: 100_000,
            near_win_score: 50_000,
            path_weight: 100,
            wall_weight: 3,
            row_weight: 2,
        }
    }
}

// Longest possible shortest path: every cell once.
const MAX_PATH: i64 = 81;

#[derive(Deserialize)]
struct EngineConfigJson {
    search_depth: Option<u8>,
    search_form: Option<SearchForm>,
    alpha_beta: Option<bool>,
    max_wall_candidates: Option<usize>,
    wall_row_span: Option<u8>,
    wall_col_radius: Option<u8>,
    path_lookahead: Option<usize>,
    wall_trigger_distance: Option<u32>,
    early_game_walls: Option<usize>,
    oscillation_memory: Option<usize>,

    easy_wall_probability: Option<f64>,
    easy_wall_attempts: Option<u32>,
    medium_wall_radius: Option<u8>,
    medium_ahead_margin: Option<i32>,

    win_score: Option<f32>,
    near_win_score: Option<f32>,
    path_weight: Option<f32>,
    wall_weight: Option<f32>,
    row_weight: Option<f32>,
}

impl EngineConfig {
    /// Search parameters are absolute; evaluation weights are scale factors
    /// applied to the defaults.
    pub fn load_from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        let json_config: EngineConfigJson = serde_json::from_str(json_str)?;
        let default = Self::default();

        Ok(Self {
            search_depth: json_config.search_depth.unwrap_or(default.search_depth),
            search_form: json_config.search_form.unwrap_or(default.search_form),
            alpha_beta: json_config.alpha_beta.unwrap_or(default.alpha_beta),
            max_wall_candidates: json_config
                .max_wall_candidates
                .unwrap_or(default.max_wall_candidates),
            wall_row_span: json_config.wall_row_span.unwrap_or(default.wall_row_span),
            wall_col_radius: json_config
                .wall_col_radius
                .unwrap_or(default.wall_col_radius),
            path_lookahead: json_config.path_lookahead.unwrap_or(default.path_lookahead),
            wall_trigger_distance: json_config
                .wall_trigger_distance
                .unwrap_or(default.wall_trigger_distance),
            early_game_walls: json_config
                .early_game_walls
                .unwrap_or(default.early_game_walls),
            oscillation_memory: json_config
                .oscillation_memory
                .unwrap_or(default.oscillation_memory),

            easy_wall_probability: json_config
                .easy_wall_probability
                .unwrap_or(default.easy_wall_probability),
            easy_wall_attempts: json_config
                .easy_wall_attempts
                .unwrap_or(default.easy_wall_attempts),
            medium_wall_radius: json_config
                .medium_wall_radius
                .unwrap_or(default.medium_wall_radius),
            medium_ahead_margin: json_config
                .medium_ahead_margin
                .unwrap_or(default.medium_ahead_margin),

            win_score: apply_scale(default.win_score, json_config.win_score),
            near_win_score: apply_scale(default.near_win_score, json_config.near_win_score),
            path_weight: apply_scale(default.path_weight, json_config.path_weight),
            wall_weight: apply_scale(default.wall_weight, json_config.wall_weight),
            row_weight: apply_scale(default.row_weight, json_config.row_weight),
        })
    }

    /// Largest amount the wall and row terms can move an evaluation.
    #[must_use]
    pub fn secondary_swing(&self) -> i64 {
        // Wall counts differ by at most 20, row distances by at most 16.
        20 * i64::from(self.wall_weight).abs() + 16 * i64::from(self.row_weight).abs()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        if self.path_weight <= 0 {
            return Err(ConfigError::PathWeight);
        }
        let swing = self.secondary_swing();
        if swing >= i64::from(self.path_weight) {
            return Err(ConfigError::SecondarySwing {
                swing,
                path_weight: self.path_weight,
            });
        }
        let bound = i64::from(self.path_weight) * MAX_PATH + swing;
        if i64::from(self.near_win_score) <= bound {
            return Err(ConfigError::NearWin {
                near_win: self.near_win_score,
                bound,
            });
        }
        if self.win_score <= self.near_win_score {
            return Err(ConfigError::WinScore);
        }
        // Terminal scores add up to the search depth on top of win_score.
        if i64::from(self.win_score) + i64::from(u8::MAX) >= i64::from(INFINITY) {
            return Err(ConfigError::WinHeadroom(self.win_score));
        }
        if !(0.0..=1.0).contains(&self.easy_wall_probability) {
            return Err(ConfigError::Probability(self.easy_wall_probability));
        }
        Ok(())
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn apply_scale(default_val: i32, scale: Option<f32>) -> i32 {
    scale.map_or(default_val, |s| (default_val as f32 * s) as i32)
}
