use crate::{AutoAction, AutoplayError};
use hackjack_core::{GameEvent, RunMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RunStatus {
    Victory,
    GameOver,
    TargetReached,
    MaxSteps,
    NoLegalAction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: u32,
    pub phase_before: String,
    pub wave_before: u32,
    pub chips_before: u32,
    pub lives_before: u32,
    pub action: AutoAction,
    #[serde(default)]
    pub action_detail: Option<String>,
    pub phase_after: String,
    pub wave_after: u32,
    pub chips_after: u32,
    pub lives_after: u32,
    pub score_after: u32,
    #[serde(default)]
    pub events: Vec<GameEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalMetrics {
    pub phase: String,
    pub wave: u32,
    pub chips: u32,
    pub lives: u32,
    pub score: u32,
    pub dealer: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    pub steps: u32,
    pub hands_played: u32,
    pub hands_won: u32,
    pub rollouts: u64,
    pub wall_time_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoplayResult {
    pub status: RunStatus,
    pub seed: u64,
    pub mode: RunMode,
    pub final_metrics: FinalMetrics,
    pub steps: Vec<StepRecord>,
    pub summary: SummaryStats,
}

impl AutoplayResult {
    /// One line for batch summaries.
    pub fn summary_line(&self) -> String {
        format!(
            "seed={} mode={:?} status={} wave={} chips={} lives={} score={} hands={}/{} steps={}",
            self.seed,
            self.mode,
            run_status_label(self.status),
            self.final_metrics.wave,
            self.final_metrics.chips,
            self.final_metrics.lives,
            self.final_metrics.score,
            self.summary.hands_won,
            self.summary.hands_played,
            self.summary.steps
        )
    }

    pub fn to_text_report(&self) -> String {
        let mut lines = vec![
            format!("status: {}", run_status_label(self.status)),
            format!(
                "final: phase={} wave={} chips={} lives={} score={} dealer={}",
                self.final_metrics.phase,
                self.final_metrics.wave,
                self.final_metrics.chips,
                self.final_metrics.lives,
                self.final_metrics.score,
                self.final_metrics.dealer.as_deref().unwrap_or("-")
            ),
            format!(
                "summary: steps={} hands={} won={} rollouts={} wall_ms={}",
                self.summary.steps,
                self.summary.hands_played,
                self.summary.hands_won,
                self.summary.rollouts,
                self.summary.wall_time_ms
            ),
            String::new(),
            "steps:".to_string(),
        ];
        for step in &self.steps {
            lines.push(format!("  step {:>4} | {}", step.step, step.action.short_label()));
            lines.push(format!(
                "    state: {} wave {} chips {} lives {}",
                step.phase_before, step.wave_before, step.chips_before, step.lives_before
            ));
            lines.push(format!(
                "      -> {} wave {} chips {} lives {} score {}",
                step.phase_after,
                step.wave_after,
                step.chips_after,
                step.lives_after,
                step.score_after
            ));
            if let Some(detail) = step.action_detail.as_ref() {
                lines.push(format!("    action: {detail}"));
            }
            for event in &step.events {
                lines.push(format!("    event: {event:?}"));
            }
        }
        lines.join("\n")
    }
}

fn run_status_label(status: RunStatus) -> &'static str {
    match status {
        RunStatus::Victory => "Victory",
        RunStatus::GameOver => "GameOver",
        RunStatus::TargetReached => "TargetReached",
        RunStatus::MaxSteps => "MaxSteps",
        RunStatus::NoLegalAction => "NoLegalAction",
    }
}

pub fn write_json(path: &Path, result: &AutoplayResult) -> Result<(), AutoplayError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_string_pretty(result)?;
    fs::write(path, body)?;
    Ok(())
}

pub fn write_text(path: &Path, result: &AutoplayResult) -> Result<(), AutoplayError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, result.to_text_report())?;
    Ok(())
}
