//! Run seeded raids end-to-end with scripted bot players
//!
//! Every raid goes through the runtime service, the same path a transport
//! would use, so simulated runs exercise command validation and event
//! publishing too.

use std::collections::HashSet;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use raid_core::{
    BehaviorPattern, BossCard, Difficulty, GameError, RaidOutcome, RaidSnapshot,
    TargetingStrategy,
};
use raid_runtime::{RaidCommand, RaidId, RaidService, RuntimeConfig, RuntimeError};

use crate::bots;

/// Run seeded raids with bot players
#[derive(Parser)]
pub struct Simulate {
    /// Number of raids to run
    #[arg(short, long, default_value_t = 1)]
    raids: u32,

    /// Bot players per raid
    #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=4))]
    players: u8,

    /// Base seed (defaults to RAID_SEED, then 0)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Boss difficulty (easy, normal, hard)
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// Boss targeting (weakest, strongest, tactical, random, deck_based)
    #[arg(long)]
    targeting: Option<TargetingStrategy>,

    /// Boss behavior (balanced, aggressive, strategic)
    #[arg(long)]
    behavior: Option<BehaviorPattern>,

    /// Commands per raid before giving up
    #[arg(long, default_value_t = 2_000)]
    max_steps: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// One line per raid plus totals
    Summary,
    /// Final snapshot of every raid as JSON
    Json,
}

#[derive(Default)]
struct Tally {
    victories: u32,
    defeats: u32,
    unfinished: u32,
}

impl Simulate {
    pub fn execute(self) -> Result<()> {
        let mut config = RuntimeConfig::from_env();
        if let Some(difficulty) = self.difficulty {
            config.raid.ai.difficulty = difficulty;
        }
        if let Some(targeting) = self.targeting {
            config.raid.ai.targeting = targeting;
        }
        if let Some(behavior) = self.behavior {
            config.raid.ai.behavior = behavior;
        }
        let seed = self.seed.or(config.seed).unwrap_or(0);
        config.max_raids = config.max_raids.max(1);

        let service = RaidService::builder().config(config).seed(seed).build();
        let ai = service.config().raid.ai;

        if matches!(self.format, OutputFormat::Summary) {
            println!(
                "{} {} players, {} / {} / {}, seed {}",
                style("Simulating").bold().cyan(),
                self.players,
                ai.difficulty,
                ai.targeting,
                ai.behavior,
                seed
            );
            println!();
        }

        let mut tally = Tally::default();
        for run in 1..=self.raids {
            let id = service
                .create_raid(BossCard::default(), bots::roster(usize::from(self.players)))
                .context("Failed to create raid")?;
            let steps = self.drive(&service, id)?;
            let snapshot = service.snapshot(id).context("Failed to read raid state")?;
            service.close_raid(id).context("Failed to close raid")?;

            match snapshot.outcome {
                Some(RaidOutcome::Victory) => tally.victories += 1,
                Some(RaidOutcome::Defeat { .. }) => tally.defeats += 1,
                None => tally.unfinished += 1,
            }

            match self.format {
                OutputFormat::Summary => print_summary(run, steps, &snapshot),
                OutputFormat::Json => print_json(&snapshot)?,
            }
        }

        if matches!(self.format, OutputFormat::Summary) {
            println!();
            println!(
                "{} {} won, {} lost, {} unfinished",
                style("Totals:").bold().yellow(),
                style(tally.victories).green(),
                style(tally.defeats).red(),
                tally.unfinished
            );
        }
        Ok(())
    }

    /// Feeds bot commands until the raid ends or the step cap is hit.
    fn drive(&self, service: &RaidService, id: RaidId) -> Result<usize> {
        let mut no_cheer = HashSet::new();
        for step in 0..self.max_steps {
            let snapshot = service.snapshot(id)?;
            let Some(command) = bots::next_command(&snapshot, &no_cheer) else {
                return Ok(step);
            };

            let cheering = match &command {
                RaidCommand::Cheer { player, .. } => Some(player.clone()),
                _ => None,
            };
            match service.dispatch(id, command) {
                Ok(_) => {}
                // A refused cheer is not fatal; stop offering it to that player
                Err(RuntimeError::Raid(err)) if cheering.is_some() => {
                    tracing::warn!(code = err.error_code(), %err, "cheer refused");
                    no_cheer.extend(cheering);
                }
                Err(err) => {
                    return Err(err).with_context(|| format!("Raid {id} rejected a bot command"));
                }
            }
        }

        tracing::warn!(raid = %id, steps = self.max_steps, "raid did not finish");
        Ok(self.max_steps)
    }
}

fn print_summary(run: u32, steps: usize, snapshot: &RaidSnapshot) {
    let result = match snapshot.outcome {
        Some(RaidOutcome::Victory) => style("victory".to_owned()).green().bold(),
        Some(RaidOutcome::Defeat { reason }) => style(format!("defeat ({reason})")).red().bold(),
        None => style("unfinished".to_owned()).dim(),
    };
    println!(
        "  raid {:>3}: {} after {} rounds, {} commands | boss {}/{} HP | KOs {}/{} | cheers {}/{}",
        run,
        result,
        snapshot.turn.round,
        steps,
        snapshot.boss.current_hp,
        snapshot.boss.max_hp,
        snapshot.total_ko_count,
        snapshot.ko_limit,
        snapshot.cheer.used,
        snapshot.cheer.max_uses,
    );
}

fn print_json(snapshot: &RaidSnapshot) -> Result<()> {
    let json =
        serde_json::to_string_pretty(snapshot).context("Failed to serialize raid to JSON")?;
    println!("{}", json);
    Ok(())
}
