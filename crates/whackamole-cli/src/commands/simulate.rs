use clap::Args;
use whackamole_core::{AutoPlayer, Difficulty, Event, SimulationHarness, SimulationSeed};

#[derive(Args)]
pub struct SimulateArgs {
    /// RNG seed; the same seed replays the same game
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Chance (0.0-1.0) that the player goes for a mole
    #[arg(long, default_value_t = 0.75)]
    hit_rate: f64,
    /// Player reaction time in milliseconds
    #[arg(long, default_value_t = 450)]
    reaction_ms: u64,
    /// easy, normal or hard
    #[arg(long)]
    difficulty: Option<Difficulty>,
    /// Game length in seconds
    #[arg(long)]
    duration: Option<u32>,
    /// Number of holes
    #[arg(long)]
    holes: Option<usize>,
    /// Print the full result, including every event, as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !(0.0..=1.0).contains(&args.hit_rate) {
        return Err(format!("--hit-rate must be between 0 and 1, got {}", args.hit_rate).into());
    }

    let config = super::game_config(args.difficulty, args.duration, args.holes, None)?;
    let player = AutoPlayer {
        hit_probability: args.hit_rate,
        reaction_ms: args.reaction_ms,
    };

    let mut harness = SimulationHarness::new();
    let result = harness.run(&config, player, SimulationSeed::new(args.seed))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    for event in &result.events {
        if let Some(line) = describe(event) {
            println!("{:>6} ms  {line}", event.at_ms());
        }
    }
    println!();
    println!("Seed:       {}", result.seed.0);
    println!("Difficulty: {}", result.config.difficulty);
    println!("Score:      {}", result.score);
    println!("Reveals:    {}", result.reveals);
    println!("Hits:       {}", result.hits);
    println!("Misses:     {}", result.misses);
    Ok(())
}

fn describe(event: &Event) -> Option<String> {
    let line = match event {
        Event::GameStarted {
            difficulty,
            duration_secs,
            holes,
            ..
        } => format!("game started ({difficulty}, {duration_secs}s, {holes} holes)"),
        Event::MoleShown {
            position, delay_ms, ..
        } => format!("mole up in hole {position} for {delay_ms} ms"),
        Event::MoleWhacked {
            position, score, ..
        } => format!("whacked hole {position}, score {score}"),
        Event::WhackMissed { position, .. } => format!("missed hole {position}"),
        Event::TimerTicked { remaining_secs, .. } => format!("{remaining_secs}s left"),
        Event::GameStopped { reason, score, .. } => {
            format!("game over ({reason:?}), final score {score}")
        }
        _ => return None,
    };
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use whackamole_core::{Position, StopReason};

    #[test]
    fn describe_uses_one_based_holes() {
        let line = describe(&Event::MoleShown {
            position: Position::new(0),
            delay_ms: 1000,
            at_ms: 0,
        });
        assert_eq!(line.as_deref(), Some("mole up in hole 1 for 1000 ms"));
    }

    #[test]
    fn describe_skips_bookkeeping_events() {
        assert!(describe(&Event::MoleHidden {
            position: Position::new(2),
            at_ms: 1000
        })
        .is_none());
        assert!(describe(&Event::GameReady { at_ms: 12_000 }).is_none());
        assert!(describe(&Event::GameStopped {
            reason: StopReason::TimeUp,
            score: 4,
            at_ms: 10_000
        })
        .is_some());
    }
}
