//! Intents and events produced during a tick
//!
//! Entities never mutate each other. Instead they queue an [`Intent`], and the
//! session applies the queue once per tick in order. Whatever the session does
//! in response is reported as a [`GameEvent`] for the presentation layer
//! (particles, floating text, sound, screen shake).

use glam::Vec2;

use super::powerup::PowerUpKind;

/// Cross-entity commands, applied by the session once per tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// An enemy touched Jack
    StunPlayer,
    /// Jack overlapped a power-up
    CollectPowerUp(PowerUpKind),
    /// Jack landed on a lane above his last stable lane
    RegisterClimb { floor: usize },
    /// Jack dropped below the bottom of the screen
    LoseLife,
    /// Jack rose above the top of the screen
    CompleteLevel,
}

/// Screen shake request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shake {
    pub duration: f32,
    pub intensity: f32,
}

/// Procedural sound cues the presentation layer knows how to play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundKind {
    Jump,
    Land,
    Step,
    Stun,
    Win,
}

/// Notifications for the presentation layer. Fire-and-forget.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    GameStarted,
    Paused,
    Resumed,
    ThemeCycleRequested,
    Jumped { pos: Vec2 },
    Step,
    Landed { pos: Vec2, impact: f32 },
    Stunned { pos: Vec2 },
    PointsAwarded { points: u64, pos: Vec2 },
    ComboIncreased { count: u32, pos: Vec2 },
    ComboLost { count: u32 },
    MilestoneReached { score: u64 },
    HoleSpawned { floor: usize },
    PowerUpSpawned { kind: PowerUpKind, pos: Vec2 },
    ShieldGained,
    ShieldBroken,
    TimeSlowStarted,
    TimeSlowEnded,
    LifeGained { lives: u8 },
    MaxLives,
    LifeLost { lives: u8 },
    PlayerRespawned { pos: Vec2 },
    LevelComplete { level: u32 },
    LevelStarted { level: u32 },
    GameOver { score: u64 },
    Victory { score: u64 },
    /// The final score earns a leaderboard slot; the presentation layer
    /// decides when to prompt for a name
    LeaderboardQualifies { score: u64 },
    Restarted,
}

impl GameEvent {
    /// Sound cue for this event, if any
    pub fn sound(&self) -> Option<SoundKind> {
        match self {
            GameEvent::Jumped { .. } => Some(SoundKind::Jump),
            GameEvent::Step => Some(SoundKind::Step),
            GameEvent::Landed { .. } => Some(SoundKind::Land),
            GameEvent::Stunned { .. } | GameEvent::ShieldBroken | GameEvent::LifeLost { .. } => {
                Some(SoundKind::Stun)
            }
            GameEvent::GameStarted
            | GameEvent::ShieldGained
            | GameEvent::TimeSlowStarted
            | GameEvent::LifeGained { .. }
            | GameEvent::MilestoneReached { .. }
            | GameEvent::LevelComplete { .. }
            | GameEvent::Victory { .. } => Some(SoundKind::Win),
            _ => None,
        }
    }

    /// Screen shake for this event, if any
    pub fn shake(&self) -> Option<Shake> {
        match self {
            GameEvent::Landed { .. } => Some(Shake {
                duration: 0.1,
                intensity: 5.0,
            }),
            GameEvent::ShieldBroken => Some(Shake {
                duration: 0.2,
                intensity: 10.0,
            }),
            GameEvent::LifeLost { .. } => Some(Shake {
                duration: 0.5,
                intensity: 20.0,
            }),
            _ => None,
        }
    }
}
