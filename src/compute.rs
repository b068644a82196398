//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (and, where needed, an RNG handle) and returns a brand-new
//! `GameState` together with the `FrameEvent`s the caller must act on.
//! Side effects are limited to the injected RNG.

use rand::Rng;

use crate::config::{BulletHitPolicy, GameConfig};
use crate::entities::{
    Bullet, Enemy, FrameEvent, GameState, GameStatus, InputEvent, Key, Player, Sound,
};

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Axis-aligned overlap of two squares given by top-left corner and size.
/// Strict on every side, so boxes that only share an edge do not collide.
pub fn is_collision(ax: i32, ay: i32, a_size: i32, bx: i32, by: i32, b_size: i32) -> bool {
    ax < bx + b_size && ax + a_size > bx && ay < by + b_size && ay + a_size > by
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial state: player centred near the bottom, nothing alive.
pub fn init_state(config: &GameConfig, high_score: u32) -> GameState {
    GameState {
        player: Player {
            x: config.screen_width / 2 - config.player_size / 2,
            y: config.screen_height - 2 * config.player_size,
            vx: 0,
        },
        enemies: Vec::new(),
        bullets: Vec::new(),
        score: 0,
        high_score,
        status: GameStatus::Running,
        frame: 0,
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Fire a bullet from the nose of the ship.  Rejected while not running or
/// when `max_bullets` are already in flight.
pub fn fire(state: &GameState, config: &GameConfig) -> (GameState, Vec<FrameEvent>) {
    if state.status != GameStatus::Running || state.bullets.len() >= config.max_bullets {
        return (state.clone(), Vec::new());
    }
    let mut bullets = state.bullets.clone();
    bullets.push(Bullet {
        x: state.player.x + config.player_size / 2 - config.bullet_size / 2,
        y: state.player.y - config.bullet_size,
    });
    (
        GameState {
            bullets,
            ..state.clone()
        },
        vec![FrameEvent::Play(Sound::Shoot)],
    )
}

/// Apply one discrete input event.
///
/// Movement changes velocity in every non-terminal state, so a key pressed
/// while paused takes effect on resume.  Releasing either direction stops
/// the ship even if the other direction is still held.  `Quit` is the
/// loop's business and is ignored here.
pub fn apply_input(
    state: &GameState,
    config: &GameConfig,
    event: InputEvent,
) -> (GameState, Vec<FrameEvent>) {
    if state.status == GameStatus::GameOver {
        return (state.clone(), Vec::new());
    }

    let with_vx = |vx: i32| GameState {
        player: Player {
            vx,
            ..state.player.clone()
        },
        ..state.clone()
    };

    match event {
        InputEvent::KeyDown(Key::Left) => (with_vx(-config.player_speed), Vec::new()),
        InputEvent::KeyDown(Key::Right) => (with_vx(config.player_speed), Vec::new()),
        InputEvent::KeyUp(Key::Left) | InputEvent::KeyUp(Key::Right) => (with_vx(0), Vec::new()),
        InputEvent::KeyDown(Key::Space) => fire(state, config),
        InputEvent::KeyDown(Key::PauseToggle) => toggle_pause(state),
        InputEvent::KeyUp(Key::Space) | InputEvent::KeyUp(Key::PauseToggle) | InputEvent::Quit => {
            (state.clone(), Vec::new())
        }
    }
}

fn toggle_pause(state: &GameState) -> (GameState, Vec<FrameEvent>) {
    let (status, event) = match state.status {
        GameStatus::Running => (GameStatus::Paused, FrameEvent::Paused),
        GameStatus::Paused => (GameStatus::Running, FrameEvent::Resumed),
        GameStatus::GameOver => return (state.clone(), Vec::new()),
    };
    (
        GameState {
            status,
            ..state.clone()
        },
        vec![event],
    )
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by one frame.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
///
/// Does nothing unless the game is running.
pub fn tick(
    state: &GameState,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> (GameState, Vec<FrameEvent>) {
    if state.status != GameStatus::Running {
        return (state.clone(), Vec::new());
    }

    let mut events = Vec::new();
    let frame = state.frame + 1;

    // ── 1. Move and clamp the player ─────────────────────────────────────────
    let player = Player {
        x: (state.player.x + state.player.vx).clamp(0, config.screen_width - config.player_size),
        ..state.player.clone()
    };

    // ── 2. Spawn a new enemy ─────────────────────────────────────────────────
    let mut enemies = state.enemies.clone();
    if enemies.len() < config.max_enemies {
        enemies.push(Enemy {
            x: rng.gen_range(0..=config.screen_width - config.enemy_size),
            y: rng.gen_range(config.spawn_min_y..=config.spawn_max_y),
        });
    }

    // ── 3. Enemies descend; first contact with the player ends the game ─────
    // Enemies after the hit and all bullets stay where they were.
    let mut off_screen: Vec<usize> = Vec::new();
    for i in 0..enemies.len() {
        enemies[i].y += config.enemy_speed;
        let (ex, ey) = (enemies[i].x, enemies[i].y);

        if is_collision(player.x, player.y, config.player_size, ex, ey, config.enemy_size) {
            events.push(FrameEvent::Play(Sound::Explosion));
            events.push(FrameEvent::GameOver);
            let enemies = compact(enemies, &off_screen);
            return (
                GameState {
                    player,
                    enemies,
                    status: GameStatus::GameOver,
                    frame,
                    ..state.clone()
                },
                events,
            );
        }

        if ey > config.screen_height {
            off_screen.push(i);
        }
    }
    let enemies = compact(enemies, &off_screen);

    // ── 4. Bullets climb and hit enemies ─────────────────────────────────────
    let mut bullets: Vec<Bullet> = state
        .bullets
        .iter()
        .map(|b| Bullet {
            y: b.y - config.bullet_speed,
            ..b.clone()
        })
        .collect();

    let mut killed_enemies: Vec<usize> = Vec::new();
    let mut used_bullets: Vec<usize> = Vec::new();
    let mut score_gain: u32 = 0;

    for (bi, bullet) in bullets.iter().enumerate() {
        for (ei, enemy) in enemies.iter().enumerate() {
            if killed_enemies.contains(&ei) {
                continue;
            }
            if is_collision(
                bullet.x,
                bullet.y,
                config.bullet_size,
                enemy.x,
                enemy.y,
                config.enemy_size,
            ) {
                events.push(FrameEvent::Play(Sound::Explosion));
                killed_enemies.push(ei);
                score_gain = score_gain.saturating_add(config.kill_score);
                if !used_bullets.contains(&bi) {
                    used_bullets.push(bi);
                }
                if config.bullet_hit_policy == BulletHitPolicy::FirstHit {
                    break;
                }
            }
        }
        if bullet.y < 0 && !used_bullets.contains(&bi) {
            used_bullets.push(bi);
        }
    }

    let enemies = compact(enemies, &killed_enemies);
    bullets = compact(bullets, &used_bullets);

    // ── 5. Score & high score ────────────────────────────────────────────────
    // Saturates at u32::MAX so the high score never drops.
    let score = state.score.saturating_add(score_gain);
    let high_score = if score > state.high_score {
        events.push(FrameEvent::HighScore(score));
        score
    } else {
        state.high_score
    };

    (
        GameState {
            player,
            enemies,
            bullets,
            score,
            high_score,
            frame,
            ..state.clone()
        },
        events,
    )
}

/// Drop the entries whose indices were marked during a pass.
fn compact<T>(items: Vec<T>, marked: &[usize]) -> Vec<T> {
    if marked.is_empty() {
        return items;
    }
    items
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !marked.contains(i))
        .map(|(_, item)| item)
        .collect()
}
