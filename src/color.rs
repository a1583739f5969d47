use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One of the four playable colors
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::Red, Color::Green, Color::Blue, Color::Yellow];

    /// Stable identifier, 1-based in declaration order
    pub fn id(self) -> u8 {
        match self {
            Color::Red => 1,
            Color::Green => 2,
            Color::Blue => 3,
            Color::Yellow => 4,
        }
    }

    pub fn from_id(id: u8) -> Option<Color> {
        Color::ALL.into_iter().find(|c| c.id() == id)
    }

    /// Letter hotkey used by the terminal front-end
    pub fn hotkey(self) -> char {
        match self {
            Color::Red => 'r',
            Color::Green => 'g',
            Color::Blue => 'b',
            Color::Yellow => 'y',
        }
    }

    /// Maps a pressed key (letter, either case, or digit 1-4) to a color
    pub fn from_key(c: char) -> Option<Color> {
        if let Some(digit) = c.to_digit(10) {
            return Color::from_id(digit as u8);
        }
        let lower = c.to_ascii_lowercase();
        Color::ALL.into_iter().find(|color| color.hotkey() == lower)
    }
}

/// Source of target colors. Swappable so rounds can be replayed deterministically.
pub trait ColorSource {
    fn next_color(&mut self) -> Color;
}

/// Uniform choice over [`Color::ALL`]
#[derive(Debug, Clone)]
pub struct RandomColorSource {
    rng: StdRng,
}

impl RandomColorSource {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::seeded)
    }
}

impl Default for RandomColorSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorSource for RandomColorSource {
    fn next_color(&mut self) -> Color {
        *Color::ALL.choose(&mut self.rng).unwrap_or(&Color::Red)
    }
}

/// Replays a fixed sequence of colors, wrapping around when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedColorSource {
    script: VecDeque<Color>,
}

impl ScriptedColorSource {
    pub fn new<I: IntoIterator<Item = Color>>(colors: I) -> Self {
        let script: VecDeque<Color> = colors.into_iter().collect();
        Self { script }
    }
}

impl ColorSource for ScriptedColorSource {
    fn next_color(&mut self) -> Color {
        match self.script.pop_front() {
            Some(c) => {
                self.script.push_back(c);
                c
            }
            // an empty script behaves as a constant source
            None => Color::Red,
        }
    }
}

impl<S: ColorSource + ?Sized> ColorSource for Box<S> {
    fn next_color(&mut self) -> Color {
        (**self).next_color()
    }
}
